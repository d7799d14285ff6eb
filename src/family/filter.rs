//! Per-row quality and population frequency filters.

use super::schema::{VariantRow, SENTINEL};
use crate::err::ReadSupportError;

/// Thresholds for the "normal" and "pathogenic" filters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Keep variants with `Func.refGene == "intronic"`.
    pub keep_intronic: bool,
    /// Numeric `Het Iranome` values must be below this.
    pub max_het_iranome: f64,
    /// Numeric `Het Our DB` values must be below this.
    pub max_het_our_db: f64,
    /// The alternate read depth must be above this for pathogenic variants.
    pub min_alt_depth: i32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            keep_intronic: false,
            max_het_iranome: 80.0,
            max_het_our_db: 40.0,
            min_alt_depth: 7,
        }
    }
}

/// Genotype calls accepted by the pathogenic filter.
const PATHOGENIC_GENOTYPES: &[&str] = &["0/1", "1/1"];

/// Counters for filtering one table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Rows excluded because of a malformed read support descriptor.
    pub malformed: usize,
}

fn numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Whether the homozygote count is the sentinel or numeric zero.
pub fn hom_is_sentinel_or_zero(value: &str) -> bool {
    value == SENTINEL || numeric(value) == Some(0.0)
}

/// Normalize a homozygote count that passed `hom_is_sentinel_or_zero`.
fn normalize_hom(value: &str) -> String {
    if value == SENTINEL {
        SENTINEL.to_string()
    } else {
        "0".to_string()
    }
}

/// Whether a frequency value is non-numeric or below the threshold.
fn frequency_below(value: &str, max: f64) -> bool {
    numeric(value).map(|v| v < max).unwrap_or(true)
}

/// Replace non-numeric frequency values by the sentinel.
fn normalize_frequency(value: &str) -> String {
    if numeric(value).is_some() {
        value.trim().to_string()
    } else {
        SENTINEL.to_string()
    }
}

/// Determine whether the row passes the "normal" filter.
pub fn passes_normal(settings: &FilterSettings, row: &VariantRow) -> bool {
    hom_is_sentinel_or_zero(&row.hom_iranome)
        && (settings.keep_intronic || row.func_refgene != "intronic")
        && frequency_below(&row.het_iranome, settings.max_het_iranome)
        && frequency_below(&row.het_our_db, settings.max_het_our_db)
}

/// Apply the "normal" filter, returning the normalized row if it passes.
pub fn normal(settings: &FilterSettings, row: VariantRow) -> Option<VariantRow> {
    if !passes_normal(settings, &row) {
        tracing::trace!("variant {:?} fails normal filter", &row);
        return None;
    }
    Some(VariantRow {
        hom_iranome: normalize_hom(&row.hom_iranome),
        het_iranome: normalize_frequency(&row.het_iranome),
        het_our_db: normalize_frequency(&row.het_our_db),
        ..row
    })
}

/// Split the read support descriptor into genotype call and alternate depth.
///
/// For `0/1:12,9:21` this yields `("0/1", 9)`.
pub fn parse_read_support(descriptor: &str) -> Result<(&str, i32), ReadSupportError> {
    let mut fields = descriptor.split(':');
    let genotype = fields.next().unwrap_or_default();
    let depths = fields
        .next()
        .ok_or_else(|| ReadSupportError::MissingColon(descriptor.to_string()))?;
    let alt_depth = depths
        .split(',')
        .nth(1)
        .ok_or_else(|| ReadSupportError::MissingComma(depths.to_string()))?;
    Ok((genotype, alt_depth.trim().parse::<i32>()?))
}

/// Apply the "pathogenic" filter.
///
/// Returns `Ok(None)` for rows that fail and an error for rows with a
/// malformed read support descriptor.
pub fn pathogenic(
    settings: &FilterSettings,
    row: VariantRow,
) -> Result<Option<VariantRow>, ReadSupportError> {
    if !hom_is_sentinel_or_zero(&row.hom_iranome)
        || row.clinical_significance.to_lowercase().contains("benign")
    {
        tracing::trace!("variant {:?} fails pathogenic filter", &row);
        return Ok(None);
    }

    let (genotype, alt_depth) = parse_read_support(&row.read_support)?;
    if !PATHOGENIC_GENOTYPES.contains(&genotype) || alt_depth <= settings.min_alt_depth {
        tracing::trace!(
            "variant {:?} fails read support {:?} in pathogenic filter",
            &row,
            &row.read_support
        );
        return Ok(None);
    }

    Ok(Some(VariantRow {
        hom_iranome: normalize_hom(&row.hom_iranome),
        ..row
    }))
}

/// Apply the "normal" filter to all rows.
pub fn filter_normal(
    settings: &FilterSettings,
    rows: Vec<VariantRow>,
) -> (Vec<VariantRow>, FilterStats) {
    let mut stats = FilterStats {
        total: rows.len(),
        ..Default::default()
    };
    let result = rows
        .into_iter()
        .filter_map(|row| normal(settings, row))
        .collect::<Vec<_>>();
    stats.passed = result.len();
    stats.failed = stats.total - stats.passed;
    (result, stats)
}

/// Apply the "pathogenic" filter to all rows, skipping and counting
/// malformed ones.
pub fn filter_pathogenic(
    settings: &FilterSettings,
    rows: Vec<VariantRow>,
) -> (Vec<VariantRow>, FilterStats) {
    let mut stats = FilterStats {
        total: rows.len(),
        ..Default::default()
    };
    let mut result = Vec::new();
    for row in rows {
        match pathogenic(settings, row) {
            Ok(Some(row)) => result.push(row),
            Ok(None) => stats.failed += 1,
            Err(e) => {
                tracing::debug!("skipping row with malformed read support: {}", e);
                stats.malformed += 1;
            }
        }
    }
    stats.passed = result.len();
    (result, stats)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::err::ReadSupportError;

    fn row(hom: &str, func: &str, het_iranome: &str, het_our_db: &str) -> VariantRow {
        VariantRow {
            gene: "BRCA1".into(),
            hom_iranome: hom.into(),
            func_refgene: func.into(),
            het_iranome: het_iranome.into(),
            het_our_db: het_our_db.into(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(".", "exonic", ".", ".", false, true)]
    #[case("0", "exonic", "79", "39", false, true)]
    #[case("0.0", "exonic", "5", "5", false, true)]
    #[case("1", "exonic", ".", ".", false, false)]
    #[case(".", "intronic", ".", ".", false, false)]
    #[case(".", "intronic", ".", ".", true, true)]
    #[case(".", "exonic", "80", ".", false, false)]
    #[case(".", "exonic", ".", "40", false, false)]
    #[case(".", "exonic", "", "n/a", false, true)]
    fn passes_normal(
        #[case] hom: &str,
        #[case] func: &str,
        #[case] het_iranome: &str,
        #[case] het_our_db: &str,
        #[case] keep_intronic: bool,
        #[case] expected: bool,
    ) {
        let settings = FilterSettings {
            keep_intronic,
            ..Default::default()
        };
        assert_eq!(
            super::passes_normal(&settings, &row(hom, func, het_iranome, het_our_db)),
            expected
        );
    }

    #[test]
    fn normal_normalizes_sentinels() {
        let passed = normal(&FilterSettings::default(), row("0.0", "exonic", "", "abc"))
            .expect("row should pass");

        assert_eq!(passed.hom_iranome, "0");
        assert_eq!(passed.het_iranome, ".");
        assert_eq!(passed.het_our_db, ".");
    }

    #[test]
    fn filter_normal_hom_is_sentinel_or_zero() {
        let rows = vec![
            row(".", "exonic", "1", "1"),
            row("0", "exonic", "1", "1"),
            row("3", "exonic", "1", "1"),
            row("0.00", "splicing", "1", "1"),
        ];
        let (passed, stats) = filter_normal(&FilterSettings::default(), rows);

        assert_eq!(
            stats,
            FilterStats {
                total: 4,
                passed: 3,
                failed: 1,
                malformed: 0
            }
        );
        assert!(passed
            .iter()
            .all(|row| row.hom_iranome == "." || row.hom_iranome == "0"));
    }

    #[rstest]
    #[case("0/1:12,9:21", Ok(("0/1", 9)))]
    #[case("1/1:0,30", Ok(("1/1", 30)))]
    #[case("0/1", Err(ReadSupportError::MissingColon("0/1".into())))]
    #[case("0/1:12", Err(ReadSupportError::MissingComma("12".into())))]
    fn parse_read_support(
        #[case] descriptor: &str,
        #[case] expected: Result<(&str, i32), ReadSupportError>,
    ) {
        assert_eq!(super::parse_read_support(descriptor), expected);
    }

    #[test]
    fn parse_read_support_invalid_depth() {
        assert!(matches!(
            super::parse_read_support("0/1:12,x"),
            Err(ReadSupportError::InvalidDepth(_))
        ));
    }

    fn path_row(hom: &str, clnsig: &str, read_support: &str) -> VariantRow {
        VariantRow {
            hom_iranome: hom.into(),
            clinical_significance: clnsig.into(),
            read_support: read_support.into(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(".", "Pathogenic", "0/1:3,8", true)]
    #[case(".", "Pathogenic", "1/1:0,8", true)]
    #[case(".", "Pathogenic", "0/1:3,7", false)]
    #[case(".", "Pathogenic", "0/2:3,20", false)]
    #[case(".", "Likely_benign", "0/1:3,20", false)]
    #[case(".", "Benign/Likely_benign", "0/1:3,20", false)]
    #[case("2", "Pathogenic", "0/1:3,20", false)]
    #[case("0", ".", "0/1:3,20", true)]
    fn pathogenic_filter(
        #[case] hom: &str,
        #[case] clnsig: &str,
        #[case] read_support: &str,
        #[case] expected: bool,
    ) -> Result<(), anyhow::Error> {
        let result = pathogenic(&FilterSettings::default(), path_row(hom, clnsig, read_support))?;
        assert_eq!(result.is_some(), expected);
        Ok(())
    }

    #[test]
    fn filter_pathogenic_skips_malformed() {
        let rows = vec![
            path_row(".", "Pathogenic", "0/1:3,9"),
            path_row(".", "Pathogenic", "0/1"),
            path_row(".", "Pathogenic", "0/1:3,2"),
        ];
        let (passed, stats) = filter_pathogenic(&FilterSettings::default(), rows);

        assert_eq!(
            stats,
            FilterStats {
                total: 3,
                passed: 1,
                failed: 1,
                malformed: 1
            }
        );
        for row in &passed {
            let (_, depth) = super::parse_read_support(&row.read_support).unwrap();
            assert!(depth > 7);
        }
    }

    #[test]
    fn settings_from_partial_json() -> Result<(), anyhow::Error> {
        let settings: FilterSettings = serde_json::from_str(r#"{"keep_intronic": true}"#)?;
        assert_eq!(
            settings,
            FilterSettings {
                keep_intronic: true,
                ..Default::default()
            }
        );
        Ok(())
    }
}
