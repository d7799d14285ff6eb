//! Lookup of the mode of inheritance for a gene.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use thousands::Separable;

use crate::common::open_read_maybe_gz;

/// Enumeration for modes of inheritance.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Debug,
    strum::EnumString,
    strum::Display,
)]
pub enum ModeOfInheritance {
    /// Autosomal dominant inheritance.
    #[strum(serialize = "AD")]
    AutosomalDominant,
    /// Autosomal recessive inheritance.
    #[strum(serialize = "AR")]
    AutosomalRecessive,
}

/// Tokens resolving to autosomal recessive.
const AR_TOKENS: &[&str] = &["AR", "XLR", "DR"];
/// Tokens resolving to autosomal dominant.
const AD_TOKENS: &[&str] = &["AD", "XL", "XLD", "Smu", "Mu", "SMo", "IC", "YL"];

impl ModeOfInheritance {
    /// Resolve a set of mode tokens, `None` if no token is known.
    ///
    /// Recessive tokens take precedence over dominant ones.
    pub fn from_tokens<'a, I>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        if tokens.clone().into_iter().any(|t| AR_TOKENS.contains(&t)) {
            Some(Self::AutosomalRecessive)
        } else if tokens.into_iter().any(|t| AD_TOKENS.contains(&t)) {
            Some(Self::AutosomalDominant)
        } else {
            None
        }
    }
}

/// Split a multi-valued field on `,` and `;`.
fn split_values(field: &str) -> impl Iterator<Item = &str> + '_ {
    field
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Map from gene symbol to the mode tokens seen for it, in file order.
#[derive(Debug, Default, Clone)]
pub struct InheritanceMap {
    genes: IndexMap<String, IndexSet<String>>,
}

impl InheritanceMap {
    /// Register `token` for `gene`.
    pub fn insert(&mut self, gene: &str, token: &str) {
        self.genes
            .entry(gene.to_string())
            .or_default()
            .insert(token.to_string());
    }

    /// Number of genes with at least one token.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Tokens recorded for the gene.
    pub fn tokens(&self, gene: &str) -> Option<&IndexSet<String>> {
        self.genes.get(gene)
    }

    /// The mode of inheritance of the gene; AR unless known to be AD.
    pub fn mode_of(&self, gene: &str) -> ModeOfInheritance {
        self.tokens(gene)
            .and_then(|tokens| ModeOfInheritance::from_tokens(tokens.iter().map(String::as_str)))
            .unwrap_or(ModeOfInheritance::AutosomalRecessive)
    }

    /// Load from tab-separated records `locus, ..., modes, genes[, ...]`.
    ///
    /// Records with fewer than four fields are skipped.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, anyhow::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut result = Self::default();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            if record.len() < 4 {
                skipped += 1;
                continue;
            }
            let modes = split_values(&record[2]).collect::<Vec<_>>();
            for gene in split_values(&record[3]) {
                for mode in &modes {
                    result.insert(gene, mode);
                }
            }
        }
        if skipped > 0 {
            tracing::debug!("skipped {} short inheritance records", skipped);
        }

        Ok(result)
    }

    /// Load from a file, optionally gzip compressed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        tracing::info!("loading inheritance modes from {:?}...", path.as_ref());
        let result = Self::from_reader(open_read_maybe_gz(path.as_ref())?)
            .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", path.as_ref(), e))?;
        tracing::info!(
            "... loaded modes for {} genes",
            result.len().separate_with_commas()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{InheritanceMap, ModeOfInheritance};

    #[rstest]
    #[case(&["AR"], Some(ModeOfInheritance::AutosomalRecessive))]
    #[case(&["XLR"], Some(ModeOfInheritance::AutosomalRecessive))]
    #[case(&["DR"], Some(ModeOfInheritance::AutosomalRecessive))]
    #[case(&["AD"], Some(ModeOfInheritance::AutosomalDominant))]
    #[case(&["Smu"], Some(ModeOfInheritance::AutosomalDominant))]
    #[case(&["YL"], Some(ModeOfInheritance::AutosomalDominant))]
    #[case(&["AD", "AR"], Some(ModeOfInheritance::AutosomalRecessive))]
    #[case(&["smu"], None)]
    #[case(&[], None)]
    fn from_tokens(#[case] tokens: &[&str], #[case] expected: Option<ModeOfInheritance>) {
        assert_eq!(
            ModeOfInheritance::from_tokens(tokens.iter().copied()),
            expected
        );
    }

    #[test]
    fn mode_of_defaults_to_recessive() {
        let map = InheritanceMap::default();
        assert_eq!(map.mode_of("BRCA1"), ModeOfInheritance::AutosomalRecessive);
        assert_eq!(map.mode_of(""), ModeOfInheritance::AutosomalRecessive);
    }

    #[test]
    fn from_reader() -> Result<(), anyhow::Error> {
        let data = "# locus\tphenotype\tmode\tgenes\n\
                    1p36\tsome disorder\tAD\tGENE1, GENE2\n\
                    2q11\tother disorder\tAR\tGENE2\n\
                    3p21\tthird disorder\tSMo;IC\tGENE3\n\
                    4q12\tunknown\t?\tGENE4\n\
                    short\trecord\n";
        let map = InheritanceMap::from_reader(data.as_bytes())?;

        assert_eq!(map.len(), 4);
        assert_eq!(map.mode_of("GENE1"), ModeOfInheritance::AutosomalDominant);
        assert_eq!(map.mode_of("GENE2"), ModeOfInheritance::AutosomalRecessive);
        assert_eq!(map.mode_of("GENE3"), ModeOfInheritance::AutosomalDominant);
        assert_eq!(map.mode_of("GENE4"), ModeOfInheritance::AutosomalRecessive);
        assert_eq!(map.mode_of("GENE5"), ModeOfInheritance::AutosomalRecessive);
        assert_eq!(
            map.tokens("GENE2")
                .map(|tokens| tokens.iter().cloned().collect::<Vec<_>>()),
            Some(vec!["AD".to_string(), "AR".to_string()])
        );

        Ok(())
    }

    #[test]
    fn from_path() -> Result<(), anyhow::Error> {
        let map = InheritanceMap::from_path("tests/data/family/inheritance.tsv")?;
        assert_eq!(map.mode_of("MYH7"), ModeOfInheritance::AutosomalDominant);
        assert_eq!(map.mode_of("CFTR"), ModeOfInheritance::AutosomalRecessive);
        Ok(())
    }
}
