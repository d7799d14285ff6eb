//! Conversion of raw annotation table records into `VariantRow` values.

use std::path::Path;

use indexmap::IndexMap;
use thousands::Separable;

use super::schema::{columns, Role, RoleTable, VariantRow, Zygosity, SENTINEL};
use crate::{common::open_read_maybe_gz, err::RowError};

/// Column positions resolved from a table header.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    /// All column names, in order.
    names: Vec<String>,
    /// Name to position.
    positions: IndexMap<String, usize>,
}

impl ColumnIndex {
    /// Build from the header record, failing if a required column is missing.
    pub fn from_header(header: &csv::StringRecord) -> Result<Self, anyhow::Error> {
        let names = header
            .iter()
            .map(|name| name.trim().to_string())
            .collect::<Vec<_>>();
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<IndexMap<_, _>>();
        for required in columns::REQUIRED {
            if !positions.contains_key(*required) {
                anyhow::bail!("missing required column {:?}", required);
            }
        }
        Ok(Self { names, positions })
    }

    /// The column names, in input order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        self.positions
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
    }

    fn required<'r>(
        &self,
        record: &'r csv::StringRecord,
        column: &str,
    ) -> Result<&'r str, RowError> {
        match self.get(record, column) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(RowError::EmptyValue(column.to_string())),
        }
    }

    fn or_sentinel(&self, record: &csv::StringRecord, column: &str) -> String {
        match self.get(record, column) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => SENTINEL.to_string(),
        }
    }
}

fn parse_position(column: &str, value: &str) -> Result<i32, RowError> {
    value.parse().map_err(|_| RowError::InvalidPosition {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Convert one raw record into a `VariantRow` for the given role.
pub fn normalize(
    index: &ColumnIndex,
    record: &csv::StringRecord,
    role: Role,
) -> Result<VariantRow, RowError> {
    if record.len() != index.names.len() {
        return Err(RowError::FieldCount {
            expected: index.names.len(),
            found: record.len(),
        });
    }

    let zygosity_str = index.required(record, columns::ZYGOSITY)?;
    let zygosity = zygosity_str
        .parse::<Zygosity>()
        .map_err(|_| RowError::InvalidZygosity(zygosity_str.to_string()))?;

    let extra = index
        .names
        .iter()
        .zip(record.iter())
        .filter(|(name, _)| {
            !columns::REQUIRED.contains(&name.as_str()) && !columns::OPTIONAL.contains(&name.as_str())
        })
        .map(|(name, value)| (name.clone(), value.trim().to_string()))
        .collect();

    Ok(VariantRow {
        role,
        chrom: index.required(record, columns::CHROM)?.to_string(),
        start: parse_position(columns::START, index.required(record, columns::START)?)?,
        end: parse_position(columns::END, index.required(record, columns::END)?)?,
        reference: index.required(record, columns::REF)?.to_string(),
        alternative: index.required(record, columns::ALT)?.to_string(),
        zygosity,
        gene: index.required(record, columns::GENE_REFGENE)?.to_string(),
        func_refgene: index.or_sentinel(record, columns::FUNC_REFGENE),
        exonic_func_refgene: index.or_sentinel(record, columns::EXONIC_FUNC_REFGENE),
        exonic_func_ensgene: index.or_sentinel(record, columns::EXONIC_FUNC_ENSGENE),
        exonic_func_knowngene: index.or_sentinel(record, columns::EXONIC_FUNC_KNOWNGENE),
        function_description: index.or_sentinel(record, columns::FUNCTION_DESCRIPTION),
        hom_iranome: index.or_sentinel(record, columns::HOM_IRANOME),
        het_iranome: index.or_sentinel(record, columns::HET_IRANOME),
        het_our_db: index.or_sentinel(record, columns::HET_OUR_DB),
        clinical_significance: index.or_sentinel(record, columns::CLNSIG),
        read_support: index.or_sentinel(record, columns::VALUE_INFO),
        extra,
    })
}

/// Counters for reading one table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Number of data records seen.
    pub total: usize,
    /// Number of records dropped because they were malformed.
    pub dropped: usize,
}

/// Read all records from a CSV reader, dropping (and counting) malformed ones.
pub fn read_records<R: std::io::Read>(
    reader: R,
    role: Role,
) -> Result<(RoleTable, ReadStats), anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let index = ColumnIndex::from_header(reader.headers()?)?;

    let mut stats = ReadStats::default();
    let mut rows = Vec::new();
    for (lineno, record) in reader.records().enumerate() {
        stats.total += 1;
        let result = record
            .map_err(|e| anyhow::anyhow!("{}", e))
            .and_then(|record| normalize(&index, &record, role).map_err(anyhow::Error::from));
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::debug!("dropping record {} for {}: {}", lineno + 1, role, e);
                stats.dropped += 1;
            }
        }
    }

    Ok((
        RoleTable {
            role,
            columns: index.names().to_vec(),
            rows,
        },
        stats,
    ))
}

/// Read the table at `path` (optionally gzip compressed) for the given role.
pub fn read_table<P: AsRef<Path>>(path: P, role: Role) -> Result<RoleTable, anyhow::Error> {
    tracing::info!("reading {} table from {:?}...", role, path.as_ref());
    let (table, stats) = read_records(open_read_maybe_gz(path.as_ref())?, role)
        .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", path.as_ref(), e))?;
    if stats.dropped > 0 {
        tracing::warn!(
            "file {:?} contains bad lines, dropped {} of {} records",
            path.as_ref(),
            stats.dropped.separate_with_commas(),
            stats.total.separate_with_commas()
        );
    }
    tracing::info!(
        "... read {} records for {}",
        table.rows.len().separate_with_commas(),
        role
    );
    Ok(table)
}
