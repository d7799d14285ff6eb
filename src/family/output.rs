//! Writing of the report sections to a TSV file.

use std::io::Write;
use std::path::Path;

use thousands::Separable;

use super::assemble::ResultSet;
use super::schema::columns;
use crate::common::open_write_maybe_gz;

/// The report columns: the input columns with `Parent` before `Zygosity`.
pub fn report_columns(input: &[String]) -> Vec<String> {
    let mut result = input
        .iter()
        .filter(|column| column.as_str() != columns::PARENT)
        .cloned()
        .collect::<Vec<_>>();
    let pos = result
        .iter()
        .position(|column| column == columns::ZYGOSITY)
        .unwrap_or(result.len());
    result.insert(pos, columns::PARENT.to_string());
    result
}

/// Write the sections to `writer`.
///
/// The first line is the header, each section starts with a `#<label>` line.
pub fn write_report_to<W: Write>(
    writer: W,
    columns: &[String],
    sets: &[ResultSet],
) -> Result<usize, anyhow::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    writer.write_record(columns)?;
    let mut written = 0;
    for set in sets {
        writer.write_record([format!("#{}", set.label)])?;
        for row in &set.rows {
            writer.write_record(columns.iter().map(|column| row.value(column).into_owned()))?;
            written += 1;
        }
    }
    writer.flush()?;

    Ok(written)
}

/// Write the report to a file, gzip compressed if the name ends in `.gz`.
pub fn write_report<P: AsRef<Path>>(
    path: P,
    input_columns: &[String],
    sets: &[ResultSet],
) -> Result<(), anyhow::Error> {
    tracing::info!("writing report to {:?}...", path.as_ref());
    let columns = report_columns(input_columns);
    let written = write_report_to(open_write_maybe_gz(path.as_ref())?, &columns, sets)
        .map_err(|e| anyhow::anyhow!("problem writing {:?}: {}", path.as_ref(), e))?;
    tracing::info!(
        "... wrote {} rows in {} sections",
        written.separate_with_commas(),
        sets.len()
    );
    Ok(())
}
