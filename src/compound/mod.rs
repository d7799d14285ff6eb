//! Implementation of the `compound` sub command.
//!
//! Scans very large child and parent tables for candidates of compound
//! heterozygosity in the child.  Records are parsed and filtered in parallel,
//! chunk by chunk, so memory use is bounded by the number of kept rows.

use std::collections::HashSet;
use std::path::Path;

use rayon::prelude::*;
use thousands::Separable;

use crate::common::{self, open_read_maybe_gz, open_write_maybe_gz};
use crate::family::classify::compound::child_het_candidates;
use crate::family::filter::{passes_normal, FilterSettings};
use crate::family::normalize::{normalize, ColumnIndex, ReadStats};
use crate::family::schema::{Role, VariantRow, Zygosity};

/// Number of records parsed per parallel chunk.
const CHUNK_SIZE: usize = 65_536;

/// Command line arguments for `compound` sub command.
#[derive(Debug, clap::Parser)]
#[command(about = "Scan large tables for compound heterozygous candidates", long_about = None)]
pub struct Args {
    /// Path to the child's variant table.
    #[arg(long)]
    pub path_child: String,
    /// Path to the mother's variant table.
    #[arg(long)]
    pub path_mother: String,
    /// Path to the father's variant table, if any.
    #[arg(long)]
    pub path_father: Option<String>,
    /// Keep intronic variants.
    #[arg(long, default_value_t = false)]
    pub keep_intronic: bool,
    /// Number of threads to use, defaults to the number of cores.
    #[arg(long)]
    pub num_threads: Option<usize>,
    /// Path to the output TSV file.
    #[arg(long)]
    pub path_output: String,
}

/// Position of a call within a gene.
type SiteKey = (i32, i32, String);

fn site_key(row: &VariantRow) -> SiteKey {
    (row.start, row.end, row.gene.clone())
}

/// Parse the records at `path` and apply `func` in parallel, keeping input order.
///
/// Returns the column names of the table and the values for which `func`
/// returned `Some`.
fn scan<P, T, F>(path: P, role: Role, func: F) -> Result<(Vec<String>, Vec<T>), anyhow::Error>
where
    P: AsRef<Path>,
    T: Send,
    F: Fn(VariantRow) -> Option<T> + Sync,
{
    tracing::info!("scanning {} table {:?}...", role, path.as_ref());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(open_read_maybe_gz(path.as_ref())?);
    let index = ColumnIndex::from_header(reader.headers()?)
        .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", path.as_ref(), e))?;

    let mut stats = ReadStats::default();
    let mut result = Vec::new();
    let mut records = reader.records();
    loop {
        let mut chunk = Vec::with_capacity(CHUNK_SIZE);
        for record in records.by_ref().take(CHUNK_SIZE) {
            stats.total += 1;
            match record {
                Ok(record) => chunk.push(record),
                Err(e) => {
                    tracing::debug!("dropping unreadable record: {}", e);
                    stats.dropped += 1;
                }
            }
        }
        if chunk.is_empty() {
            break;
        }

        let processed = chunk
            .par_iter()
            .map(|record| normalize(&index, record, role).map(&func))
            .collect::<Vec<_>>();
        for value in processed {
            match value {
                Ok(Some(value)) => result.push(value),
                Ok(None) => (),
                Err(e) => {
                    tracing::debug!("dropping record for {}: {}", role, e);
                    stats.dropped += 1;
                }
            }
        }
    }

    if stats.dropped > 0 {
        tracing::warn!(
            "file {:?} contains bad lines, dropped {} of {} records",
            path.as_ref(),
            stats.dropped.separate_with_commas(),
            stats.total.separate_with_commas()
        );
    }
    tracing::info!(
        "... scanned {} records, kept {}",
        stats.total.separate_with_commas(),
        result.len().separate_with_commas()
    );
    Ok((index.names().to_vec(), result))
}

/// Filter the child rows and keep heterozygous rows in genes with more than
/// one of them.
fn scan_child<P: AsRef<Path>>(
    path: P,
    settings: &FilterSettings,
) -> Result<(Vec<String>, Vec<VariantRow>), anyhow::Error> {
    let (columns, rows) = scan(path, Role::Child, |row| {
        (passes_normal(settings, &row) && row.zygosity != Zygosity::Hom).then_some(row)
    })?;
    let refs = rows.iter().collect::<Vec<_>>();
    let candidates = child_het_candidates(&refs)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect::<Vec<_>>();
    tracing::info!(
        "child filter done, found {} candidates",
        candidates.len().separate_with_commas()
    );
    Ok((columns, candidates))
}

/// Keep the candidates carried non-homozygously by the parent at `path`.
fn match_parent<P: AsRef<Path>>(
    path: P,
    role: Role,
    settings: &FilterSettings,
    candidates: Vec<VariantRow>,
) -> Result<Vec<VariantRow>, anyhow::Error> {
    let wanted = candidates.iter().map(site_key).collect::<HashSet<_>>();
    let (_, found) = scan(path, role, |row| {
        let keep = (settings.keep_intronic || row.func_refgene != "intronic")
            && row.zygosity != Zygosity::Hom;
        let key = site_key(&row);
        (keep && wanted.contains(&key)).then_some(key)
    })?;
    let found = found.into_iter().collect::<HashSet<_>>();

    let result = candidates
        .into_iter()
        .filter(|row| found.contains(&site_key(row)))
        .collect::<Vec<_>>();
    tracing::info!(
        "{} filter done, found {} candidates",
        role,
        result.len().separate_with_commas()
    );
    Ok(result)
}

/// Write the child columns, the section label, and the rows.
fn write_output<P: AsRef<Path>>(
    path: P,
    columns: &[String],
    label: &str,
    rows: &[VariantRow],
) -> Result<(), anyhow::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(open_write_maybe_gz(path.as_ref())?);
    writer.write_record(columns)?;
    writer.write_record([format!("#{}", label)])?;
    for row in rows {
        writer.write_record(columns.iter().map(|column| row.value(column).into_owned()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Main entry point for `compound` sub command.
pub fn run(args_common: &common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("args_common = {:#?}", &args_common);
    tracing::info!("args = {:#?}", &args);

    if let Some(num_threads) = args.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| anyhow::anyhow!("building global Rayon thread pool failed: {}", e))?;
    }

    let settings = FilterSettings {
        keep_intronic: args.keep_intronic,
        ..Default::default()
    };

    let (columns, candidates) = scan_child(&args.path_child, &settings)?;
    let mut candidates = match_parent(&args.path_mother, Role::Mother, &settings, candidates)?;
    let label = if let Some(path_father) = &args.path_father {
        candidates = match_parent(path_father, Role::Father, &settings, candidates)?;
        "compound in child"
    } else {
        "possible compound in mother and child"
    };
    common::trace_rss_now();

    tracing::info!("writing {:?}...", &args.path_output);
    write_output(&args.path_output, &columns, label, &candidates)?;

    tracing::info!(
        "All of `compound` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn args(path_output: String, with_father: bool) -> Args {
        Args {
            path_child: "tests/data/family/child.csv".into(),
            path_mother: "tests/data/family/mother.csv".into(),
            path_father: with_father.then(|| "tests/data/family/father.csv".into()),
            keep_intronic: false,
            num_threads: None,
            path_output,
        }
    }

    #[test]
    fn scan_child() -> Result<(), anyhow::Error> {
        let (columns, rows) =
            super::scan_child("tests/data/family/child.csv", &FilterSettings::default())?;

        assert_eq!(columns.len(), 18);
        assert_eq!(
            rows.iter().map(|row| row.start).collect::<Vec<_>>(),
            vec![200, 210]
        );
        Ok(())
    }

    #[rstest]
    #[case(false, "#possible compound in mother and child", vec!["200"])]
    #[case(true, "#compound in child", vec![])]
    fn run_compound(
        #[case] with_father: bool,
        #[case] label: &str,
        #[case] starts: Vec<&str>,
    ) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path_output = tmp_dir.join("out.tsv");
        let args = args(path_output.to_string_lossy().to_string(), with_father);

        run(&common::Args::default(), &args)?;

        let contents = std::fs::read_to_string(&path_output)?;
        let lines = contents.lines().collect::<Vec<_>>();
        assert!(lines[0].starts_with("Chr\tStart\tEnd"));
        assert_eq!(lines[1], label);
        assert_eq!(
            lines[2..]
                .iter()
                .map(|line| line.split('\t').nth(1).unwrap_or_default())
                .collect::<Vec<_>>(),
            starts
        );
        Ok(())
    }

    #[test]
    fn run_gz_output() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path_output = tmp_dir.join("out.tsv.gz");
        let args = args(path_output.to_string_lossy().to_string(), false);

        run(&common::Args::default(), &args)?;

        let mut contents = String::new();
        std::io::Read::read_to_string(&mut open_read_maybe_gz(&path_output)?, &mut contents)?;
        assert_eq!(contents.lines().count(), 3);
        Ok(())
    }
}
