//! Implementation of the `pheno-freq` sub command.
//!
//! Computes, for one variant, the carrier counts and the allele frequency
//! among the samples annotated with each of the given phenotypes.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use thousands::Separable;

use crate::common::{self, open_read_maybe_gz, open_write_maybe_gz};
use crate::err::ArgError;
use crate::family::schema::{Zygosity, SENTINEL};

/// Number of genotype records processed per parallel chunk.
const CHUNK_SIZE: usize = 65_536;

/// Command line arguments for `pheno-freq` sub command.
#[derive(Debug, clap::Parser)]
#[command(about = "Compute carrier frequencies of a variant per phenotype", long_about = None)]
pub struct Args {
    /// Path to the sample metadata table.
    #[arg(long)]
    pub path_metadata: String,
    /// Path to the cohort genotype table.
    #[arg(long)]
    pub path_genotypes: String,
    /// Chromosome of the variant.
    #[arg(long)]
    pub chrom: String,
    /// Position of the variant.
    #[arg(long)]
    pub pos: String,
    /// Reference allele of the variant.
    #[arg(long)]
    pub reference: String,
    /// Alternative allele of the variant.
    #[arg(long)]
    pub alternative: String,
    /// Phenotypes to search for in the metadata, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub phenotypes: Vec<String>,
    /// Number of threads to use, defaults to the number of cores.
    #[arg(long)]
    pub num_threads: Option<usize>,
    /// Path to the output TSV file.
    #[arg(long)]
    pub path_output: String,
}

/// The variant to compute frequencies for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub chrom: String,
    pub pos: u64,
    pub reference: String,
    pub alternative: String,
}

impl Variant {
    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Self {
            chrom: args.chrom.clone(),
            pos: args
                .pos
                .parse()
                .map_err(|_| ArgError::InvalidPosition(args.pos.clone()))?,
            reference: args.reference.clone(),
            alternative: args.alternative.clone(),
        })
    }
}

/// Counts and allele frequency for one phenotype.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PhenotypeFrequency {
    pub phenotype: String,
    pub n_samples: usize,
    pub n_het: usize,
    pub n_hom: usize,
    pub frequency: f64,
    /// Comma separated heterozygous carriers in metadata order, `.` if none.
    pub het_samples: String,
    /// Comma separated homozygous carriers in metadata order, `.` if none.
    pub hom_samples: String,
}

fn join_samples(samples: &[&str]) -> String {
    if samples.is_empty() {
        SENTINEL.to_string()
    } else {
        samples.join(",")
    }
}

fn tsv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

/// Collect the sample identifiers (first field) of the metadata lines that
/// mention each phenotype, compared case-insensitively.
pub fn read_metadata<R: std::io::Read>(
    reader: R,
    phenotypes: &[String],
) -> Result<IndexMap<String, IndexSet<String>>, anyhow::Error> {
    let mut result = phenotypes
        .iter()
        .map(|phenotype| (phenotype.clone(), IndexSet::new()))
        .collect::<IndexMap<_, _>>();
    let needles = result
        .keys()
        .map(|phenotype| phenotype.to_lowercase())
        .collect::<Vec<_>>();

    for record in tsv_reader(reader).records() {
        let record = record?;
        let sample = match record.get(0).map(str::trim) {
            Some(sample) if !sample.is_empty() => sample.to_string(),
            _ => continue,
        };
        let line = record.iter().collect::<Vec<_>>().join("\t").to_lowercase();
        for (needle, samples) in needles.iter().zip(result.values_mut()) {
            if line.contains(needle.as_str()) {
                samples.insert(sample.clone());
            }
        }
    }

    Ok(result)
}

/// The per-sample zygosities of a genotype record for `variant`.
///
/// Records have the fields `chrom, pos, ref, alts, genotypes, samples` where
/// `alts` is comma separated and the last two are semicolon separated.  A
/// genotype containing a reference allele is heterozygous, all others are
/// homozygous.
pub fn genotype_record(record: &csv::StringRecord, variant: &Variant) -> Vec<(String, Zygosity)> {
    let field = |i: usize| record.get(i).map(str::trim).unwrap_or_default();
    if field(0) != variant.chrom
        || field(1).parse::<u64>().ok() != Some(variant.pos)
        || field(2) != variant.reference
        || !field(3).split(',').any(|alt| alt == variant.alternative)
    {
        return Vec::new();
    }

    let genotypes = field(4).split(';').filter(|s| !s.is_empty());
    let samples = field(5).split(';').filter(|s| !s.is_empty());
    genotypes
        .zip(samples)
        .map(|(genotype, sample)| {
            let zygosity = if genotype.contains('0') {
                Zygosity::Het
            } else {
                Zygosity::Hom
            };
            (sample.to_string(), zygosity)
        })
        .collect()
}

/// Scan the genotype table for `variant`, returning the zygosity per sample.
pub fn scan_genotypes<P: AsRef<Path>>(
    path: P,
    variant: &Variant,
) -> Result<IndexMap<String, Zygosity>, anyhow::Error> {
    tracing::info!("scanning genotypes in {:?}...", path.as_ref());
    let mut reader = tsv_reader(open_read_maybe_gz(path.as_ref())?);
    let mut records = reader.records();
    let mut total = 0usize;
    let mut result = IndexMap::new();
    loop {
        let chunk = records
            .by_ref()
            .take(CHUNK_SIZE)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", path.as_ref(), e))?;
        if chunk.is_empty() {
            break;
        }
        total += chunk.len();

        let found = chunk
            .par_iter()
            .map(|record| genotype_record(record, variant))
            .collect::<Vec<_>>();
        result.extend(found.into_iter().flatten());
    }
    tracing::info!(
        "... scanned {} records, found {} samples",
        total.separate_with_commas(),
        result.len().separate_with_commas()
    );
    Ok(result)
}

/// Compute the counts and frequency for each phenotype.
///
/// The frequency is `(n_het + 2 * n_hom) / (2 * n_samples)` and zero for
/// phenotypes without samples.
pub fn frequencies(
    phenotypes: &IndexMap<String, IndexSet<String>>,
    genotypes: &IndexMap<String, Zygosity>,
) -> Vec<PhenotypeFrequency> {
    phenotypes
        .iter()
        .map(|(phenotype, samples)| {
            let (mut hets, mut homs) = (Vec::new(), Vec::new());
            for sample in samples {
                match genotypes.get(sample) {
                    Some(Zygosity::Het) => hets.push(sample.as_str()),
                    Some(Zygosity::Hom) => homs.push(sample.as_str()),
                    None => (),
                }
            }
            let (n_het, n_hom) = (hets.len(), homs.len());
            let frequency = if samples.is_empty() {
                0.0
            } else {
                (n_het + 2 * n_hom) as f64 / (2 * samples.len()) as f64
            };
            PhenotypeFrequency {
                phenotype: phenotype.clone(),
                n_samples: samples.len(),
                n_het,
                n_hom,
                frequency,
                het_samples: join_samples(&hets),
                hom_samples: join_samples(&homs),
            }
        })
        .collect()
}

fn write_frequencies<P: AsRef<Path>>(
    path: P,
    records: &[PhenotypeFrequency],
) -> Result<(), anyhow::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(open_write_maybe_gz(path.as_ref())?);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Main entry point for `pheno-freq` sub command.
pub fn run(args_common: &common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("args_common = {:#?}", &args_common);
    tracing::info!("args = {:#?}", &args);

    let variant = Variant::from_args(args)?;
    if let Some(num_threads) = args.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| anyhow::anyhow!("building global Rayon thread pool failed: {}", e))?;
    }

    tracing::info!("reading metadata from {:?}...", &args.path_metadata);
    let phenotypes = read_metadata(open_read_maybe_gz(&args.path_metadata)?, &args.phenotypes)
        .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", &args.path_metadata, e))?;
    for (phenotype, samples) in &phenotypes {
        tracing::info!("  {}: {} samples", phenotype, samples.len());
    }

    let genotypes = scan_genotypes(&args.path_genotypes, &variant)?;
    let result = frequencies(&phenotypes, &genotypes);
    for record in &result {
        tracing::info!(
            "  {}: freq={} n(het)={} n(hom)={}",
            record.phenotype,
            record.frequency,
            record.n_het,
            record.n_hom
        );
    }

    tracing::info!("writing {:?}...", &args.path_output);
    write_frequencies(&args.path_output, &result)?;

    tracing::info!(
        "All of `pheno-freq` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}
