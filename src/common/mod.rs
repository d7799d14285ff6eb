//! Common functionality.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

pub use io::{open_read_maybe_gz, open_write_maybe_gz};

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Helper to print the current memory resident set size via `tracing`.
pub fn trace_rss_now() {
    let rss = procfs::process::Process::myself()
        .and_then(|me| me.stat())
        .map(|stat| stat.rss * procfs::page_size());
    match rss {
        Ok(rss) => tracing::debug!("RSS now: {}", bytesize::ByteSize(rss)),
        Err(e) => tracing::debug!("could not determine RSS: {}", e),
    }
}

/// Load JSON settings from a string or from a file when prefixed with `@`.
pub fn load_json_settings<T>(value: &str) -> Result<T, anyhow::Error>
where
    T: serde::de::DeserializeOwned,
{
    if let Some(path) = value.strip_prefix('@') {
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("failed to open settings file {}: {}", path, e))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| anyhow::anyhow!("failed to parse settings from {}: {}", path, e))
    } else {
        serde_json::from_str(value).map_err(|e| anyhow::anyhow!("failed to parse settings: {}", e))
    }
}

/// Build the default output file name from the input paths.
///
/// `path/filtered_MOT_4904_2.csv` and `path/filtered_MOT_4905_2.csv` give
/// `filtered_MOT_4904&MOT_4905.tsv`.
pub fn default_output_name<P: AsRef<std::path::Path>>(paths: &[P]) -> String {
    let stems = paths
        .iter()
        .map(|path| {
            let name = path
                .as_ref()
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let name = name.replace("filtered_", "");
            let name = name
                .strip_suffix(".gz")
                .unwrap_or(&name)
                .trim_end_matches(".csv")
                .to_string();
            let cut = name
                .char_indices()
                .rev()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(0);
            name[..cut].to_string()
        })
        .collect::<Vec<_>>();
    format!("filtered_{}.tsv", stems.join("&"))
}
