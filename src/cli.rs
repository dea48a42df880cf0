//! CLI argument parsing with clap.

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::consolidate::MergeOptions;
use crate::fetcher::{DEFAULT_JOBS, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(name = "hostsmerge")]
#[command(
    author,
    version,
    about = "Merge domain blocklists into a single de-duplicated hosts file"
)]
pub struct Cli {
    /// File listing blocklist URLs or paths, one per line
    pub sources: PathBuf,

    /// Hosts file to write
    pub output: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long)]
    pub verbose: bool,

    /// Timeout in seconds for each remote download
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Number of sources retrieved concurrently
    #[arg(short, long, default_value_t = DEFAULT_JOBS, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub jobs: usize,
}

impl Cli {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            jobs: self.jobs,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
