//! The merge pipeline: load sources, retrieve them, extract domains, write.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::extractor::DomainExtractor;
use crate::fetcher::{HttpFetcher, Loader, RemoteFetcher, DEFAULT_JOBS, DEFAULT_TIMEOUT_SECS};
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::sources::load_sources;
use crate::writer::{render_hosts, write_hosts_atomic};

/// Knobs for a merge run.
#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// Maximum sources retrieved at the same time
    pub jobs: usize,
    /// Timeout applied to each remote request
    pub timeout: Duration,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Unique domains written
    pub domains: usize,
    /// Sources listed in the sources file
    pub sources: usize,
    /// Sources that could not be retrieved
    pub failed: usize,
    pub output: PathBuf,
}

/// Run the merge with the real filesystem and HTTP client.
pub async fn run(
    sources_path: &Path,
    output_path: &Path,
    options: MergeOptions,
    generated_at: DateTime<Utc>,
) -> Result<Summary> {
    let fetcher = HttpFetcher::new(options.timeout)?;
    run_with(
        &fetcher,
        real_fs(),
        sources_path,
        output_path,
        options,
        generated_at,
    )
    .await
}

/// Run the merge against injected collaborators.
///
/// Fatal conditions surface as [`crate::error::MergeError`] inside the
/// returned error; use [`crate::error::exit_code_for`] to map them.
pub async fn run_with(
    fetcher: &dyn RemoteFetcher,
    fs: &dyn FileSystem,
    sources_path: &Path,
    output_path: &Path,
    options: MergeOptions,
    generated_at: DateTime<Utc>,
) -> Result<Summary> {
    let sources = load_sources(fs, sources_path)?;
    let remote = sources.iter().filter(|s| s.is_remote()).count();
    info!(
        "Merging {} sources ({} remote, {} local)...",
        sources.len(),
        remote,
        sources.len() - remote
    );

    let loader = Loader::new(fetcher, fs, options.jobs);
    let retrieval = loader.retrieve(&sources).await?;
    if !retrieval.failures.is_empty() {
        warn!(
            "{} of {} sources failed and were skipped",
            retrieval.failures.len(),
            sources.len()
        );
    }
    debug!(
        "Retrieved {} bytes from {} sources",
        retrieval.total_bytes(),
        retrieval.succeeded()
    );

    let failed = retrieval.failures.len();
    let mut extractor = DomainExtractor::new();
    for content in retrieval.contents {
        extractor.feed(&content);
    }
    let (domains, stats) = extractor.finish();
    info!(
        "Extracted {} unique domains ({} accepted of {} candidates on {} lines)",
        domains.len(),
        stats.accepted,
        stats.candidates,
        stats.lines
    );

    let document = render_hosts(&domains, &sources, &generated_at);
    write_hosts_atomic(output_path, &document)?;

    Ok(Summary {
        domains: domains.len(),
        sources: sources.len(),
        failed,
        output: output_path.to_path_buf(),
    })
}
