//! Source retrieval: HTTP downloads and local file reads.
//!
//! Sources are retrieved with bounded concurrency. A failed source is logged
//! and skipped; the run only fails when no source at all could be retrieved.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{redirect, Client};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::MergeError;
use crate::fs_abstraction::FileSystem;
use crate::sources::{SourceEntry, SourceKind};

/// Default per-request timeout for remote sources
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of sources retrieved at the same time
pub const DEFAULT_JOBS: usize = 6;

const MAX_REDIRECTS: usize = 10;

#[cfg(test)]
use mockall::automock;

/// Downloads the body of a remote source.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP client for remote blocklists.
///
/// Follows redirects and accepts gzip, brotli and deflate transfer encodings.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .user_agent(format!("hostsmerge/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {}", status);
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// A source that could not be retrieved.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub location: String,
    pub error: String,
}

/// Outcome of retrieving every source.
#[derive(Debug, Default)]
pub struct Retrieval {
    /// Bodies of the sources that succeeded, in sources-file order
    pub contents: Vec<String>,
    pub failures: Vec<SourceFailure>,
}

impl Retrieval {
    pub fn succeeded(&self) -> usize {
        self.contents.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.contents.iter().map(String::len).sum()
    }
}

/// Retrieves source contents from the network or the filesystem.
pub struct Loader<'a> {
    remote: &'a dyn RemoteFetcher,
    fs: &'a dyn FileSystem,
    jobs: usize,
}

impl<'a> Loader<'a> {
    /// `jobs` bounds the number of retrievals in flight (at least one).
    pub fn new(remote: &'a dyn RemoteFetcher, fs: &'a dyn FileSystem, jobs: usize) -> Self {
        Self {
            remote,
            fs,
            jobs: jobs.max(1),
        }
    }

    /// Retrieve a single source.
    pub async fn retrieve_one(&self, source: &SourceEntry) -> Result<String> {
        match source.kind {
            SourceKind::Remote => {
                info!("Fetching {}...", source);
                self.remote
                    .fetch(&source.location)
                    .await
                    .with_context(|| format!("Failed to fetch {}", source))
            }
            SourceKind::Local => {
                info!("Reading {}...", source);
                let path = Path::new(&source.location);
                if !self.fs.is_file(path) {
                    anyhow::bail!("Local source not found or not a file: {}", source);
                }
                let bytes = self
                    .fs
                    .read(path)
                    .with_context(|| format!("Failed to read {}", source))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    /// Retrieve every source, keeping sources-file order in the result.
    ///
    /// # Errors
    /// [`MergeError::AllSourcesFailed`] when not a single source succeeded.
    pub async fn retrieve(&self, sources: &[SourceEntry]) -> Result<Retrieval, MergeError> {
        let results: Vec<Result<String>> = stream::iter(sources.iter().map(|s| self.retrieve_one(s)))
            .buffered(self.jobs)
            .collect()
            .await;

        let mut retrieval = Retrieval::default();
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(content) => {
                    debug!("Retrieved {} source {} ({} bytes)", source.kind, source, content.len());
                    retrieval.contents.push(content);
                }
                Err(e) => {
                    warn!("Skipping {}: {:#}", source, e);
                    retrieval.failures.push(SourceFailure {
                        location: source.location.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        if retrieval.contents.is_empty() {
            return Err(MergeError::AllSourcesFailed(sources.len()));
        }

        Ok(retrieval)
    }
}
