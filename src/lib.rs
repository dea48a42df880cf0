//! # hostsmerge - Blocklist Consolidator for DNS Sinkholes
//!
//! Merges domain blocklists fetched over HTTP or read from disk into one
//! de-duplicated, sorted hosts file suitable for Pi-hole and similar DNS
//! level blockers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       hostsmerge                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── hostsmerge <sources_file> <output_file>              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Source Loader (sources + fetcher)                          │
//! │    ├── Sources file: one URL or path per line               │
//! │    └── Retrieval: reqwest (rustls, gzip/br) or local read   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Domain Extractor                                           │
//! │    └── Sentinel skip, label grammar, lowercase, BTreeSet    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Hosts Writer                                               │
//! │    └── Header + `0.0.0.0 <domain>` lines, atomic rename     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use chrono::Utc;
//! use hostsmerge::consolidate::{run, MergeOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = run(
//!         Path::new("/etc/hostsmerge/sources.list"),
//!         Path::new("/etc/pihole/consolidated.hosts"),
//!         MergeOptions::default(),
//!         Utc::now(),
//!     )
//!     .await?;
//!     println!("{} domains", summary.domains);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`consolidate`] - The end-to-end merge pipeline
//! - [`error`] - Fatal error taxonomy and exit codes
//! - [`extractor`] - Domain extraction and validation
//! - [`fetcher`] - HTTP and local source retrieval
//! - [`fs_abstraction`] - Mockable filesystem access
//! - [`sources`] - Sources-file parsing
//! - [`writer`] - Hosts file rendering and atomic writes

pub mod cli;
pub mod consolidate;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod fs_abstraction;
pub mod sources;
pub mod writer;

pub use cli::Cli;
pub use error::MergeError;
pub use extractor::{extract_domains, DomainSet};
