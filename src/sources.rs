//! Sources-file parsing.
//!
//! One URL or filesystem path per line. Lines whose first non-whitespace
//! character is `#` are comments; blank lines are ignored.

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::MergeError;
use crate::fs_abstraction::FileSystem;

/// How a source is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `http://` or `https://` URL
    Remote,
    /// Anything else, read from the filesystem
    Local,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Remote => write!(f, "remote"),
            SourceKind::Local => write!(f, "local"),
        }
    }
}

/// A retained line of the sources file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Line as written (trailing `\r` dropped), echoed in the output header
    pub raw: String,
    /// Trimmed URL or path used for retrieval
    pub location: String,
    pub kind: SourceKind,
}

impl SourceEntry {
    pub fn new(raw: &str) -> Self {
        let location = raw.trim().to_string();
        let kind = classify(&location);
        Self {
            raw: raw.to_string(),
            location,
            kind,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.kind == SourceKind::Remote
    }
}

impl fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}

/// Decide whether a location is fetched over HTTP.
///
/// # Examples
/// ```
/// use hostsmerge::sources::{classify, SourceKind};
/// assert_eq!(classify("https://example.com/hosts"), SourceKind::Remote);
/// assert_eq!(classify("HTTP://example.com/hosts"), SourceKind::Remote);
/// assert_eq!(classify("/etc/hosts"), SourceKind::Local);
/// assert_eq!(classify("ftp://example.com/hosts"), SourceKind::Local);
/// ```
pub fn classify(location: &str) -> SourceKind {
    let has_scheme = |scheme: &str| {
        location
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    };
    if has_scheme("http://") || has_scheme("https://") {
        SourceKind::Remote
    } else {
        SourceKind::Local
    }
}

/// Parse sources-file text into entries, preserving order.
pub fn parse_sources(text: &str) -> Vec<SourceEntry> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(SourceEntry::new)
        .collect()
}

/// Load and parse the sources file.
///
/// # Errors
/// - [`MergeError::SourcesNotFound`] if the file does not exist
/// - [`MergeError::SourcesUnreadable`] if it exists but cannot be read
/// - [`MergeError::NoSources`] if it has no usable lines
pub fn load_sources(fs: &dyn FileSystem, path: &Path) -> Result<Vec<SourceEntry>, MergeError> {
    if !fs.exists(path) {
        return Err(MergeError::SourcesNotFound(path.to_path_buf()));
    }

    let bytes = fs.read(path).map_err(|source| MergeError::SourcesUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_sources(&String::from_utf8_lossy(&bytes));
    if entries.is_empty() {
        return Err(MergeError::NoSources(path.to_path_buf()));
    }

    debug!("Loaded {} sources from {:?}", entries.len(), path);
    Ok(entries)
}
