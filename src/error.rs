//! Error types for hostsmerge.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that end a run with a dedicated exit code.
///
/// Per-source retrieval failures are not represented here: they are logged
/// and the source is skipped.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Sources file not found: {}", .0.display())]
    SourcesNotFound(PathBuf),

    #[error("Failed to read sources file {}: {source}", .path.display())]
    SourcesUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No usable sources in {}", .0.display())]
    NoSources(PathBuf),

    #[error("All {0} sources failed to download or read")]
    AllSourcesFailed(usize),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    /// Process exit code for this error.
    ///
    /// Code 1 is reserved for usage errors, which clap reports before a
    /// `MergeError` can exist.
    pub fn exit_code(&self) -> u8 {
        match self {
            MergeError::SourcesNotFound(_) | MergeError::SourcesUnreadable { .. } => 2,
            MergeError::NoSources(_) => 3,
            MergeError::AllSourcesFailed(_) => 4,
            MergeError::Write { .. } => 5,
        }
    }
}

/// Exit code for an error returned by the merge pipeline.
///
/// Errors that are not a [`MergeError`] (for example a failure to build the
/// HTTP client) exit with 1.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<MergeError>()
        .map_or(1, MergeError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let not_found = MergeError::SourcesNotFound(PathBuf::from("lists.txt"));
        let empty = MergeError::NoSources(PathBuf::from("lists.txt"));
        let failed = MergeError::AllSourcesFailed(3);

        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(empty.exit_code(), 3);
        assert_eq!(failed.exit_code(), 4);
    }

    #[test]
    fn test_unreadable_is_configuration_error() {
        let err = MergeError::SourcesUnreadable {
            path: PathBuf::from("lists.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("lists.txt"));
    }

    #[test]
    fn test_write_error_message() {
        let err = MergeError::Write {
            path: PathBuf::from("/nonexistent/hosts"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("/nonexistent/hosts"));
    }

    #[test]
    fn test_exit_code_for_downcasts() {
        let err = anyhow::Error::from(MergeError::NoSources(PathBuf::from("s.txt")));
        assert_eq!(exit_code_for(&err), 3);

        let wrapped = err.context("while merging");
        assert_eq!(exit_code_for(&wrapped), 3);

        let other = anyhow::anyhow!("Failed to create HTTP client");
        assert_eq!(exit_code_for(&other), 1);
    }

    #[test]
    fn test_all_failed_message_has_count() {
        let err = MergeError::AllSourcesFailed(7);
        assert!(err.to_string().contains('7'));
    }
}
