//! Filesystem abstraction layer for testability
//!
//! The loader reads the sources file and local blocklists through the
//! [`FileSystem`] trait so tests can substitute a mock (generated by mockall
//! in test builds) instead of touching the real filesystem.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Read-side filesystem operations used by the loader.
///
/// # Example (testing)
/// ```ignore
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_exists().returning(|_| true);
/// mock_fs.expect_read()
///     .returning(|_| Ok(b"0.0.0.0 ads.example.com\n".to_vec()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read file contents as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path exists and is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> bool;
}

/// Production implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}
