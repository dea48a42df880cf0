//! Hosts file rendering and atomic output.

use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::MergeError;
use crate::extractor::DomainSet;
use crate::sources::SourceEntry;

/// First words of the generated header line
pub const HEADER_TITLE: &str = "# Consolidated Pi-hole hosts generated on";

/// Address every domain is pointed at
pub const BLOCK_ADDRESS: &str = "0.0.0.0";

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use hostsmerge::writer::format_timestamp;
/// let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-03-09T07:05:00Z");
/// ```
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Render the complete hosts document.
///
/// The header echoes every source in sources-file order, including ones that
/// failed to download.
pub fn render_hosts(
    domains: &DomainSet,
    sources: &[SourceEntry],
    generated_at: &DateTime<Utc>,
) -> String {
    let estimate = domains.iter().map(|d| d.len() + BLOCK_ADDRESS.len() + 2).sum::<usize>()
        + sources.iter().map(|s| s.raw.len() + 3).sum::<usize>()
        + 128;
    let mut out = String::with_capacity(estimate);

    out.push_str(&format!("{} {}\n", HEADER_TITLE, format_timestamp(generated_at)));
    out.push_str("# Sources:\n");
    for source in sources {
        out.push_str(&format!("# {}\n", source.raw));
    }
    for domain in domains {
        out.push_str(BLOCK_ADDRESS);
        out.push(' ');
        out.push_str(domain);
        out.push('\n');
    }
    out
}

/// Write `contents` to `path` atomically.
///
/// Data goes to a temporary file next to the destination, is synced, then
/// renamed over it. On error the destination is left as it was and the
/// temporary file is removed.
pub fn write_hosts_atomic(path: &Path, contents: &str) -> Result<(), MergeError> {
    let write_err = |source: std::io::Error| MergeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;
    temp_file.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_sources;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn domain_set(names: &[&str]) -> DomainSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_hosts_layout() {
        let sources = parse_sources("https://a.example/hosts\n# skipped\n/etc/local.txt\n");
        let domains = domain_set(&["b.example.com", "a.example.com"]);

        let rendered = render_hosts(&domains, &sources, &fixed_time());
        assert_eq!(
            rendered,
            "# Consolidated Pi-hole hosts generated on 2024-01-02T03:04:05Z\n\
             # Sources:\n\
             # https://a.example/hosts\n\
             # /etc/local.txt\n\
             0.0.0.0 a.example.com\n\
             0.0.0.0 b.example.com\n"
        );
    }

    #[test]
    fn test_render_hosts_echoes_raw_source_text() {
        let sources = parse_sources("  https://a.example/hosts  \n");
        let rendered = render_hosts(&DomainSet::new(), &sources, &fixed_time());
        assert!(rendered.contains("\n#   https://a.example/hosts  \n"));
    }

    #[test]
    fn test_render_hosts_no_domains() {
        let sources = parse_sources("/etc/local.txt\n");
        let rendered = render_hosts(&DomainSet::new(), &sources, &fixed_time());
        assert_eq!(rendered.lines().count(), 3);
        assert!(!rendered.contains("0.0.0.0 "));
    }

    #[test]
    fn test_render_is_deterministic() {
        let sources = parse_sources("a.txt\nb.txt\n");
        let domains = domain_set(&["x.example.com", "y.example.com"]);
        assert_eq!(
            render_hosts(&domains, &sources, &fixed_time()),
            render_hosts(&domains, &sources, &fixed_time())
        );
    }

    #[test]
    fn test_write_hosts_atomic_creates_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hosts");

        write_hosts_atomic(&path, "first\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");

        write_hosts_atomic(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");

        // No temp files left behind
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_hosts_atomic_missing_dir() {
        let err = write_hosts_atomic(Path::new("/nonexistent/dir/hosts"), "x\n").unwrap_err();
        assert!(matches!(err, MergeError::Write { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_write_hosts_atomic_failure_leaves_destination() {
        let temp_dir = TempDir::new().unwrap();
        // Destination is a non-empty directory: rename over it fails
        let dest = temp_dir.path().join("hosts");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep"), "keep").unwrap();

        assert!(write_hosts_atomic(&dest, "new\n").is_err());
        assert!(dest.is_dir());
        assert_eq!(std::fs::read_to_string(dest.join("keep")).unwrap(), "keep");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
