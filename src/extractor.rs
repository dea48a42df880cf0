//! Domain extraction from heterogeneous blocklist text.
//!
//! A single line scanner handles hosts-format lists (`0.0.0.0 ads.example.com`),
//! plain domain lists (`ads.example.com`) and hosts lines carrying several
//! names after one sentinel address. Every whitespace-delimited field after the
//! optional sentinel is a candidate; candidates pass through a strict DNS label
//! grammar and are lowercased before landing in a [`DomainSet`].
//!
//! Field splitting does not understand prose: a free-text line such as
//! `see tracker.example.net for details` still yields `tracker.example.net`.
//! Plain domain lists have no prefix that could tell the two apart.

use std::borrow::Cow;
use std::collections::BTreeSet;

/// Deduplicated domains in ascending byte order.
pub type DomainSet = BTreeSet<String>;

/// Placeholder addresses that prefix names in hosts-format blocklists.
pub const SENTINEL_ADDRESSES: &[&str] = &["0.0.0.0", "127.0.0.1", "::", "::1"];

/// Hostnames found in stock hosts files that must never be blocked.
pub const RESERVED_HOSTNAMES: &[&str] = &["localhost", "localdomain", "broadcasthost"];

/// Counters gathered while scanning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    /// Lines left with content after comment stripping
    pub lines: usize,
    /// Fields considered as domain candidates
    pub candidates: usize,
    /// Candidates that passed validation (before deduplication)
    pub accepted: usize,
}

/// Incremental extractor fed one source at a time.
///
/// Each call to [`feed`](Self::feed) is scanned on its own, so the last line
/// of one source never runs into the first line of the next.
#[derive(Debug, Default)]
pub struct DomainExtractor {
    domains: DomainSet,
    stats: ExtractStats,
}

impl DomainExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every line of `text`.
    pub fn feed(&mut self, text: &str) {
        for line in text.lines() {
            self.scan_line(line);
        }
    }

    /// Consume the extractor, yielding the sorted domain set.
    pub fn finish(self) -> (DomainSet, ExtractStats) {
        (self.domains, self.stats)
    }

    fn scan_line(&mut self, raw: &str) {
        let line = if raw.contains('\r') {
            Cow::Owned(raw.replace('\r', ""))
        } else {
            Cow::Borrowed(raw)
        };

        let content = strip_inline_comment(line.trim());
        if content.is_empty() {
            return;
        }
        self.stats.lines += 1;

        let mut fields = content.split_whitespace().peekable();
        if fields
            .peek()
            .is_some_and(|first| SENTINEL_ADDRESSES.contains(first))
        {
            fields.next();
        }

        for field in fields {
            self.stats.candidates += 1;
            if let Some(domain) = normalize_candidate(field) {
                self.stats.accepted += 1;
                self.domains.insert(domain);
            }
        }
    }
}

/// Extract the domain set from a block of blocklist text.
///
/// # Examples
/// ```
/// use hostsmerge::extractor::extract_domains;
/// let domains = extract_domains("0.0.0.0 Ads.Example.COM\n# comment\nbad_domain\n");
/// assert_eq!(domains.into_iter().collect::<Vec<_>>(), vec!["ads.example.com"]);
/// ```
pub fn extract_domains(text: &str) -> DomainSet {
    extract_with_stats(text).0
}

/// Like [`extract_domains`], also returning scan counters.
pub fn extract_with_stats(text: &str) -> (DomainSet, ExtractStats) {
    let mut extractor = DomainExtractor::new();
    extractor.feed(text);
    extractor.finish()
}

/// Remove an inline comment: everything from the first `#`, along with the
/// whitespace in front of it.
pub fn strip_inline_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}

/// Turn one field into a normalized domain, or reject it.
///
/// Leading and trailing dots are dropped first, so the FQDN form
/// `ads.example.com.` is accepted.
pub fn normalize_candidate(field: &str) -> Option<String> {
    let token = field.trim_matches('.');
    if token.is_empty() {
        return None;
    }

    // URLs, IPv6 literals and host:port pairs
    if token.contains(|c: char| matches!(c, '/' | ':')) {
        return None;
    }

    if RESERVED_HOSTNAMES
        .iter()
        .any(|reserved| token.eq_ignore_ascii_case(reserved))
    {
        return None;
    }

    // Wildcards and email addresses
    if token.contains(|c: char| matches!(c, '*' | '@')) {
        return None;
    }

    if !is_valid_domain(token) {
        return None;
    }

    Some(token.to_ascii_lowercase())
}

/// Check a single DNS label: ASCII letters and digits, with hyphens allowed
/// only between them.
///
/// # Examples
/// ```
/// use hostsmerge::extractor::is_valid_label;
/// assert!(is_valid_label("good-one"));
/// assert!(is_valid_label("xn--bcher-kva"));
/// assert!(!is_valid_label("-bad"));
/// assert!(!is_valid_label(""));
/// ```
pub fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

/// Check a whole name: two or more valid labels joined by single dots.
///
/// # Examples
/// ```
/// use hostsmerge::extractor::is_valid_domain;
/// assert!(is_valid_domain("ads.example.com"));
/// assert!(!is_valid_domain("localhostname"));
/// assert!(!is_valid_domain("double..dot.com"));
/// ```
pub fn is_valid_domain(name: &str) -> bool {
    let mut labels = 0usize;
    for label in name.split('.') {
        if !is_valid_label(label) {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}
