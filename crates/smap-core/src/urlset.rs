//! Bounded URL collection.
//!
//! [`UrlSet`] owns the run-scoped URL counter. Once the protocol cap is
//! reached further pushes are silently refused; the caller keeps walking.

use chrono::{DateTime, FixedOffset};
use smap_tree::MetaValue;

use crate::lastmod::LastModified;
use crate::resolution::LocaleUrls;

/// Maximum URLs in one sitemap document (protocol limit).
pub const MAX_URLS: usize = 50_000;

/// Maximum URLs a single definition may contribute.
pub const MAX_GENERATED: usize = 10_000;

/// Emission limits for one generation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Document-wide cap, never above [`MAX_URLS`].
    pub max_urls: usize,
    /// Per-definition cap.
    pub max_generated: usize,
}

impl Limits {
    /// Create limits, clamping `max_urls` to the protocol cap.
    #[must_use]
    pub fn new(max_urls: usize, max_generated: usize) -> Self {
        Self {
            max_urls: max_urls.min(MAX_URLS),
            max_generated,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(MAX_URLS, MAX_GENERATED)
    }
}

/// One `url` element of the sitemap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlEntry {
    /// Page location.
    pub loc: String,
    /// Last modification; generation time when absent.
    pub lastmod: Option<LastModified>,
    /// Change frequency from the definition.
    pub changefreq: Option<MetaValue>,
    /// Priority from the definition.
    pub priority: Option<MetaValue>,
    /// Every locale variant of the page, including this one.
    pub alternates: LocaleUrls,
}

impl UrlEntry {
    /// Entry for a location with no metadata.
    #[must_use]
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
            alternates: LocaleUrls::new(),
        }
    }
}

/// Ordered, capped list of URL entries.
#[derive(Debug)]
pub struct UrlSet {
    entries: Vec<UrlEntry>,
    max_urls: usize,
    dropped: usize,
}

impl UrlSet {
    /// Create an empty set holding at most `max_urls` entries.
    #[must_use]
    pub fn new(max_urls: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_urls,
            dropped: 0,
        }
    }

    /// Append an entry. Returns `false` without adding once the cap is reached.
    pub fn push(&mut self, entry: UrlEntry) -> bool {
        if self.is_full() {
            if self.dropped == 0 {
                tracing::warn!(
                    max_urls = self.max_urls,
                    "Sitemap URL limit reached, further URLs are dropped"
                );
            }
            self.dropped += 1;
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Number of accepted entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the cap is reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_urls
    }

    /// Number of refused pushes.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Accepted entries in push order.
    #[must_use]
    pub fn into_entries(self) -> Vec<UrlEntry> {
        self.entries
    }
}

/// Counters reported for one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Definitions visited, including nested children.
    pub definitions: usize,
    /// Typed definitions no resolver produced anything for.
    pub unresolved: usize,
    /// URL elements in the document.
    pub emitted: usize,
    /// URL elements refused at the document cap.
    pub dropped_at_cap: usize,
    /// URL elements refused at the per-definition cap.
    pub dropped_at_type_limit: usize,
}

impl GenerationStats {
    /// True when any URL was dropped by a limit.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.dropped_at_cap > 0 || self.dropped_at_type_limit > 0
    }
}

/// Assembled sitemap, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitemapDocument {
    /// URL elements in document order.
    pub entries: Vec<UrlEntry>,
    /// Instant used for entries without a last-modified value.
    pub generated_at: DateTime<FixedOffset>,
    /// Pass counters.
    pub stats: GenerationStats,
}

impl SitemapDocument {
    /// Number of URL elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the document has no URL element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut set = UrlSet::new(2);
        assert!(set.push(UrlEntry::new("/a")));
        assert!(set.push(UrlEntry::new("/b")));
        assert!(set.is_full());
        assert!(!set.push(UrlEntry::new("/c")));
        assert!(!set.push(UrlEntry::new("/d")));

        assert_eq!(set.len(), 2);
        assert_eq!(set.dropped(), 2);
        let locs: Vec<_> = set.into_entries().into_iter().map(|e| e.loc).collect();
        assert_eq!(locs, vec!["/a", "/b"]);
    }

    #[test]
    fn test_zero_capacity_refuses_everything() {
        let mut set = UrlSet::new(0);
        assert!(!set.push(UrlEntry::new("/a")));
        assert!(set.is_empty());
    }

    #[test]
    fn test_limits_clamped_to_protocol_cap() {
        let limits = Limits::new(80_000, 5);
        assert_eq!(limits.max_urls, MAX_URLS);
        assert_eq!(limits.max_generated, 5);
        assert_eq!(Limits::default(), Limits::new(MAX_URLS, MAX_GENERATED));
    }

    #[test]
    fn test_stats_truncation() {
        let mut stats = GenerationStats::default();
        assert!(!stats.is_truncated());
        stats.dropped_at_type_limit = 1;
        assert!(stats.is_truncated());
    }
}
