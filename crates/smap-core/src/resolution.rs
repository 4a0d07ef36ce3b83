//! Resolver results.
//!
//! A resolver turns one typed definition into a [`Resolution`]: a single
//! entry, a list of entries standing side by side, a group of nested
//! resolutions of any depth, or nothing.

use serde_json::Value;

use crate::lastmod::LastModified;

/// Insertion-ordered map from locale code to absolute URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocaleUrls(Vec<(String, String)>);

impl LocaleUrls {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a locale URL.
    ///
    /// An existing locale keeps its position and gets the new URL.
    pub fn insert(&mut self, locale: impl Into<String>, url: impl Into<String>) {
        let locale = locale.into();
        let url = url.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == locale) {
            Some(slot) => slot.1 = url,
            None => self.0.push((locale, url)),
        }
    }

    /// URL for a locale.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == locale)
            .map(|(_, url)| url.as_str())
    }

    /// Number of locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no locale is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(locale, url)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(locale, url)| (locale.as_str(), url.as_str()))
    }
}

impl<L: Into<String>, U: Into<String>> FromIterator<(L, U)> for LocaleUrls {
    fn from_iter<I: IntoIterator<Item = (L, U)>>(iter: I) -> Self {
        let mut urls = Self::new();
        for (locale, url) in iter {
            urls.insert(locale, url);
        }
        urls
    }
}

/// One concrete URL produced by a resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Absolute URL. Ignored when `alternates` is non-empty.
    pub url: String,
    /// Last modification time; generation time when absent.
    pub mtime: Option<LastModified>,
    /// Per-locale variants of this URL.
    pub alternates: LocaleUrls,
    /// Nested results, flattened after this entry.
    pub children: Vec<Resolution>,
}

impl ResolvedEntry {
    /// Create an entry for a URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mtime: None,
            alternates: LocaleUrls::new(),
            children: Vec::new(),
        }
    }

    /// Set the last modification time.
    #[must_use]
    pub fn with_mtime(mut self, mtime: impl Into<LastModified>) -> Self {
        self.mtime = Some(mtime.into());
        self
    }

    /// Add one locale alternate.
    #[must_use]
    pub fn with_alternate(mut self, locale: impl Into<String>, url: impl Into<String>) -> Self {
        self.alternates.insert(locale, url);
        self
    }

    /// Replace the locale alternates.
    #[must_use]
    pub fn with_alternates(mut self, alternates: LocaleUrls) -> Self {
        self.alternates = alternates;
        self
    }

    /// Set nested results.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Resolution>) -> Self {
        self.children = children;
        self
    }

    /// True when the entry has neither a URL nor locale alternates.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.url.trim().is_empty() && self.alternates.is_empty()
    }
}

/// Structured result of resolving one definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A single URL, possibly with nested results.
    Entry(ResolvedEntry),
    /// Several results for the definition itself, each handled as if the
    /// resolver had returned it alone.
    List(Vec<Resolution>),
    /// Nested results without a URL of their own.
    Group(Vec<Resolution>),
    /// Nothing to contribute.
    Empty,
}

impl Resolution {
    /// Single entry for a URL.
    #[must_use]
    pub fn entry(url: impl Into<String>) -> Self {
        Self::Entry(ResolvedEntry::new(url))
    }

    /// List of results for the definition itself.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Resolution>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Group of nested results.
    #[must_use]
    pub fn group(items: impl IntoIterator<Item = Resolution>) -> Self {
        Self::Group(items.into_iter().collect())
    }

    /// True when the result holds no entry at any depth.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Entry(entry) => entry.is_blank() && entry.children.iter().all(Self::is_empty),
            Self::List(items) | Self::Group(items) => items.iter().all(Self::is_empty),
            Self::Empty => true,
        }
    }

    /// Number of entries at any depth.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Entry(entry) => {
                usize::from(!entry.is_blank())
                    + entry.children.iter().map(Self::entry_count).sum::<usize>()
            }
            Self::List(items) | Self::Group(items) => items.iter().map(Self::entry_count).sum(),
            Self::Empty => 0,
        }
    }

    /// Read a loosely-typed result.
    ///
    /// Accepts mappings shaped `{url, mtime?, alternate_locale_urls?, items?}`
    /// and arrays of them. An outermost array becomes a [`Resolution::List`];
    /// arrays below it become groups. A mapping with both `url` and `items`
    /// yields an entry whose children are the items. Anything that is not a
    /// mapping or an array is skipped.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::List(json_items(items)),
            _ => json_nested(value),
        }
    }
}

fn json_nested(value: &Value) -> Resolution {
    match value {
        Value::Array(items) => Resolution::Group(json_items(items)),
        Value::Object(map) => {
            let url = map
                .get("url")
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty());
            let children = map
                .get("items")
                .and_then(Value::as_array)
                .map(|items| json_items(items));

            match (url, children) {
                (Some(url), children) => Resolution::Entry(ResolvedEntry {
                    url: url.to_owned(),
                    mtime: map.get("mtime").and_then(json_mtime),
                    alternates: map
                        .get("alternate_locale_urls")
                        .map(json_alternates)
                        .unwrap_or_default(),
                    children: children.unwrap_or_default(),
                }),
                (None, Some(children)) => Resolution::Group(children),
                (None, None) => Resolution::Empty,
            }
        }
        _ => {
            tracing::debug!(value = %value, "Skipping malformed resolver result");
            Resolution::Empty
        }
    }
}

impl From<ResolvedEntry> for Resolution {
    fn from(entry: ResolvedEntry) -> Self {
        Self::Entry(entry)
    }
}

fn json_items(items: &[Value]) -> Vec<Resolution> {
    items
        .iter()
        .map(json_nested)
        .filter(|resolution| !matches!(resolution, Resolution::Empty))
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn json_mtime(value: &Value) -> Option<LastModified> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|secs| secs as i64))
            .map(LastModified::Timestamp),
        Value::String(text) if !text.trim().is_empty() => Some(LastModified::Text(text.clone())),
        _ => None,
    }
}

fn json_alternates(value: &Value) -> LocaleUrls {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(locale, url)| url.as_str().map(|url| (locale.as_str(), url)))
                .collect()
        })
        .unwrap_or_default()
}
