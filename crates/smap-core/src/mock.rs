//! Mock collaborators for testing.
//!
//! Provides [`MockResolver`] and [`MockLocales`] so builder behavior can be
//! exercised without a host application.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use smap_tree::SitemapItemDefinition;

use crate::locale::LocaleExpander;
use crate::resolution::Resolution;
use crate::resolver::{ResolveContext, Resolver};

/// Resolver returning canned results per item type.
///
/// # Example
///
/// ```ignore
/// use smap_core::{MockResolver, Resolution};
///
/// let resolver = MockResolver::new().with_result("blog-post", Resolution::entry("/blog/a"));
/// ```
#[derive(Debug, Default)]
pub struct MockResolver {
    name: String,
    supported: Option<HashSet<String>>,
    results: HashMap<String, Resolution>,
    calls: AtomicUsize,
}

impl MockResolver {
    /// Create a resolver with no results.
    #[must_use]
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a resolver with a name for logs.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Return `resolution` for items of `item_type`.
    #[must_use]
    pub fn with_result(mut self, item_type: impl Into<String>, resolution: Resolution) -> Self {
        self.results.insert(item_type.into(), resolution);
        self
    }

    /// Only accept the given item types.
    #[must_use]
    pub fn supporting(mut self, item_types: &[&str]) -> Self {
        self.supported = Some(item_types.iter().map(|&t| t.to_owned()).collect());
        self
    }

    /// Number of `resolve` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Resolver for MockResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, item_type: &str) -> bool {
        self.supported
            .as_ref()
            .is_none_or(|supported| supported.contains(item_type))
    }

    fn resolve(&self, item: &SitemapItemDefinition, _ctx: &ResolveContext) -> Option<Resolution> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.results.get(&item.item_type).cloned()
    }
}

/// Locale expander with predictable URLs.
///
/// `path_for(reference, locale)` returns
/// `https://example.test/{locale}/{reference}` unless overridden.
#[derive(Debug)]
pub struct MockLocales {
    active: bool,
    default: String,
    enabled: Vec<String>,
    overrides: HashMap<(String, String), Option<String>>,
}

impl MockLocales {
    /// Create an active expander.
    #[must_use]
    pub fn new(default: &str, enabled: &[&str]) -> Self {
        Self {
            active: true,
            default: default.to_owned(),
            enabled: enabled.iter().map(|&l| l.to_owned()).collect(),
            overrides: HashMap::new(),
        }
    }

    /// Mark the expander inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Use a specific URL for a page in a locale.
    #[must_use]
    pub fn with_path(mut self, reference: &str, locale: &str, url: &str) -> Self {
        self.overrides.insert(
            (reference.to_owned(), locale.to_owned()),
            Some(url.to_owned()),
        );
        self
    }

    /// Report no URL for a page in a locale.
    #[must_use]
    pub fn without_path(mut self, reference: &str, locale: &str) -> Self {
        self.overrides
            .insert((reference.to_owned(), locale.to_owned()), None);
        self
    }
}

impl LocaleExpander for MockLocales {
    fn is_active(&self) -> bool {
        self.active
    }

    fn default_locale(&self) -> String {
        self.default.clone()
    }

    fn enabled_locales(&self) -> Vec<String> {
        self.enabled.clone()
    }

    fn path_for(&self, reference: &str, locale: &str) -> Option<String> {
        match self
            .overrides
            .get(&(reference.to_owned(), locale.to_owned()))
        {
            Some(url) => url.clone(),
            None => Some(format!("https://example.test/{locale}/{reference}")),
        }
    }
}
