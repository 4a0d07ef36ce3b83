//! Adapter for `cms-page` definitions.

use std::collections::BTreeMap;

use smap_config::PageConfig;
use smap_core::{CMS_PAGE_TYPE, ResolveContext, ResolvedEntry, Resolution, Resolver};
use smap_tree::SitemapItemDefinition;

use super::to_lastmod;

/// Resolves `cms-page` definitions through the `[pages.*]` table.
///
/// Yields the default-locale path; locale fan-out happens in the builder.
pub(crate) struct PageResolver {
    pages: BTreeMap<String, ResolvedEntry>,
}

impl PageResolver {
    pub(crate) fn new(pages: &BTreeMap<String, PageConfig>) -> Self {
        let pages = pages
            .iter()
            .map(|(reference, page)| {
                let mut entry = ResolvedEntry::new(page.path.clone());
                entry.mtime = page.mtime.as_ref().map(to_lastmod);
                (reference.clone(), entry)
            })
            .collect();
        Self { pages }
    }
}

impl Resolver for PageResolver {
    fn name(&self) -> &str {
        "pages"
    }

    fn supports(&self, item_type: &str) -> bool {
        item_type == CMS_PAGE_TYPE
    }

    fn resolve(&self, item: &SitemapItemDefinition, _ctx: &ResolveContext) -> Option<Resolution> {
        let reference = item.reference.as_deref()?;
        match self.pages.get(reference) {
            Some(entry) => Some(Resolution::Entry(entry.clone())),
            None => {
                tracing::debug!(reference, "Unknown CMS page");
                None
            }
        }
    }
}
