//! Static URL collections from `[[collections]]`.

use smap_config::{CollectionConfig, EntryConfig, StageName};
use smap_core::{ResolveContext, ResolvedEntry, Resolution, Resolver, ResolverStage};
use smap_tree::SitemapItemDefinition;

use super::to_lastmod;

/// Resolves one item type to a fixed set of URLs.
pub(crate) struct CollectionResolver {
    item_type: String,
    resolution: Resolution,
}

impl CollectionResolver {
    pub(crate) fn new(collection: &CollectionConfig) -> Self {
        Self {
            item_type: collection.item_type.clone(),
            resolution: Resolution::group(collection.entries.iter().map(to_resolution)),
        }
    }
}

impl Resolver for CollectionResolver {
    fn name(&self) -> &str {
        &self.item_type
    }

    fn supports(&self, item_type: &str) -> bool {
        item_type == self.item_type
    }

    fn resolve(&self, _item: &SitemapItemDefinition, _ctx: &ResolveContext) -> Option<Resolution> {
        Some(self.resolution.clone())
    }
}

/// Resolver stage for a configured stage name.
pub(crate) fn stage(name: StageName) -> ResolverStage {
    match name {
        StageName::Adapter => ResolverStage::Adapter,
        StageName::Sitemap => ResolverStage::SitemapHook,
        StageName::Menu => ResolverStage::MenuItemHook,
    }
}

fn to_resolution(entry: &EntryConfig) -> Resolution {
    let mut resolved = ResolvedEntry::new(entry.url.clone())
        .with_alternates(
            entry
                .alternates
                .iter()
                .map(|alternate| (alternate.locale.as_str(), alternate.url.as_str()))
                .collect(),
        )
        .with_children(entry.items.iter().map(to_resolution).collect());
    resolved.mtime = entry.mtime.as_ref().map(to_lastmod);
    resolved.into()
}
