//! Sitemap generation for smap.
//!
//! This crate turns an [`ItemTree`](smap_tree::ItemTree) of sitemap
//! definitions into a sitemap protocol 0.9 XML document:
//!
//! - **Resolution**: typed definitions are expanded into concrete URLs by a
//!   prioritized [`ResolverChain`] (host adapters, then sitemap hooks, then
//!   menu-item hooks)
//! - **Locales**: CMS pages fan out to one URL per enabled locale through a
//!   host [`LocaleExpander`], with `xhtml:link` alternates
//! - **Limits**: at most [`MAX_URLS`] URL elements per document and
//!   [`MAX_GENERATED`] per definition
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use smap_core::{BaseUrl, ResolveContext, SitemapBuilder};
//! use smap_tree::{ItemTree, SitemapItemDefinition};
//!
//! let base = BaseUrl::parse("https://example.com").unwrap();
//! let builder = SitemapBuilder::new(Arc::new(base));
//! let tree = ItemTree::new(vec![SitemapItemDefinition::url("/about")]);
//!
//! let xml = builder.generate(&tree, &ResolveContext::default()).unwrap().unwrap();
//! assert!(xml.contains("<loc>https://example.com/about</loc>"));
//! ```

mod builder;
mod error;
mod lastmod;
mod locale;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod render;
mod resolution;
mod resolver;
mod url;
mod urlset;

pub use builder::SitemapBuilder;
pub use error::SitemapError;
pub use lastmod::{LastModified, format_instant};
pub use locale::{CMS_PAGE_TYPE, LocaleExpander};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockLocales, MockResolver};
pub use render::{RenderOptions, SCHEMA_LOCATION, SITEMAP_NS, XHTML_NS, XSI_NS, XmlRenderer};
pub use resolution::{LocaleUrls, ResolvedEntry, Resolution};
pub use resolver::{ResolveContext, Resolver, ResolverChain, ResolverStage, ThemeContext};
pub use url::{BaseUrl, UrlResolver};
pub use urlset::{
    GenerationStats, Limits, MAX_GENERATED, MAX_URLS, SitemapDocument, UrlEntry, UrlSet,
};
