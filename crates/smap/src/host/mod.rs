//! Static host built from the configuration file.
//!
//! Supplies what a CMS would: the base URL, a locale expander over the page
//! table, a `cms-page` adapter and one resolver per configured collection.

mod collections;
mod locales;
mod pages;

use std::sync::Arc;

use smap_config::{Config, MtimeValue};
use smap_core::{
    BaseUrl, LastModified, Limits, RenderOptions, ResolveContext, ResolverChain, ResolverStage,
    SitemapBuilder, ThemeContext, XmlRenderer,
};

use collections::CollectionResolver;
use locales::ConfigLocales;
use pages::PageResolver;

use crate::error::CliError;

/// Resolver chain for the configured pages and collections.
pub(crate) fn resolvers(config: &Config) -> ResolverChain {
    let mut chain = ResolverChain::new();
    if !config.pages.is_empty() {
        chain.register(ResolverStage::Adapter, PageResolver::new(&config.pages));
    }
    for collection in &config.collections {
        chain.register(
            collections::stage(collection.stage),
            CollectionResolver::new(collection),
        );
    }
    chain
}

/// Sitemap builder wired to the configured host.
pub(crate) fn builder(config: &Config) -> Result<SitemapBuilder, CliError> {
    let base = Arc::new(BaseUrl::parse(config.require_base_url()?)?);

    let mut builder = SitemapBuilder::new(Arc::<BaseUrl>::clone(&base))
        .with_resolvers(resolvers(config))
        .with_limits(Limits::new(
            config.limits.max_urls,
            config.limits.max_generated,
        ))
        .with_renderer(XmlRenderer::with_options(RenderOptions {
            indent: config.output_resolved.indent,
        }));

    if let Some(locales) = &config.locales {
        builder = builder.with_locales(Arc::new(ConfigLocales::new(
            locales,
            &config.pages,
            base,
        )));
    }
    Ok(builder)
}

/// Request context for the configured site.
pub(crate) fn context(config: &Config) -> ResolveContext {
    ResolveContext::new(
        config.site.current_path.clone(),
        ThemeContext::new(config.site.theme.clone()),
    )
}

fn to_lastmod(mtime: &MtimeValue) -> LastModified {
    match mtime {
        MtimeValue::Timestamp(secs) => LastModified::Timestamp(*secs),
        MtimeValue::Text(text) => LastModified::Text(text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smap_tree::{ItemTree, SitemapItemDefinition};

    fn config(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_config_limits_match_core_limits() {
        assert_eq!(smap_config::MAX_URLS, smap_core::MAX_URLS);
        assert_eq!(smap_config::MAX_GENERATED, smap_core::MAX_GENERATED);

        let limits = smap_config::LimitsConfig::default();
        assert_eq!(limits.max_urls, smap_core::MAX_URLS);
        assert_eq!(limits.max_generated, smap_core::MAX_GENERATED);
    }

    #[test]
    fn test_resolvers_follow_stage_order() {
        let config = config(
            r#"
[pages.about]
path = "/about"

[[collections]]
type = "menu-links"
stage = "menu"

[[collections]]
type = "all-blog-posts"
"#,
        );
        let described: Vec<_> = resolvers(&config)
            .describe()
            .map(|(stage, name)| (stage, name.to_owned()))
            .collect();

        assert_eq!(
            described,
            vec![
                (ResolverStage::Adapter, "pages".to_owned()),
                (ResolverStage::SitemapHook, "all-blog-posts".to_owned()),
                (ResolverStage::MenuItemHook, "menu-links".to_owned()),
            ]
        );
    }

    #[test]
    fn test_builder_requires_base_url() {
        let err = builder(&config("")).err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_context_from_site() {
        let ctx = context(&config(
            r#"
[site]
theme = "demo"
current_path = "/sitemap.xml"
"#,
        ));
        assert_eq!(ctx.current_path, "/sitemap.xml");
        assert_eq!(ctx.theme.code, "demo");
    }

    #[test]
    fn test_host_generates_localized_pages() {
        let config = config(
            r#"
[site]
base_url = "https://example.com"

[locales]
default = "en"
enabled = ["en", "fr"]

[pages.about]
path = "/about"
mtime = 1705314600
translations = { fr = "/a-propos" }
"#,
        );
        let tree = ItemTree::new(vec![
            SitemapItemDefinition::url("/"),
            SitemapItemDefinition::typed("cms-page").with_reference("about"),
        ]);

        let document = builder(&config)
            .unwrap()
            .build(&tree, &context(&config))
            .unwrap();
        let locs: Vec<_> = document.entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com",
                "https://example.com/about",
                "https://example.com/fr/a-propos",
            ]
        );
        assert_eq!(
            document.entries[2].lastmod,
            Some(LastModified::Timestamp(1_705_314_600))
        );
    }
}
