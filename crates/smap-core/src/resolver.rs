//! Prioritized resolver chain.
//!
//! Typed definitions are handed to resolvers in a fixed stage order:
//! host adapters for well-known content types first, then custom sitemap
//! resolution hooks, then the generic menu-item fallback. Within a stage
//! resolvers run in registration order. The first non-empty result wins,
//! so a host adapter always shadows the generic hooks for its types.

use std::fmt;

use smap_tree::SitemapItemDefinition;

use crate::resolution::Resolution;

/// Priority stage of a resolver. Earlier stages win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolverStage {
    /// Host adapters for well-known content types.
    Adapter,
    /// Listeners of the custom sitemap resolution hook.
    SitemapHook,
    /// Listeners of the generic menu-item resolution hook.
    MenuItemHook,
}

impl ResolverStage {
    /// All stages in priority order.
    pub const ALL: [Self; 3] = [Self::Adapter, Self::SitemapHook, Self::MenuItemHook];

    /// Short stage name used in logs and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adapter => "adapter",
            Self::SitemapHook => "sitemap",
            Self::MenuItemHook => "menu",
        }
    }
}

impl fmt::Display for ResolverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active theme or site, opaque to the builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeContext {
    /// Theme code.
    pub code: String,
}

impl ThemeContext {
    /// Create a theme context.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Request context passed through to every resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveContext {
    /// Path of the request that asked for the sitemap.
    pub current_path: String,
    /// Active theme.
    pub theme: ThemeContext,
}

impl ResolveContext {
    /// Create a request context.
    #[must_use]
    pub fn new(current_path: impl Into<String>, theme: ThemeContext) -> Self {
        Self {
            current_path: current_path.into(),
            theme,
        }
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new("/", ThemeContext::default())
    }
}

/// Strategy that expands a typed definition into concrete URLs.
pub trait Resolver: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether this resolver handles the given item type at all.
    fn supports(&self, item_type: &str) -> bool {
        let _ = item_type;
        true
    }

    /// Resolve a definition. `None` or an empty result passes to the next resolver.
    fn resolve(&self, item: &SitemapItemDefinition, ctx: &ResolveContext) -> Option<Resolution>;
}

impl<F> Resolver for F
where
    F: Fn(&SitemapItemDefinition, &ResolveContext) -> Option<Resolution> + Send + Sync,
{
    fn resolve(&self, item: &SitemapItemDefinition, ctx: &ResolveContext) -> Option<Resolution> {
        self(item, ctx)
    }
}

struct Registered {
    stage: ResolverStage,
    resolver: Box<dyn Resolver>,
}

/// Resolvers ordered by stage, then by registration.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Registered>,
}

impl ResolverChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver in a stage.
    ///
    /// It runs after every resolver of an earlier stage and after resolvers
    /// already registered in the same stage.
    pub fn register(&mut self, stage: ResolverStage, resolver: impl Resolver + 'static) -> &mut Self {
        let position = self
            .resolvers
            .iter()
            .position(|registered| registered.stage > stage)
            .unwrap_or(self.resolvers.len());
        self.resolvers.insert(
            position,
            Registered {
                stage,
                resolver: Box::new(resolver),
            },
        );
        self
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, stage: ResolverStage, resolver: impl Resolver + 'static) -> Self {
        self.register(stage, resolver);
        self
    }

    /// Number of registered resolvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// True when no resolver is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// `(stage, name)` of every resolver in call order.
    pub fn describe(&self) -> impl Iterator<Item = (ResolverStage, &str)> {
        self.resolvers
            .iter()
            .map(|registered| (registered.stage, registered.resolver.name()))
    }

    /// True when at least one resolver accepts the item type.
    #[must_use]
    pub fn supports(&self, item_type: &str) -> bool {
        self.resolvers
            .iter()
            .any(|registered| registered.resolver.supports(item_type))
    }

    /// Ask resolvers in priority order and return the first non-empty result.
    #[must_use]
    pub fn resolve(&self, item: &SitemapItemDefinition, ctx: &ResolveContext) -> Option<Resolution> {
        for registered in &self.resolvers {
            if !registered.resolver.supports(&item.item_type) {
                continue;
            }
            match registered.resolver.resolve(item, ctx) {
                Some(resolution) if !resolution.is_empty() => {
                    tracing::debug!(
                        item_type = %item.item_type,
                        stage = %registered.stage,
                        resolver = registered.resolver.name(),
                        entries = resolution.entry_count(),
                        "Resolved sitemap item"
                    );
                    return Some(resolution);
                }
                _ => {}
            }
        }
        None
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.describe()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockResolver;
    use pretty_assertions::assert_eq;

    fn item(item_type: &str) -> SitemapItemDefinition {
        SitemapItemDefinition::typed(item_type)
    }

    #[test]
    fn test_stage_order() {
        assert!(ResolverStage::Adapter < ResolverStage::SitemapHook);
        assert!(ResolverStage::SitemapHook < ResolverStage::MenuItemHook);
        assert_eq!(ResolverStage::MenuItemHook.to_string(), "menu");
    }

    #[test]
    fn test_empty_chain_resolves_nothing() {
        let chain = ResolverChain::new();
        assert!(chain.resolve(&item("blog-post"), &ResolveContext::default()).is_none());
    }

    #[test]
    fn test_adapter_wins_over_hooks_regardless_of_registration_order() {
        let chain = ResolverChain::new()
            .with(
                ResolverStage::MenuItemHook,
                MockResolver::new().with_result("page", Resolution::entry("/menu")),
            )
            .with(
                ResolverStage::SitemapHook,
                MockResolver::new().with_result("page", Resolution::entry("/hook")),
            )
            .with(
                ResolverStage::Adapter,
                MockResolver::new().with_result("page", Resolution::entry("/adapter")),
            );

        let resolved = chain.resolve(&item("page"), &ResolveContext::default());
        assert_eq!(resolved, Some(Resolution::entry("/adapter")));
    }

    #[test]
    fn test_empty_results_fall_through() {
        let chain = ResolverChain::new()
            .with(
                ResolverStage::Adapter,
                MockResolver::new().with_result("page", Resolution::group([])),
            )
            .with(
                ResolverStage::SitemapHook,
                MockResolver::new().with_result("page", Resolution::Empty),
            )
            .with(
                ResolverStage::MenuItemHook,
                MockResolver::new().with_result("page", Resolution::entry("/fallback")),
            );

        let resolved = chain.resolve(&item("page"), &ResolveContext::default());
        assert_eq!(resolved, Some(Resolution::entry("/fallback")));
    }

    #[test]
    fn test_same_stage_keeps_registration_order() {
        let mut chain = ResolverChain::new();
        chain
            .register(
                ResolverStage::SitemapHook,
                MockResolver::new().with_result("page", Resolution::entry("/first")),
            )
            .register(
                ResolverStage::SitemapHook,
                MockResolver::new().with_result("page", Resolution::entry("/second")),
            );

        let resolved = chain.resolve(&item("page"), &ResolveContext::default());
        assert_eq!(resolved, Some(Resolution::entry("/first")));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_unsupported_type_skips_resolver() {
        let adapter = MockResolver::new()
            .supporting(&["blog-post"])
            .with_result("page", Resolution::entry("/adapter"));
        let chain = ResolverChain::new()
            .with(ResolverStage::Adapter, adapter)
            .with(
                ResolverStage::SitemapHook,
                MockResolver::new().with_result("page", Resolution::entry("/hook")),
            );

        let resolved = chain.resolve(&item("page"), &ResolveContext::default());
        assert_eq!(resolved, Some(Resolution::entry("/hook")));
    }

    #[test]
    fn test_supports_any_registered() {
        let chain = ResolverChain::new()
            .with(ResolverStage::Adapter, MockResolver::new().supporting(&["blog-post"]));
        assert!(chain.supports("blog-post"));
        assert!(!chain.supports("page"));
        assert!(!ResolverChain::new().supports("page"));
    }

    #[test]
    fn test_closure_resolver_receives_context() {
        let chain = ResolverChain::new().with(
            ResolverStage::SitemapHook,
            |item: &SitemapItemDefinition, ctx: &ResolveContext| {
                Some(Resolution::entry(format!(
                    "{}{}?theme={}",
                    ctx.current_path,
                    item.reference.as_deref().unwrap_or_default(),
                    ctx.theme.code
                )))
            },
        );

        let ctx = ResolveContext::new("/sitemap.xml/", ThemeContext::new("demo"));
        let resolved = chain.resolve(&item("page").with_reference("about"), &ctx);
        assert_eq!(
            resolved,
            Some(Resolution::entry("/sitemap.xml/about?theme=demo"))
        );
    }

    #[test]
    fn test_describe_lists_call_order() {
        let chain = ResolverChain::new()
            .with(ResolverStage::MenuItemHook, MockResolver::named("menu"))
            .with(ResolverStage::Adapter, MockResolver::named("blog"));

        let described: Vec<_> = chain.describe().collect();
        assert_eq!(
            described,
            vec![
                (ResolverStage::Adapter, "blog"),
                (ResolverStage::MenuItemHook, "menu")
            ]
        );
    }
}
