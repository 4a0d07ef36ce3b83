//! Sitemap assembly.
//!
//! [`SitemapBuilder`] walks the definition tree, asks the resolver chain
//! about every typed definition, flattens the results and collects the
//! URL entries of one document. Per-run state (URL counter, entries, stats)
//! lives in a private pass value, so a single builder can serve concurrent
//! requests.
//!
//! # Walk order
//!
//! Definitions are visited depth-first in tree order; `children` come right
//! after their parent and inherit its `changefreq`/`priority` unless they
//! set their own. Resolution results are flattened the same way: an entry,
//! then its nested results. Entries of a [`Resolution::List`] count as
//! top-level results of the definition; only those get locale fan-out.
//!
//! # Limits
//!
//! Reaching a limit never stops the walk. Every definition is still visited
//! and resolved; only emission is refused.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use smap_tree::{ItemTree, MetaValue, SitemapItemDefinition};

use crate::error::SitemapError;
use crate::lastmod::LastModified;
use crate::locale::{CMS_PAGE_TYPE, LocaleExpander, LocalePlan};
use crate::render::XmlRenderer;
use crate::resolution::{LocaleUrls, Resolution};
use crate::resolver::{ResolveContext, ResolverChain};
use crate::url::UrlResolver;
use crate::urlset::{GenerationStats, Limits, SitemapDocument, UrlEntry, UrlSet};

/// Builds sitemap documents from definition trees.
pub struct SitemapBuilder {
    resolvers: ResolverChain,
    urls: Arc<dyn UrlResolver>,
    locales: Option<Arc<dyn LocaleExpander>>,
    limits: Limits,
    renderer: XmlRenderer,
}

impl SitemapBuilder {
    /// Create a builder with no resolvers and no locale expansion.
    #[must_use]
    pub fn new(urls: Arc<dyn UrlResolver>) -> Self {
        Self {
            resolvers: ResolverChain::new(),
            urls,
            locales: None,
            limits: Limits::default(),
            renderer: XmlRenderer::new(),
        }
    }

    /// Use a resolver chain.
    #[must_use]
    pub fn with_resolvers(mut self, resolvers: ResolverChain) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Enable locale fan-out through a host expander.
    #[must_use]
    pub fn with_locales(mut self, locales: Arc<dyn LocaleExpander>) -> Self {
        self.locales = Some(locales);
        self
    }

    /// Override emission limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Override the XML renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: XmlRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Registered resolvers.
    #[must_use]
    pub fn resolvers(&self) -> &ResolverChain {
        &self.resolvers
    }

    /// Active limits.
    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Generate sitemap XML.
    ///
    /// Returns `Ok(None)` for an empty tree: there is no sitemap to generate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the XML writer fails.
    pub fn generate(
        &self,
        tree: &ItemTree,
        ctx: &ResolveContext,
    ) -> Result<Option<String>, SitemapError> {
        match self.build(tree, ctx) {
            Some(document) => self.renderer.render(&document).map(Some),
            None => Ok(None),
        }
    }

    /// Render an assembled document with this builder's renderer.
    ///
    /// # Errors
    ///
    /// Returns an error only if the XML writer fails.
    pub fn render(&self, document: &SitemapDocument) -> Result<String, SitemapError> {
        self.renderer.render(document)
    }

    /// Assemble the document without rendering it.
    #[must_use]
    pub fn build(&self, tree: &ItemTree, ctx: &ResolveContext) -> Option<SitemapDocument> {
        self.build_at(tree, ctx, Utc::now().fixed_offset())
    }

    /// Assemble the document with a fixed generation instant.
    #[must_use]
    pub fn build_at(
        &self,
        tree: &ItemTree,
        ctx: &ResolveContext,
        now: DateTime<FixedOffset>,
    ) -> Option<SitemapDocument> {
        if tree.is_empty() {
            tracing::debug!("Sitemap tree is empty, nothing to generate");
            return None;
        }

        let plan = self
            .locales
            .as_deref()
            .and_then(|expander| LocalePlan::capture(expander));

        let mut pass = Pass {
            builder: self,
            ctx,
            plan,
            set: UrlSet::new(self.limits.max_urls),
            stats: GenerationStats::default(),
        };
        for item in tree {
            pass.visit(item, &Meta::default());
        }

        let Pass { set, mut stats, .. } = pass;
        stats.emitted = set.len();
        stats.dropped_at_cap = set.dropped();

        tracing::info!(
            definitions = stats.definitions,
            emitted = stats.emitted,
            unresolved = stats.unresolved,
            dropped_at_cap = stats.dropped_at_cap,
            dropped_at_type_limit = stats.dropped_at_type_limit,
            "Sitemap assembled"
        );

        Some(SitemapDocument {
            entries: set.into_entries(),
            generated_at: now,
            stats,
        })
    }
}

/// Sitemap metadata applied to every URL of a definition.
#[derive(Clone, Debug, Default)]
struct Meta {
    changefreq: Option<MetaValue>,
    priority: Option<MetaValue>,
}

/// Per-definition emission budget.
struct Budget {
    remaining: usize,
    exhausted: bool,
}

/// State of one generation pass.
struct Pass<'a> {
    builder: &'a SitemapBuilder,
    ctx: &'a ResolveContext,
    plan: Option<LocalePlan>,
    set: UrlSet,
    stats: GenerationStats,
}

impl Pass<'_> {
    fn visit(&mut self, item: &SitemapItemDefinition, inherited: &Meta) {
        self.stats.definitions += 1;

        let meta = Meta {
            changefreq: item
                .changefreq
                .clone()
                .or_else(|| inherited.changefreq.clone()),
            priority: item.priority.clone().or_else(|| inherited.priority.clone()),
        };
        let mut budget = Budget {
            remaining: self.builder.limits.max_generated,
            exhausted: false,
        };

        if item.item_type.trim().is_empty() {
            tracing::debug!("Skipping definition without a type");
        } else if item.is_url() {
            match item.url.as_deref().filter(|url| !url.trim().is_empty()) {
                Some(url) => {
                    let loc = self.builder.urls.to_absolute(url);
                    self.emit(item, &meta, &mut budget, &loc, None, &LocaleUrls::new());
                }
                None => tracing::debug!("Skipping url definition without a url"),
            }
        } else {
            match self.builder.resolvers.resolve(item, self.ctx) {
                Some(resolution) => self.flatten(item, &meta, &mut budget, &resolution, true),
                None => {
                    self.stats.unresolved += 1;
                    tracing::debug!(item_type = %item.item_type, "No resolver produced URLs");
                }
            }
        }

        for child in &item.children {
            self.visit(child, &meta);
        }
    }

    fn flatten(
        &mut self,
        item: &SitemapItemDefinition,
        meta: &Meta,
        budget: &mut Budget,
        resolution: &Resolution,
        top_level: bool,
    ) {
        match resolution {
            Resolution::Entry(entry) if entry.is_blank() => {
                tracing::debug!(
                    item_type = %item.item_type,
                    "Skipping resolved entry without a url"
                );
                for child in &entry.children {
                    self.flatten(item, meta, budget, child, false);
                }
            }
            Resolution::Entry(entry) => {
                // Resolver-supplied alternates win over our own fan-out
                let fanned = if entry.alternates.is_empty() && top_level {
                    self.fan_out(item)
                } else {
                    None
                };
                let alternates = fanned.as_ref().unwrap_or(&entry.alternates);
                let loc = self.builder.urls.to_absolute(&entry.url);
                self.emit(item, meta, budget, &loc, entry.mtime.as_ref(), alternates);

                for child in &entry.children {
                    self.flatten(item, meta, budget, child, false);
                }
            }
            Resolution::List(items) => {
                for child in items {
                    self.flatten(item, meta, budget, child, top_level);
                }
            }
            Resolution::Group(items) => {
                for child in items {
                    self.flatten(item, meta, budget, child, false);
                }
            }
            Resolution::Empty => {}
        }
    }

    fn fan_out(&self, item: &SitemapItemDefinition) -> Option<LocaleUrls> {
        if item.item_type != CMS_PAGE_TYPE {
            return None;
        }
        let plan = self.plan.as_ref()?;
        let expander = self.builder.locales.as_deref()?;
        let reference = item.reference.as_deref()?;

        let urls = plan.expand(expander, reference);
        (!urls.is_empty()).then_some(urls)
    }

    /// Emit one element, or one per alternate locale when there are any.
    fn emit(
        &mut self,
        item: &SitemapItemDefinition,
        meta: &Meta,
        budget: &mut Budget,
        url: &str,
        mtime: Option<&LastModified>,
        alternates: &LocaleUrls,
    ) {
        if alternates.is_empty() {
            self.push(item, meta, budget, url, mtime, LocaleUrls::new());
        } else {
            for (_, loc) in alternates.iter() {
                self.push(item, meta, budget, loc, mtime, alternates.clone());
            }
        }
    }

    fn push(
        &mut self,
        item: &SitemapItemDefinition,
        meta: &Meta,
        budget: &mut Budget,
        loc: &str,
        mtime: Option<&LastModified>,
        alternates: LocaleUrls,
    ) {
        if budget.remaining == 0 {
            if !budget.exhausted {
                budget.exhausted = true;
                tracing::warn!(
                    item_type = %item.item_type,
                    max_generated = self.builder.limits.max_generated,
                    "Definition produced too many URLs, dropping the rest"
                );
            }
            self.stats.dropped_at_type_limit += 1;
            return;
        }
        budget.remaining -= 1;

        self.set.push(UrlEntry {
            loc: loc.to_owned(),
            lastmod: mtime.cloned(),
            changefreq: meta.changefreq.clone(),
            priority: meta.priority.clone(),
            alternates,
        });
    }
}
