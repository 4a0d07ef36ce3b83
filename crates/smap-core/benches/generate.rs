//! Benchmarks for sitemap generation.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use smap_core::{
    BaseUrl, ResolveContext, ResolvedEntry, Resolution, ResolverChain, ResolverStage,
    SitemapBuilder,
};
use smap_tree::{ItemTree, SitemapItemDefinition};

/// Tree of literal URLs followed by one collection definition.
fn create_tree(urls: usize) -> ItemTree {
    (0..urls)
        .map(|i| SitemapItemDefinition::url(format!("/page-{i}")).with_priority("0.5"))
        .chain(std::iter::once(SitemapItemDefinition::typed("all-posts")))
        .collect()
}

fn create_builder(posts: usize) -> SitemapBuilder {
    let resolvers = ResolverChain::new().with(
        ResolverStage::SitemapHook,
        move |item: &SitemapItemDefinition, _ctx: &ResolveContext| {
            (item.item_type == "all-posts").then(|| {
                Resolution::group((0..posts).map(|i| {
                    ResolvedEntry::new(format!("/blog/post-{i}"))
                        .with_mtime(1_705_314_600 + i64::try_from(i).unwrap_or_default())
                        .with_alternate("en", format!("https://example.com/en/blog/post-{i}"))
                        .with_alternate("fr", format!("https://example.com/fr/blog/post-{i}"))
                        .into()
                }))
            })
        },
    );
    let base = BaseUrl::parse("https://example.com").unwrap();
    SitemapBuilder::new(Arc::new(base)).with_resolvers(resolvers)
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let ctx = ResolveContext::default();

    for size in [100, 1_000, 10_000] {
        let tree = create_tree(size);
        let builder = create_builder(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| builder.generate(&tree, &ctx).unwrap());
        });
    }

    group.finish();
}

fn bench_cap(c: &mut Criterion) {
    let tree = create_tree(60_000);
    let builder = SitemapBuilder::new(Arc::new(BaseUrl::parse("https://example.com").unwrap()));
    let ctx = ResolveContext::default();

    c.bench_function("build_over_cap", |b| b.iter(|| builder.build(&tree, &ctx)));
}

criterion_group!(benches, bench_generate, bench_cap);
criterion_main!(benches);
