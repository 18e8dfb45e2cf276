use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nuclear_route_pattern::{PatternMatcher, RoutePattern, RouteValues};

fn pattern_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern-parse");

    group.bench_function("mvc-route", |b| {
        b.iter_with_large_drop(|| RoutePattern::parse("{controller=Home}/{action=Index}/{id?}"))
    });

    group.bench_function("complex-route", |b| {
        b.iter_with_large_drop(|| RoutePattern::parse(r"api/{version:int}/files/{name:regex(^\w+$)}.{ext?}"))
    });
}

fn pattern_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern-match");

    group.bench_function("mvc-route", |b| {
        let matcher = PatternMatcher::new(RoutePattern::parse("{controller=Home}/{action=Index}/{id?}").unwrap());
        b.iter_batched_ref(
            RouteValues::new,
            |values| matcher.try_match("/Products/Details/42", values),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("complex-segment", |b| {
        let matcher = PatternMatcher::new(RoutePattern::parse("files/{name}.{ext?}").unwrap());
        b.iter_batched_ref(
            RouteValues::new,
            |values| matcher.try_match("/files/archive.tar.gz", values),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("catch-all", |b| {
        let matcher = PatternMatcher::new(RoutePattern::parse("static/{**path}").unwrap());
        b.iter_batched_ref(
            RouteValues::new,
            |values| matcher.try_match("/static/css/site/main.css", values),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, pattern_parse, pattern_match);
criterion_main!(benches);
