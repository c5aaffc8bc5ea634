//! Criterion benchmarks for memorise: key resolution, hit path, miss path.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;

use memorise::{memoize, resolve_key, MemoizeOptions};

fn bench_resolve_key(c: &mut Criterion) {
    let args = ("alice", 42u32, json!({"page": 3, "filters": ["a", "b"]}));
    let mut g = c.benchmark_group("resolve_key");
    g.throughput(Throughput::Elements(1));
    g.bench_function("mixed_tuple", |b| {
        b.iter(|| black_box(resolve_key(black_box(&args))));
    });
    g.finish();
}

fn bench_hit(c: &mut Criterion) {
    let cached = memoize(|(n,): (u64,)| n.wrapping_mul(31), MemoizeOptions::new());
    cached.call((7,));
    let mut g = c.benchmark_group("memoized");
    g.throughput(Throughput::Elements(1));
    g.bench_function("hit", |b| {
        b.iter(|| black_box(cached.call(black_box((7,)))));
    });
    g.finish();
}

fn bench_miss(c: &mut Criterion) {
    let cached = memoize(
        |(n,): (u64,)| n.wrapping_mul(31),
        MemoizeOptions::new().capacity(1024),
    );
    let mut n = 0u64;
    let mut g = c.benchmark_group("memoized");
    g.throughput(Throughput::Elements(1));
    g.bench_function("miss_with_eviction", |b| {
        b.iter(|| {
            n += 1;
            black_box(cached.call((n,)))
        });
    });
    g.finish();
}

criterion_group!(benches, bench_resolve_key, bench_hit, bench_miss);
criterion_main!(benches);
