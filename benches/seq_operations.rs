use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lazy_seq::*;
use tokio::runtime::Runtime;

fn bench_basic_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic_operations");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("map_filter", size), size, |b, &size| {
            b.iter(|| {
                let result = range(0, size)
                    .map(|x| black_box(x * 2))
                    .filter(|x| black_box(x % 4 == 0))
                    .to_vec();
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("chunk_and_sum", size), size, |b, &size| {
            b.iter(|| {
                let result = range(0, size).chunk(100).sum(|chunk| chunk.len());
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("group_by", size), size, |b, &size| {
            b.iter(|| {
                let result = range(0, size).count_by(|x| x % 16);
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    for size in [1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("uncached_reuse", size), size, |b, &size| {
            let seq = range(0, size).map(|x| x * x);
            b.iter(|| black_box(seq.size() + seq.size()));
        });

        group.bench_with_input(BenchmarkId::new("cached_reuse", size), size, |b, &size| {
            b.iter(|| {
                let seq = range(0, size).map(|x| x * x).cache();
                black_box(seq.size() + seq.size())
            });
        });
    }

    group.finish();
}

fn bench_order_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_by");

    // quadratic, keep inputs small
    for size in [100, 500].iter() {
        group.bench_with_input(BenchmarkId::new("distinct_keys", size), size, |b, &size| {
            let seq = range(0, size).map(|x| (x * 7919) % size).cache();
            b.iter(|| black_box(seq.order_by(|a, b| a < b).to_vec()));
        });

        group.bench_with_input(BenchmarkId::new("few_keys", size), size, |b, &size| {
            let seq = range(0, size).map(|x| x % 4).cache();
            b.iter(|| black_box(seq.order_by(|a, b| a < b).to_vec()));
        });
    }

    group.finish();
}

fn bench_async_traversal(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("async_traversal");

    for size in [1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("async_for_each", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let mut total = 0i64;
                range(0, size).async_for_each(|x| total += x).await;
                black_box(total)
            });
        });

        group.bench_with_input(BenchmarkId::new("async_group_by", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let result = range(0, size).async_count_by(|x| x % 16).await;
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_basic_operations,
    bench_cache,
    bench_order_by,
    bench_async_traversal
);
criterion_main!(benches);
