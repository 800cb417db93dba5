//! Benchmarks for line splitting, aggregation and rendering.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use nginx_allowlist::aggregator::{Aggregator, AllowBuckets};
use nginx_allowlist::config::{Config, Family};
use nginx_allowlist::fetcher::LineBatch;
use nginx_allowlist::writer::GeneratedConfig;

/// Generate a newline-delimited body of IPv4 /24 ranges
fn generate_body(count: usize) -> String {
    (0..count)
        .map(|i| {
            let a = (i / 65536) % 256;
            let b = (i / 256) % 256;
            let c = i % 256;
            format!("{}.{}.{}.0/24\n", a, b, c)
        })
        .collect()
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    for size in [100, 1000, 10000, 50000] {
        let body = generate_body(size);
        group.bench_with_input(BenchmarkId::new("from_body", size), &body, |b, body| {
            b.iter(|| black_box(LineBatch::from_body(body)))
        });
    }

    group.finish();
}

fn bench_contribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("contribute");

    for size in [1000, 10000, 50000] {
        let batch = LineBatch::from_body(&generate_body(size));
        group.bench_with_input(BenchmarkId::new("single_batch", size), &batch, |b, batch| {
            b.iter(|| {
                let aggregator = Aggregator::new();
                aggregator.contribute(Family::Ipv4, batch.clone());
                black_box(aggregator.take())
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = Config::default();

    for size in [100, 1000, 10000, 50000] {
        let buckets = AllowBuckets {
            ipv4: LineBatch::from_body(&generate_body(size)).into_lines(),
            ipv6: Vec::new(),
        };
        let generated = GeneratedConfig::new(&config, buckets);
        group.bench_with_input(BenchmarkId::new("render", size), &generated, |b, generated| {
            b.iter(|| black_box(generated.render()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_split, bench_contribute, bench_render);
criterion_main!(benches);
