use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use sum_native::{closed_form_sum, compute_sum, library_sum};

fn bench_sum_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_methods");

    for n in [1_000i64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("iterative", n), &n, |b, &n| {
            b.iter(|| compute_sum(black_box(0), black_box(n as i128)))
        });
        group.bench_with_input(BenchmarkId::new("library", n), &n, |b, &n| {
            b.iter(|| library_sum(black_box(0), black_box(n as i128)))
        });
        group.bench_with_input(BenchmarkId::new("closed_form", n), &n, |b, &n| {
            b.iter(|| closed_form_sum(black_box(0), black_box(n as i128)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sum_methods);
criterion_main!(benches);
