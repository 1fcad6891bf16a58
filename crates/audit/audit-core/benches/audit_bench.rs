//! Benchmark suite for the audit analyzers.

use audit_api::IsolationForestConfig;
use audit_core::{BenfordAnalyzer, IsolationForest};
use audit_spi::{DigitAnalyzer, OutlierDetector};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_amounts(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64;
            // log-spread amounts with a deterministic wobble
            10f64.powf(1.0 + 4.0 * ((t * 0.618_034).fract())) + (t * 0.3).sin()
        })
        .collect()
}

fn bench_benford(c: &mut Criterion) {
    let analyzer = BenfordAnalyzer::default();
    let mut group = c.benchmark_group("Benford");

    for size in [1_000, 10_000, 100_000].iter() {
        let amounts = create_amounts(*size);
        group.bench_with_input(BenchmarkId::new("analyze", size), &amounts, |b, amounts| {
            b.iter(|| analyzer.analyze(black_box(amounts)))
        });
    }

    group.finish();
}

fn bench_isolation_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("IsolationForest");

    for size in [1_000, 10_000].iter() {
        let amounts = create_amounts(*size);
        group.bench_with_input(BenchmarkId::new("fit_detect", size), &amounts, |b, amounts| {
            b.iter(|| {
                let mut forest = IsolationForest::new(IsolationForestConfig::default()).unwrap();
                forest.fit_detect(black_box(amounts))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_benford, bench_isolation_forest);
criterion_main!(benches);
