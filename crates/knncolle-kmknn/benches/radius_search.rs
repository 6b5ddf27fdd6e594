//! Benchmark comparing KMKNN radius search against brute-force linear search.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use distances::{Metric, SquaredEuclidean};
use knncolle::kmeans::LloydKmeans;
use knncolle::{Index as _, Searcher as _};
use knncolle_kmknn::{Options, Prebuilt};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(n: usize, dim: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * dim).map(|_| rng.gen_range(-50.0..50.0)).collect()
}

fn brute_force_count(data: &[f64], dim: usize, n: usize, query: &[f64], radius: f64) -> usize {
    let metric = SquaredEuclidean;
    (0..n)
        .filter(|&o| {
            let raw = metric.raw(query, &data[o * dim..(o + 1) * dim]);
            metric.normalize(raw) <= radius
        })
        .count()
}

fn radius_search(c: &mut Criterion) {
    let dim = 16;
    let cardinality = 20_000;
    let seed = 13;
    let data = random_points(cardinality, dim, seed);

    let options = Options::<LloydKmeans>::default();
    let prebuilt = Prebuilt::new(dim, cardinality, data.clone(), SquaredEuclidean, &options).unwrap();

    let queries = random_points(20, dim, seed + 1);

    let mut group = c.benchmark_group("radius_search");
    for &radius in &[1.0_f64, 5.0, 20.0] {
        group.bench_with_input(BenchmarkId::new("kmknn", radius.to_string()), &radius, |b, &radius| {
            let mut searcher = prebuilt.initialize();
            b.iter(|| {
                for chunk in queries.chunks(dim) {
                    let _ = searcher.count_within_radius_by_point(chunk, radius);
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("brute_force", radius.to_string()), &radius, |b, &radius| {
            b.iter(|| {
                for chunk in queries.chunks(dim) {
                    let _ = brute_force_count(&data, dim, cardinality, chunk, radius);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, radius_search);
criterion_main!(benches);
