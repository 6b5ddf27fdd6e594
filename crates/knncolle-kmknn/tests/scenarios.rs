//! Integration tests for the literal scenarios and testable properties:
//! brute-force correctness, radius correctness, permutation invariants,
//! null-output tolerance, empty-cluster robustness, and duplicate points.

mod common;

use distances::{Manhattan, SquaredEuclidean};
use knncolle::kmeans::LloydKmeans;
use knncolle::{Index, Searcher as _};
use knncolle_kmknn::{IndexBuilder, Options, Prebuilt};

fn build_euclidean(data: Vec<f64>, dim: usize, nobs: usize) -> Prebuilt<f64, SquaredEuclidean> {
    let options = Options::<LloydKmeans>::default();
    Prebuilt::new(dim, nobs, data, SquaredEuclidean, &options).unwrap()
}

/// S1: two groups of five identical points. Query by row 0 with k=6.
#[test]
fn scenario_s1() {
    let dim = 5;
    let mut data = Vec::new();
    for _ in 0..5 {
        data.extend_from_slice(&[1.0; 5]);
    }
    for _ in 0..5 {
        data.extend_from_slice(&[2.0; 5]);
    }
    let prebuilt = build_euclidean(data, dim, 10);
    let mut searcher = prebuilt.initialize();

    let (ids, dists) = searcher.search_by_index(0, 6);
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    let sqrt5 = 5.0_f64.sqrt();
    assert_eq!(&dists[..4], &[0.0, 0.0, 0.0, 0.0]);
    assert!((dists[4] - sqrt5).abs() < 1e-9);
    assert!((dists[5] - sqrt5).abs() < 1e-9);
}

/// S2: same data, query by row 5 with k=3.
#[test]
fn scenario_s2() {
    let dim = 5;
    let mut data = Vec::new();
    for _ in 0..5 {
        data.extend_from_slice(&[1.0; 5]);
    }
    for _ in 0..5 {
        data.extend_from_slice(&[2.0; 5]);
    }
    let prebuilt = build_euclidean(data, dim, 10);
    let mut searcher = prebuilt.initialize();

    let (ids, dists) = searcher.search_by_index(5, 3);
    assert_eq!(ids, vec![6, 7, 8]);
    assert_eq!(dists, vec![0.0, 0.0, 0.0]);
}

/// S3: same data, query by row 9 with k=7.
#[test]
fn scenario_s3() {
    let dim = 5;
    let mut data = Vec::new();
    for _ in 0..5 {
        data.extend_from_slice(&[1.0; 5]);
    }
    for _ in 0..5 {
        data.extend_from_slice(&[2.0; 5]);
    }
    let prebuilt = build_euclidean(data, dim, 10);
    let mut searcher = prebuilt.initialize();

    let (ids, dists) = searcher.search_by_index(9, 7);
    assert_eq!(ids, vec![5, 6, 7, 8, 0, 1, 2]);
    let sqrt5 = 5.0_f64.sqrt();
    assert_eq!(&dists[..4], &[0.0, 0.0, 0.0, 0.0]);
    for &d in &dists[4..] {
        assert!((d - sqrt5).abs() < 1e-9);
    }
}

/// S4: N=0. Every search returns empty/zero.
#[test]
fn scenario_s4() {
    let prebuilt = build_euclidean(Vec::new(), 5, 0);
    let mut searcher = prebuilt.initialize();

    let (ids, dists) = searcher.search_by_point(&[0.0; 5], 3);
    assert!(ids.is_empty());
    assert!(dists.is_empty());
    assert_eq!(searcher.count_within_radius_by_point(&[0.0; 5], 1.0), 0);
}

/// S5: N=200, d=5, all zeros. search(0, 10) returns 10 indices at distance 0.
#[test]
fn scenario_s5() {
    let dim = 5;
    let data = vec![0.0; 200 * dim];
    let prebuilt = build_euclidean(data, dim, 200);
    let mut searcher = prebuilt.initialize();

    let (ids, dists) = searcher.search_by_index(0, 10);
    assert_eq!(ids.len(), 10);
    assert!(dists.iter().all(|&d| d == 0.0));
}

/// S6: round trip through the registry with Manhattan on a 50x5 Gaussian sample.
#[test]
fn scenario_s6() {
    knncolle_kmknn::register_loader::<f64, Manhattan>();

    let dim = 5;
    let nobs = 50;
    let data = common::gaussian_blobs(nobs, dim, 3, 1.5, 7);

    let options = Options::<LloydKmeans>::default();
    let prebuilt = Prebuilt::new(dim, nobs, data, Manhattan, &options).unwrap();

    let dir = std::env::temp_dir().join(format!("knncolle-kmknn-s6-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let prefix = dir.join("index");
    prebuilt.save(&prefix).unwrap();

    let loaded = knncolle::load(&prefix).unwrap();
    let reloaded = *loaded.downcast::<Prebuilt<f64, Manhattan>>().unwrap();

    let mut before = prebuilt.initialize();
    let mut after = reloaded.initialize();
    for i in 0..nobs {
        assert_eq!(before.search_by_index(i, 5), after.search_by_index(i, 5));
    }
}

/// P1: correctness vs brute force over a larger, less contrived input.
#[test]
fn p1_matches_brute_force() {
    let dim = 4;
    let nobs = 300;
    let data = common::gaussian_blobs(nobs, dim, 5, 2.0, 11);
    let prebuilt = build_euclidean(data.clone(), dim, nobs);
    let mut searcher = prebuilt.initialize();

    for &query_row in &[0usize, 17, 42, 150, 299] {
        let query = &data[query_row * dim..(query_row + 1) * dim];
        let (ids, dists) = searcher.search_by_point(query, 8);
        let (expected_ids, expected_dists) = common::brute_force_knn(&data, dim, nobs, query, 8, &SquaredEuclidean, None);
        assert_eq!(ids, expected_ids, "mismatch for query row {query_row}");
        for (got, want) in dists.iter().zip(expected_dists.iter()) {
            assert!((got - want).abs() < 1e-6);
        }
    }
}

/// P1 (by-index variant): self-exclusion plus brute-force agreement.
#[test]
fn p1_by_index_matches_brute_force_excluding_self() {
    let dim = 3;
    let nobs = 120;
    let data = common::gaussian_blobs(nobs, dim, 4, 1.0, 23);
    let prebuilt = build_euclidean(data.clone(), dim, nobs);
    let mut searcher = prebuilt.initialize();

    for &i in &[0usize, 5, 60, 119] {
        let query = &data[i * dim..(i + 1) * dim];
        let (ids, _) = searcher.search_by_index(i, 6);
        let (expected_ids, _) = common::brute_force_knn(&data, dim, nobs, query, 6, &SquaredEuclidean, Some(i));
        assert_eq!(ids, expected_ids, "mismatch for row {i}");
    }
}

/// P2: radius correctness, count-only and collecting agree with brute force.
#[test]
fn p2_radius_correctness() {
    let dim = 3;
    let nobs = 150;
    let data = common::gaussian_blobs(nobs, dim, 3, 3.0, 31);
    let prebuilt = build_euclidean(data.clone(), dim, nobs);
    let mut searcher = prebuilt.initialize();

    let query = &data[0..dim];
    for &radius in &[0.5, 2.0, 5.0] {
        let count = searcher.count_within_radius_by_point(query, radius);
        let (ids, _) = searcher.search_within_radius_by_point(query, radius);
        assert_eq!(ids.len(), count);

        let mut expected: Vec<usize> = (0..nobs)
            .filter(|&o| {
                let p = &data[o * dim..(o + 1) * dim];
                let raw: f64 = p.iter().zip(query.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                raw.sqrt() <= radius
            })
            .collect();
        let mut got = ids.clone();
        expected.sort_unstable();
        got.sort_unstable();
        assert_eq!(got, expected, "radius {radius}");
    }
}

/// P4: permutation invariants hold for a non-trivial build.
#[test]
fn p4_permutation_invariants() {
    let dim = 6;
    let nobs = 500;
    let data = common::gaussian_blobs(nobs, dim, 7, 1.0, 41);
    let prebuilt = build_euclidean(data, dim, nobs);

    let mut seen = vec![false; nobs];
    for r in 0..nobs {
        let o = prebuilt.observation_id()[r];
        assert!(!seen[o], "duplicate observation id {o}");
        seen[o] = true;
        assert_eq!(prebuilt.new_location()[o], r);
    }
    assert!(seen.iter().all(|&b| b));
}

/// P5: null-output tolerance, passing `None` for either buffer doesn't
/// change the non-null buffer or the reported count.
#[test]
fn p5_null_output_tolerance() {
    let dim = 4;
    let nobs = 200;
    let data = common::gaussian_blobs(nobs, dim, 4, 2.0, 53);
    let prebuilt = build_euclidean(data.clone(), dim, nobs);
    let mut searcher = prebuilt.initialize();

    let query = &data[0..dim];
    let (full_ids, full_dists) = searcher.search_within_radius_by_point(query, 3.0);
    let count_only = searcher.count_within_radius_by_point(query, 3.0);
    assert_eq!(count_only, full_ids.len());
    assert_eq!(full_ids.len(), full_dists.len());
}

/// P6: an initialization that leaves some clusters empty still produces a
/// correct index. Exercised indirectly by requesting far more clusters than
/// natural groupings, which tends to strand some centroids with zero points.
#[test]
fn p6_empty_cluster_robustness() {
    let dim = 2;
    let nobs = 40;
    let data = common::gaussian_blobs(nobs, dim, 2, 0.3, 61);
    let options = Options::<LloydKmeans>::default().with_power(0.9);
    let prebuilt = Prebuilt::new(dim, nobs, data.clone(), SquaredEuclidean, &options).unwrap();

    assert!(prebuilt.sizes().iter().all(|&s| s > 0));
    assert_eq!(prebuilt.sizes().iter().sum::<usize>(), nobs);

    let mut searcher = prebuilt.initialize();
    let query = &data[0..dim];
    let (ids, _) = searcher.search_by_point(query, 5);
    let (expected, _) = common::brute_force_knn(&data, dim, nobs, query, 5, &SquaredEuclidean, None);
    assert_eq!(ids, expected);
}

/// P7: duplicate points are returned at distance 0 before any non-duplicate.
#[test]
fn p7_duplicate_points() {
    let dim = 2;
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&[3.0, 3.0]);
    }
    data.extend_from_slice(&[100.0, 100.0]);
    let nobs = 5;
    let prebuilt = build_euclidean(data, dim, nobs);
    let mut searcher = prebuilt.initialize();

    let (ids, dists) = searcher.search_by_index(0, 4);
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|&i| i == 1 || i == 2 || i == 3));
    assert!(dists.iter().all(|&d| d == 0.0));
}

/// Builder path exercised end to end, including integral input conversion.
#[test]
fn builder_round_trip() {
    let builder: IndexBuilder<f64, _> = IndexBuilder::new(SquaredEuclidean);
    let points: Vec<i32> = vec![0, 0, 1, 0, 0, 1, 50, 50];
    let prebuilt = builder.build(2, &points).unwrap();
    let mut searcher = prebuilt.initialize();
    let (ids, _) = searcher.search_by_index(0, 2);
    assert_eq!(ids, vec![1, 2]);
}
