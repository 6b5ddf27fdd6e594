//! Synthetic-data helper shared by the integration tests, playing the role
//! `symagen` plays for this lineage's own search-algorithm tests: a small
//! seeded Gaussian-blob generator, kept inline instead of as a fourth
//! workspace member.

/// Generates `n` row-major `dim`-length points drawn from `blobs` Gaussian
/// clusters, deterministically from `seed`.
pub fn gaussian_blobs(n: usize, dim: usize, blobs: usize, spread: f64, seed: u64) -> Vec<f64> {
    use rand::Rng;
    use rand::SeedableRng;

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let blobs = blobs.max(1);

    let centers: Vec<Vec<f64>> = (0..blobs)
        .map(|_| (0..dim).map(|_| rng.gen_range(-20.0..20.0)).collect())
        .collect();

    let mut data = Vec::with_capacity(n * dim);
    for i in 0..n {
        let center = &centers[i % blobs];
        for &c in center {
            // Box-Muller, cheap and good enough for test fixtures.
            let u1: f64 = rng.gen_range(1e-9..1.0);
            let u2: f64 = rng.gen_range(0.0..1.0);
            let gaussian = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            data.push(c + gaussian * spread);
        }
    }
    data
}

/// Brute-force k-NN for correctness checks: returns up to `k` `(original_index, raw_distance)`
/// pairs nearest to `query`, excluding `exclude` if given, ordered by ascending
/// `(raw_distance, index)`.
pub fn brute_force_knn<M: distances::Metric<f64, Raw = f64, Distance = f64>>(
    data: &[f64],
    dim: usize,
    n: usize,
    query: &[f64],
    k: usize,
    metric: &M,
    exclude: Option<usize>,
) -> (Vec<usize>, Vec<f64>) {
    let mut all: Vec<(f64, usize)> = (0..n)
        .filter(|&o| Some(o) != exclude)
        .map(|o| {
            let point = &data[o * dim..(o + 1) * dim];
            (metric.raw(query, point), o)
        })
        .collect();
    all.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.cmp(&b.1)));
    all.truncate(k);
    let ids = all.iter().map(|&(_, o)| o).collect();
    let dists = all.iter().map(|&(raw, _)| metric.normalize(raw)).collect();
    (ids, dists)
}
