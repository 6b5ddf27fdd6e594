//! The k-means clustering contract consumed by nearest-neighbor indices.
//!
//! Only the narrow interface ([`Kmeans::compute`]) is part of the contract
//! the core algorithm crates rely on; initialization and refinement
//! strategies ([`init`], [`refine`]) are pluggable and the defaults here
//! ([`KmeansPlusPlusInit`], [`HartiganWongRefine`]) are simple, documented
//! stand-ins rather than literal ports of any particular published
//! algorithm.

pub mod init;
pub mod refine;

use distances::{Metric, Number};
use init::Initializer;
use refine::Refiner;

/// The result of clustering `n` points into (at most) `k` clusters.
pub struct KmeansResult<T> {
    /// Row-major `k * dim` centroid matrix.
    pub centers: Vec<T>,
    /// `assignments[i]` is the cluster id of the `i`-th input point.
    pub assignments: Vec<usize>,
    /// Number of points assigned to each cluster (may contain zeros).
    pub sizes: Vec<usize>,
}

/// The k-means contract: given a row-major `n * dim` matrix and a requested
/// cluster count `k`, produce centroid coordinates and a per-point cluster
/// assignment. Empty clusters are permitted in the result.
pub trait Kmeans<T: Number> {
    /// Clusters `data` (`n` row-major `dim`-length points) into `k` clusters.
    fn compute<M: Metric<T>>(&self, metric: &M, dim: usize, data: &[T], n: usize, k: usize) -> KmeansResult<T>;
}

/// The default k-means implementation: k-means++ initialization followed by
/// Lloyd reassignment to convergence, then one Hartigan-Wong-style
/// single-point-swap refinement pass.
pub struct LloydKmeans<Init = init::KmeansPlusPlusInit, Ref = refine::HartiganWongRefine> {
    /// The centroid initializer.
    pub init: Init,
    /// The post-Lloyd refinement strategy.
    pub refine: Ref,
    /// Maximum number of Lloyd iterations.
    pub max_iter: usize,
    /// Convergence tolerance on total centroid movement.
    pub tolerance: f64,
    /// Seed for the random number generator used by `init`.
    pub seed: u64,
}

impl Default for LloydKmeans {
    fn default() -> Self {
        Self {
            init: init::KmeansPlusPlusInit,
            refine: refine::HartiganWongRefine,
            max_iter: 100,
            tolerance: 1e-6,
            seed: 0,
        }
    }
}

impl<Init: Initializer, Ref: Refiner> Kmeans<f64> for LloydKmeans<Init, Ref> {
    fn compute<M: Metric<f64>>(&self, metric: &M, dim: usize, data: &[f64], n: usize, k: usize) -> KmeansResult<f64> {
        lloyd(metric, dim, data, n, k, &self.init, &self.refine, self.max_iter, self.tolerance, self.seed)
    }
}

impl<Init: Initializer, Ref: Refiner> Kmeans<f32> for LloydKmeans<Init, Ref> {
    fn compute<M: Metric<f32>>(&self, metric: &M, dim: usize, data: &[f32], n: usize, k: usize) -> KmeansResult<f32> {
        lloyd(metric, dim, data, n, k, &self.init, &self.refine, self.max_iter, self.tolerance, self.seed)
    }
}

/// Shared Lloyd's-algorithm body, generic over the float precision via the
/// `LloydFloat` helper trait so it is written once for `f32` and `f64`.
fn lloyd<T: LloydFloat, M: Metric<T>>(
    metric: &M,
    dim: usize,
    data: &[T],
    n: usize,
    k: usize,
    init: &impl Initializer,
    refine: &impl Refiner,
    max_iter: usize,
    tolerance: f64,
    seed: u64,
) -> KmeansResult<T> {
    if n == 0 || k == 0 {
        return KmeansResult {
            centers: Vec::new(),
            assignments: Vec::new(),
            sizes: vec![0; k],
        };
    }
    let k = k.min(n);

    let mut centers = init.initialize(metric, dim, data, n, k, seed);
    let mut assignments = vec![0usize; n];

    ftlog::debug!("LloydKmeans: clustering {n} points of dimension {dim} into {k} clusters");

    for iteration in 0..max_iter {
        for i in 0..n {
            let point = &data[i * dim..(i + 1) * dim];
            assignments[i] = nearest_center(metric, point, &centers, dim);
        }

        let (new_centers, shift) = recompute_centers(dim, data, n, k, &assignments, &centers);
        centers = new_centers;

        if shift <= tolerance {
            ftlog::debug!("LloydKmeans: converged after {} iterations (shift={shift})", iteration + 1);
            break;
        }
    }

    refine.refine(metric, dim, data, n, k, &mut centers, &mut assignments);

    let mut sizes = vec![0usize; k];
    for &c in &assignments {
        sizes[c] += 1;
    }

    KmeansResult { centers, assignments, sizes }
}

/// Returns the index of the centroid nearest to `point`.
fn nearest_center<T: Number, M: Metric<T>>(metric: &M, point: &[T], centers: &[T], dim: usize) -> usize {
    let k = centers.len() / dim;
    (0..k)
        .map(|c| {
            let centroid = &centers[c * dim..(c + 1) * dim];
            (c, metric.raw(point, centroid))
        })
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map_or(0, |(c, _)| c)
}

/// Recomputes centroids as the mean of their assigned points, returning the
/// new centers and the total (L1, in raw units) centroid movement.
fn recompute_centers<T: LloydFloat>(dim: usize, data: &[T], n: usize, k: usize, assignments: &[usize], old_centers: &[T]) -> (Vec<T>, f64) {
    let mut sums = vec![T::zero(); k * dim];
    let mut counts = vec![0usize; k];

    for i in 0..n {
        let c = assignments[i];
        counts[c] += 1;
        let point = &data[i * dim..(i + 1) * dim];
        for d in 0..dim {
            sums[c * dim + d] = sums[c * dim + d] + point[d];
        }
    }

    let mut new_centers = old_centers.to_vec();
    for c in 0..k {
        if counts[c] == 0 {
            continue;
        }
        let count = T::from_usize_lossy(counts[c]);
        for d in 0..dim {
            new_centers[c * dim + d] = sums[c * dim + d] / count;
        }
    }

    let shift = (0..k * dim)
        .map(|i| (new_centers[i] - old_centers[i]).to_f64_lossy().abs())
        .sum();

    (new_centers, shift)
}

/// The float precision this crate's default k-means implementation is monomorphized over.
pub trait LloydFloat: Number + Copy {
    /// Converts a `usize` count to `Self`, losslessly for any realistic cluster size.
    fn from_usize_lossy(n: usize) -> Self;
    /// Converts to `f64` for convergence-shift bookkeeping.
    fn to_f64_lossy(self) -> f64;
}

impl LloydFloat for f64 {
    fn from_usize_lossy(n: usize) -> Self {
        n as f64
    }
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl LloydFloat for f32 {
    fn from_usize_lossy(n: usize) -> Self {
        n as f32
    }
    fn to_f64_lossy(self) -> f64 {
        f64::from(self)
    }
}
