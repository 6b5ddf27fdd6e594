//! Centroid initialization strategies for [`super::Kmeans`].

use distances::{Metric, Number};
use rand::{Rng, SeedableRng};

/// A pluggable centroid-initialization strategy.
pub trait Initializer {
    /// Chooses `k` initial centroids (as a row-major `k * dim` matrix) from `data`.
    fn initialize<T: Number, M: Metric<T>>(&self, metric: &M, dim: usize, data: &[T], n: usize, k: usize, seed: u64) -> Vec<T>;
}

/// The k-means++ initializer: the first centroid is chosen uniformly at
/// random; each subsequent centroid is chosen with probability proportional
/// to its squared raw distance to the nearest centroid chosen so far.
pub struct KmeansPlusPlusInit;

impl Initializer for KmeansPlusPlusInit {
    fn initialize<T: Number, M: Metric<T>>(&self, metric: &M, dim: usize, data: &[T], n: usize, k: usize, seed: u64) -> Vec<T> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut chosen = Vec::with_capacity(k);

        let first = rng.gen_range(0..n);
        chosen.push(first);

        let mut nearest_sq = vec![f64::INFINITY; n];
        update_nearest_sq(metric, dim, data, n, &mut nearest_sq, data_point(data, dim, first));

        while chosen.len() < k {
            let total: f64 = nearest_sq.iter().sum();
            let next = if total <= 0.0 {
                // All remaining points coincide with an already-chosen centroid; pick arbitrarily.
                (0..n).find(|i| !chosen.contains(i)).unwrap_or(0)
            } else {
                let mut target = rng.gen_range(0.0..total);
                let mut pick = n - 1;
                for (i, &w) in nearest_sq.iter().enumerate() {
                    if target < w {
                        pick = i;
                        break;
                    }
                    target -= w;
                }
                pick
            };
            chosen.push(next);
            update_nearest_sq(metric, dim, data, n, &mut nearest_sq, data_point(data, dim, next));
        }

        let mut centers = Vec::with_capacity(k * dim);
        for &i in &chosen {
            centers.extend_from_slice(data_point(data, dim, i));
        }
        centers
    }
}

fn data_point<T>(data: &[T], dim: usize, i: usize) -> &[T] {
    &data[i * dim..(i + 1) * dim]
}

/// Updates `nearest_sq[i]` to the minimum of its current value and the
/// squared raw distance from point `i` to `new_center`.
fn update_nearest_sq<T: Number, M: Metric<T>>(metric: &M, dim: usize, data: &[T], n: usize, nearest_sq: &mut [f64], new_center: &[T]) {
    for i in 0..n {
        let point = data_point(data, dim, i);
        let d = metric.raw(point, new_center).to_f64().unwrap_or(f64::INFINITY);
        let sq = d * d;
        if sq < nearest_sq[i] {
            nearest_sq[i] = sq;
        }
    }
}
