//! Post-Lloyd refinement strategies for [`super::Kmeans`].

use distances::{Metric, Number};

/// A pluggable post-Lloyd refinement strategy.
pub trait Refiner {
    /// Refines `centers`/`assignments` in place.
    fn refine<T: Number, M: Metric<T>>(&self, metric: &M, dim: usize, data: &[T], n: usize, k: usize, centers: &mut [T], assignments: &mut [usize]);
}

/// A single-point-transfer local-search pass, in the spirit of the
/// Hartigan-Wong algorithm: each point is moved to a different cluster if
/// doing so strictly reduces its raw distance to its assigned centroid,
/// subject to never emptying a cluster. Centroids are updated incrementally
/// as points move.
///
/// This is a simplified stand-in, not a literal port of Hartigan & Wong
/// (1979): it performs a single pass of single-point transfers rather than
/// the full live-set bookkeeping of the original algorithm.
pub struct HartiganWongRefine;

impl Refiner for HartiganWongRefine {
    fn refine<T: Number, M: Metric<T>>(&self, metric: &M, dim: usize, data: &[T], n: usize, k: usize, centers: &mut [T], assignments: &mut [usize]) {
        if n == 0 || k <= 1 {
            return;
        }

        let mut counts = vec![0usize; k];
        for &c in assignments.iter() {
            counts[c] += 1;
        }

        for i in 0..n {
            let point = &data[i * dim..(i + 1) * dim];
            let current = assignments[i];
            if counts[current] <= 1 {
                // Never empty a cluster entirely.
                continue;
            }

            let current_dist = metric.raw(point, &centers[current * dim..(current + 1) * dim]);
            let mut best = current;
            let mut best_dist = current_dist;
            for c in 0..k {
                if c == current {
                    continue;
                }
                let d = metric.raw(point, &centers[c * dim..(c + 1) * dim]);
                if d < best_dist {
                    best = c;
                    best_dist = d;
                }
            }

            if best != current {
                move_point(dim, point, centers, &mut counts, current, best);
                assignments[i] = best;
            }
        }
    }
}

/// Incrementally updates two centroids to reflect moving one point from
/// `from` to `to`, without recomputing either mean from scratch.
fn move_point<T: Number>(dim: usize, point: &[T], centers: &mut [T], counts: &mut [usize], from: usize, to: usize) {
    let from_count = T::from_usize(counts[from]).unwrap_or_else(T::one);
    let to_count = T::from_usize(counts[to]).unwrap_or_else(T::zero);
    let one = T::one();

    for d in 0..dim {
        let fc = &mut centers[from * dim + d];
        *fc = if counts[from] > 1 {
            (*fc * from_count - point[d]) / (from_count - one)
        } else {
            *fc
        };
        let tc = &mut centers[to * dim + d];
        *tc = (*tc * to_count + point[d]) / (to_count + one);
    }

    counts[from] -= 1;
    counts[to] += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use distances::SquaredEuclidean;

    #[test]
    fn moves_a_clearly_misassigned_point() {
        let dim = 1;
        // Point 2 (value 10.0) is misassigned to cluster 0 whose centroid is far away.
        let data = vec![0.0_f64, 0.1, 10.0, 10.1];
        let mut centers = vec![5.0_f64, 10.05];
        let mut assignments = vec![0usize, 0, 0, 1];

        HartiganWongRefine.refine(&SquaredEuclidean, dim, &data, 4, 2, &mut centers, &mut assignments);

        assert_eq!(assignments[2], 1);
    }

    #[test]
    fn never_empties_a_cluster() {
        let dim = 1;
        let data = vec![0.0_f64, 10.0];
        let mut centers = vec![0.0_f64, 10.0];
        let mut assignments = vec![0usize, 1];

        HartiganWongRefine.refine(&SquaredEuclidean, dim, &data, 2, 2, &mut centers, &mut assignments);

        assert_eq!(assignments, vec![0, 1]);
    }
}
