//! The built index: the permuted data matrix, the clustering, and the
//! per-point distance-to-centroid table search relies on.

use distances::{Metric, Number};
use knncolle::Kmeans;

use crate::{options::cluster_count, KmknnError, Options};

/// An immutable, queryable KMKNN index.
///
/// Construction clusters the input with k-means, discards empty clusters,
/// sorts each surviving cluster by ascending true distance to its centroid,
/// and permutes the data matrix in place to match that order. See
/// [`Prebuilt::new`] for the construction algorithm.
pub struct Prebuilt<T, M> {
    pub(crate) dim: usize,
    pub(crate) nobs: usize,
    pub(crate) ncenters: usize,
    /// Row-major `nobs * dim`, permuted into per-cluster sorted order.
    pub(crate) data: Vec<T>,
    /// Row-major `ncenters * dim`.
    pub(crate) centers: Vec<T>,
    pub(crate) sizes: Vec<usize>,
    pub(crate) offsets: Vec<usize>,
    /// `observation_id[r]` is the original index of the point now at row `r`.
    pub(crate) observation_id: Vec<usize>,
    /// `new_location[i]` is the row now holding the point originally at index `i`.
    pub(crate) new_location: Vec<usize>,
    /// True distance from the point at row `r` to its cluster's centroid.
    pub(crate) dist_to_centroid: Vec<T>,
    pub(crate) metric: M,
}

impl<T, M> Prebuilt<T, M>
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T> + Clone,
{
    /// Clusters `data` (`nobs` row-major `dim`-length points) and builds a
    /// queryable index, following the construction steps: choose `K`,
    /// cluster, prune empty clusters, compute offsets, sort each cluster by
    /// distance to its centroid, and permute `data` in place to match.
    ///
    /// # Errors
    ///
    /// Returns [`KmknnError::Configuration`] if `options.power()` is
    /// non-positive or the resulting cluster count overflows `usize`.
    pub fn new<Km: Kmeans<T>>(dim: usize, nobs: usize, mut data: Vec<T>, metric: M, options: &Options<Km>) -> Result<Self, KmknnError> {
        debug_assert_eq!(data.len(), nobs * dim);

        if nobs == 0 {
            ftlog::debug!("Prebuilt::new: empty input (dim={dim}), returning an empty index");
            return Ok(Self {
                dim,
                nobs: 0,
                ncenters: 0,
                data: Vec::new(),
                centers: Vec::new(),
                sizes: Vec::new(),
                offsets: Vec::new(),
                observation_id: Vec::new(),
                new_location: Vec::new(),
                dist_to_centroid: Vec::new(),
                metric,
            });
        }

        // (a) choose K
        let k0 = cluster_count(nobs, options.power())?;
        let k0 = k0.max(1).min(nobs);

        // (b) cluster
        let result = options.kmeans().compute(&metric, dim, &data, nobs, k0);
        let mut assignments = result.assignments;
        let mut centers = result.centers;
        let sizes_by_old = result.sizes;

        ftlog::debug!("Prebuilt::new: clustered {nobs} points into {k0} requested clusters");

        // (c) prune empty clusters
        let mut remap = vec![usize::MAX; k0];
        let mut sizes = Vec::with_capacity(k0);
        let mut next = 0usize;
        for (c, &size) in sizes_by_old.iter().enumerate() {
            if size > 0 {
                remap[c] = next;
                if next != c {
                    // Shift the surviving centroid row down into its compacted position.
                    let (dst, src) = (next * dim, c * dim);
                    for d in 0..dim {
                        centers[dst + d] = centers[src + d];
                    }
                }
                sizes.push(size);
                next += 1;
            }
        }
        centers.truncate(next * dim);
        let ncenters = next;
        let pruned = k0 - ncenters;
        if pruned > 0 {
            ftlog::debug!("Prebuilt::new: pruned {pruned} empty cluster(s), {ncenters} remain");
        }
        for c in assignments.iter_mut() {
            *c = remap[*c];
        }

        // (d) offsets
        let mut offsets = Vec::with_capacity(ncenters);
        let mut running = 0usize;
        for &size in &sizes {
            offsets.push(running);
            running += size;
        }
        debug_assert_eq!(running, nobs);

        // (e) distance table and per-cluster sort
        let mut by_distance: Vec<(T, usize)> = vec![(T::zero(), 0); nobs];
        let mut cursors = offsets.clone();
        for o in 0..nobs {
            let c = assignments[o];
            let point = &data[o * dim..(o + 1) * dim];
            let centroid = &centers[c * dim..(c + 1) * dim];
            let raw = metric.raw(point, centroid);
            let true_dist = metric.normalize(raw);
            let slot = cursors[c];
            by_distance[slot] = (true_dist, o);
            cursors[c] += 1;
        }
        for c in 0..ncenters {
            let slice = &mut by_distance[offsets[c]..offsets[c] + sizes[c]];
            slice.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.1.cmp(&b.1)));
        }

        // Metadata arrays follow directly from `by_distance`; only the physical
        // data permutation needs the cycle-following walk below.
        let mut observation_id = vec![0usize; nobs];
        let mut new_location = vec![0usize; nobs];
        let mut dist_to_centroid = vec![T::zero(); nobs];
        for r in 0..nobs {
            let (true_dist, o) = by_distance[r];
            observation_id[r] = o;
            dist_to_centroid[r] = true_dist;
            new_location[o] = r;
        }

        // (f) in-place permutation of `data`, using a single d-wide scratch
        // buffer and a used-bitmap; no N*d shadow allocation.
        permute_rows_in_place(&mut data, dim, &new_location);

        Ok(Self {
            dim,
            nobs,
            ncenters,
            data,
            centers,
            sizes,
            offsets,
            observation_id,
            new_location,
            dist_to_centroid,
            metric,
        })
    }

    /// Dimensionality `d` of the indexed points.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of indexed points `N`.
    #[must_use]
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// Number of surviving (non-empty) clusters.
    #[must_use]
    pub fn ncenters(&self) -> usize {
        self.ncenters
    }

    /// The metric handle this index was built with.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Number of points in each surviving cluster, in cluster order.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// `observation_id()[r]` is the original index of the point now at row `r`.
    #[must_use]
    pub fn observation_id(&self) -> &[usize] {
        &self.observation_id
    }

    /// `new_location()[i]` is the row now holding the point originally at index `i`.
    #[must_use]
    pub fn new_location(&self) -> &[usize] {
        &self.new_location
    }

    pub(crate) fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.dim..(r + 1) * self.dim]
    }

    pub(crate) fn center(&self, c: usize) -> &[T] {
        &self.centers[c * self.dim..(c + 1) * self.dim]
    }
}

/// Scatters rows of `data` so that row `target[o]` ends up holding the point
/// originally at row `o`, in place, using one d-wide scratch buffer.
///
/// `target` must be a permutation of `0..n` where `n = data.len() / dim`.
fn permute_rows_in_place<T: Copy>(data: &mut [T], dim: usize, target: &[usize]) {
    let n = target.len();
    if n == 0 || dim == 0 {
        return;
    }
    let mut used = vec![false; n];
    let mut carry = vec![data[0]; dim];
    let mut next_carry = vec![data[0]; dim];

    for start in 0..n {
        if used[start] {
            continue;
        }
        if target[start] == start {
            used[start] = true;
            continue;
        }

        carry.copy_from_slice(&data[start * dim..(start + 1) * dim]);
        used[start] = true;
        let mut cur = start;

        loop {
            let dest = target[cur];
            if dest == start {
                data[dest * dim..(dest + 1) * dim].copy_from_slice(&carry);
                break;
            }
            // Row `dest` still holds its original content (untouched so far);
            // save it before we overwrite the row with `carry`.
            next_carry.copy_from_slice(&data[dest * dim..(dest + 1) * dim]);
            data[dest * dim..(dest + 1) * dim].copy_from_slice(&carry);
            used[dest] = true;
            std::mem::swap(&mut carry, &mut next_carry);
            cur = dest;
        }
    }
}
