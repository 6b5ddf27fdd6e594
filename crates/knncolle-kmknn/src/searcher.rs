//! The per-query search workspace.

use std::path::Path;

use distances::{Metric, Number};
use knncolle::NeighborQueue;

use crate::{prebuilt::Prebuilt, search};

/// A single-threaded, reusable per-query search workspace borrowing a
/// [`Prebuilt`].
///
/// Holds the bounded neighbor queue and the per-query center ordering as
/// reusable scratch; cheap to create, must not be shared across concurrent
/// callers (see the crate-level concurrency notes).
pub struct Searcher<'a, T, M> {
    prebuilt: &'a Prebuilt<T, M>,
    queue: NeighborQueue<T>,
    center_order: Vec<(T, usize)>,
    radius_ids: Vec<usize>,
    radius_raw: Vec<T>,
}

impl<'a, T, M> Searcher<'a, T, M>
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T>,
{
    pub(crate) fn new(prebuilt: &'a Prebuilt<T, M>) -> Self {
        Self {
            prebuilt,
            queue: NeighborQueue::new(),
            center_order: Vec::with_capacity(prebuilt.ncenters()),
            radius_ids: Vec::new(),
            radius_raw: Vec::new(),
        }
    }

    /// Drains `self.queue` into original-index / true-distance pairs,
    /// optionally excluding one permuted row.
    fn drain_queue(&mut self, exclude: Option<usize>) -> (Vec<usize>, Vec<f64>) {
        let mut rows = Vec::new();
        let mut raws: Vec<T> = Vec::new();
        self.queue.report(Some(&mut rows), Some(&mut raws), exclude);

        let metric = self.prebuilt.metric();
        let ids = rows.iter().map(|&r| self.prebuilt.observation_id[r]).collect();
        let dists = raws.iter().map(|&raw| to_f64(metric.normalize(raw))).collect();
        (ids, dists)
    }
}

fn to_f64<T: Number>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn radius_to_common<T: Number>(radius: f64) -> T {
    <T as num_traits::NumCast>::from(radius).unwrap_or_else(T::max_value)
}

impl<'a, T, M> knncolle::Searcher<T> for Searcher<'a, T, M>
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T>,
{
    fn search_by_index(&mut self, i: usize, k: usize) -> (Vec<usize>, Vec<f64>) {
        let self_row = self.prebuilt.new_location[i];
        let query = self.prebuilt.row(self_row);
        self.queue.reset(k + 1);
        search::knn::search_nn(self.prebuilt, query, &mut self.queue, &mut self.center_order);
        self.drain_queue(Some(self_row))
    }

    fn search_by_point(&mut self, query: &[T], k: usize) -> (Vec<usize>, Vec<f64>) {
        if k == 0 {
            return (Vec::new(), Vec::new());
        }
        self.queue.reset(k);
        search::knn::search_nn(self.prebuilt, query, &mut self.queue, &mut self.center_order);
        self.drain_queue(None)
    }

    fn count_within_radius_by_index(&mut self, i: usize, radius: f64) -> usize {
        let self_row = self.prebuilt.new_location[i];
        let query = self.prebuilt.row(self_row);
        let t = radius_to_common::<T>(radius);
        let count = search::radius::search_all(self.prebuilt, query, t, None, None);
        // The self point is always within any non-negative radius of itself
        // (true distance 0) and is included by the core routine above; the
        // searcher subtracts it here, matching the source's
        // `count_all_neighbors_without_self` wrapper.
        count.saturating_sub(1)
    }

    fn search_within_radius_by_index(&mut self, i: usize, radius: f64) -> (Vec<usize>, Vec<f64>) {
        let self_row = self.prebuilt.new_location[i];
        let query = self.prebuilt.row(self_row);
        let t = radius_to_common::<T>(radius);

        self.radius_ids.clear();
        self.radius_raw.clear();
        search::radius::search_all(self.prebuilt, query, t, Some(&mut self.radius_ids), Some(&mut self.radius_raw));

        let metric = self.prebuilt.metric();
        let mut ids = Vec::with_capacity(self.radius_ids.len());
        let mut dists = Vec::with_capacity(self.radius_ids.len());
        for (&r, &raw) in self.radius_ids.iter().zip(self.radius_raw.iter()) {
            if r == self_row {
                continue;
            }
            ids.push(self.prebuilt.observation_id[r]);
            dists.push(to_f64(metric.normalize(raw)));
        }
        (ids, dists)
    }

    fn count_within_radius_by_point(&mut self, query: &[T], radius: f64) -> usize {
        let t = radius_to_common::<T>(radius);
        search::radius::search_all(self.prebuilt, query, t, None, None)
    }

    fn search_within_radius_by_point(&mut self, query: &[T], radius: f64) -> (Vec<usize>, Vec<f64>) {
        let t = radius_to_common::<T>(radius);

        self.radius_ids.clear();
        self.radius_raw.clear();
        search::radius::search_all(self.prebuilt, query, t, Some(&mut self.radius_ids), Some(&mut self.radius_raw));

        let metric = self.prebuilt.metric();
        let ids = self.radius_ids.iter().map(|&r| self.prebuilt.observation_id[r]).collect();
        let dists = self.radius_raw.iter().map(|&raw| to_f64(metric.normalize(raw))).collect();
        (ids, dists)
    }
}

impl<T, M> knncolle::Index<T> for Prebuilt<T, M>
where
    T: Number + serde::Serialize,
    M: Metric<T, Raw = T, Distance = T> + Clone,
{
    type Searcher<'s>
        = Searcher<'s, T, M>
    where
        Self: 's;

    fn num_observations(&self) -> usize {
        self.nobs()
    }

    fn num_dimensions(&self) -> usize {
        self.dim()
    }

    fn initialize(&self) -> Self::Searcher<'_> {
        Searcher::new(self)
    }

    fn save(&self, prefix: &Path) -> std::io::Result<()> {
        Prebuilt::save(self, prefix)
    }
}
