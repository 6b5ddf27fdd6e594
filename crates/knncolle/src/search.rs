//! Generic nearest-neighbor index/searcher interfaces.
//!
//! Any CAKES-family exact-search algorithm (KMKNN included) implements these
//! two traits so that host code can be written against the interface rather
//! than against a specific algorithm.

use std::path::Path;

use distances::Number;

/// A built, queryable nearest-neighbor index.
pub trait Index<T: Number> {
    /// The per-query workspace type this index hands out via [`Index::initialize`].
    type Searcher<'a>: Searcher<T>
    where
        Self: 'a;

    /// The number of points indexed.
    fn num_observations(&self) -> usize;

    /// The dimensionality of the indexed points.
    fn num_dimensions(&self) -> usize;

    /// Creates a new, single-threaded searcher borrowing this index.
    fn initialize(&self) -> Self::Searcher<'_>;

    /// Persists this index to a set of files sharing `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file I/O fails.
    fn save(&self, prefix: &Path) -> std::io::Result<()>;
}

/// A single-threaded, reusable per-query search workspace.
///
/// A `Searcher` borrows its parent [`Index`] and owns only its own scratch
/// buffers; it must not outlive the index and must not be shared across
/// concurrent callers (each caller should create its own `Searcher`).
pub trait Searcher<T: Number> {
    /// Finds the `k` nearest neighbors of the `i`-th indexed point, excluding itself.
    fn search_by_index(&mut self, i: usize, k: usize) -> (Vec<usize>, Vec<f64>);

    /// Finds the `k` nearest neighbors of an arbitrary query point.
    fn search_by_point(&mut self, query: &[T], k: usize) -> (Vec<usize>, Vec<f64>);

    /// Counts the indexed points within `radius` of the `i`-th indexed point, excluding itself.
    fn count_within_radius_by_index(&mut self, i: usize, radius: f64) -> usize;

    /// Finds the indexed points within `radius` of the `i`-th indexed point, excluding itself.
    fn search_within_radius_by_index(&mut self, i: usize, radius: f64) -> (Vec<usize>, Vec<f64>);

    /// Counts the indexed points within `radius` of an arbitrary query point.
    fn count_within_radius_by_point(&mut self, query: &[T], radius: f64) -> usize;

    /// Finds the indexed points within `radius` of an arbitrary query point.
    fn search_within_radius_by_point(&mut self, query: &[T], radius: f64) -> (Vec<usize>, Vec<f64>);

    /// Whether this searcher supports radius search. Always `true` for exact CAKES-family searchers.
    fn can_search_all(&self) -> bool {
        true
    }
}
