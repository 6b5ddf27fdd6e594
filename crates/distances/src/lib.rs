//! Distance metric contracts for dense numeric points.
//!
//! This crate provides the narrow `Metric` contract consumed by search
//! indices elsewhere in the workspace: `raw` computes a monotone transform
//! of the true distance between two points, `normalize` converts raw to
//! true, and `denormalize` converts true back to raw. Two concrete metrics
//! are provided: [`SquaredEuclidean`] and [`Manhattan`].

mod manhattan;
mod number;
mod squared_euclidean;

pub use manhattan::Manhattan;
pub use number::Number;
pub use squared_euclidean::SquaredEuclidean;

use std::{io, path::Path};

/// The contract a distance metric must satisfy to be used by a nearest-neighbor index.
///
/// Implementations must satisfy:
///
/// - `normalize` is monotonically non-decreasing.
/// - `denormalize(normalize(r)) == r` within numerical tolerance.
/// - The true (normalized) distance obeys the triangle inequality.
pub trait Metric<T: Number>: Clone + Send + Sync {
    /// The "raw" distance representation, compared directly in hot search loops.
    type Raw: Number;
    /// The "true" (user-visible, normalized) distance representation.
    type Distance: Number;

    /// Computes the raw distance between two `dim`-dimensional points.
    fn raw(&self, a: &[T], b: &[T]) -> Self::Raw;

    /// Converts a raw distance into a true distance.
    fn normalize(&self, raw: Self::Raw) -> Self::Distance;

    /// Converts a true distance back into a raw distance.
    fn denormalize(&self, distance: Self::Distance) -> Self::Raw;

    /// A short, stable, diagnostic name for the metric.
    fn name(&self) -> &'static str;

    /// Persists any state needed to reconstruct this metric, under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file I/O fails.
    fn save(&self, prefix: &Path) -> io::Result<()>;
}

/// Writes a one-line ASCII tag identifying a metric kind, used by [`Metric::save`]
/// implementations and read back by [`load_tag`].
///
/// # Errors
///
/// Returns an error if the underlying file cannot be written.
pub fn save_tag(prefix: &Path, sub_name: &str, tag: &str) -> io::Result<()> {
    std::fs::write(tagged_path(prefix, sub_name), tag)
}

/// Reads back a tag written by [`save_tag`].
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_tag(prefix: &Path, sub_name: &str) -> io::Result<String> {
    std::fs::read_to_string(tagged_path(prefix, sub_name))
}

/// A metric that can reconstruct itself from the `distance_*` sub-prefix its
/// own [`Metric::save`] wrote.
///
/// Modeled as a free-standing trait (rather than an instance method) because
/// reconstruction happens before any instance exists, mirroring the
/// out-of-band metric factory in the parent crate's persistence contract.
pub trait Loadable: Sized {
    /// Reconstructs this metric kind from `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `distance_kind` tag is missing or does not
    /// match this metric's name.
    fn load(prefix: &Path) -> io::Result<Self>;
}

/// Builds the blob path for `{prefix}_{sub_name}`, the naming convention used throughout
/// this workspace's on-disk persistence format (see `knncolle_kmknn::persist`).
fn tagged_path(prefix: &Path, sub_name: &str) -> std::path::PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!("_{sub_name}"));
    std::path::PathBuf::from(name)
}
