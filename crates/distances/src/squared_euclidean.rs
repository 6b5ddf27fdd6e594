//! The `SquaredEuclidean` metric.

use std::{io, path::Path};

use crate::{load_tag, save_tag, Loadable, Metric, Number};

/// The Euclidean (L2) metric, computed internally as squared Euclidean distance.
///
/// `raw` is the sum of squared elementwise differences, monotone in the true
/// (L2) distance. `normalize` takes the square root to recover the true
/// distance; `denormalize` squares it back.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl<T: Number + num_traits::Float> Metric<T> for SquaredEuclidean {
    type Raw = T;
    type Distance = T;

    fn raw(&self, a: &[T], b: &[T]) -> T {
        a.iter().zip(b.iter()).map(|(&x, &y)| (x - y) * (x - y)).sum()
    }

    fn normalize(&self, raw: T) -> T {
        raw.sqrt()
    }

    fn denormalize(&self, distance: T) -> T {
        distance * distance
    }

    fn name(&self) -> &'static str {
        "squared-euclidean"
    }

    fn save(&self, prefix: &Path) -> io::Result<()> {
        save_tag(prefix, "distance_kind", self.name())
    }
}

impl Loadable for SquaredEuclidean {
    fn load(prefix: &Path) -> io::Result<Self> {
        let tag = load_tag(prefix, "distance_kind")?;
        if tag == "squared-euclidean" {
            Ok(Self)
        } else {
            Err(io::Error::new(io::ErrorKind::InvalidData, format!("expected distance_kind 'squared-euclidean', found {tag:?}")))
        }
    }
}
