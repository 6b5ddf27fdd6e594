//! The `Manhattan` metric.

use std::{io, path::Path};

use crate::{load_tag, save_tag, Loadable, Metric, Number};

/// The Manhattan (L1 / taxicab) metric.
///
/// The L1 raw sum is already the true distance, so `normalize` and
/// `denormalize` are both the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl<T: Number> Metric<T> for Manhattan {
    type Raw = T;
    type Distance = T;

    fn raw(&self, a: &[T], b: &[T]) -> T {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| if x > y { x - y } else { y - x })
            .sum()
    }

    fn normalize(&self, raw: T) -> T {
        raw
    }

    fn denormalize(&self, distance: T) -> T {
        distance
    }

    fn name(&self) -> &'static str {
        "manhattan"
    }

    fn save(&self, prefix: &Path) -> io::Result<()> {
        save_tag(prefix, "distance_kind", self.name())
    }
}

impl Loadable for Manhattan {
    fn load(prefix: &Path) -> io::Result<Self> {
        let tag = load_tag(prefix, "distance_kind")?;
        if tag == "manhattan" {
            Ok(Self)
        } else {
            Err(io::Error::new(io::ErrorKind::InvalidData, format!("expected distance_kind 'manhattan', found {tag:?}")))
        }
    }
}
