//! Construction-time options for [`crate::Prebuilt`].

use knncolle::kmeans::{init::KmeansPlusPlusInit, refine::HartiganWongRefine, LloydKmeans};

/// Options controlling how a [`crate::Prebuilt`] is constructed.
///
/// `power` determines the number of clusters requested from k-means:
/// `K = ceil(N^power)`. The default of `0.5` (the square root) is the
/// value used by the original KMKNN paper and is a reasonable default for
/// most datasets.
pub struct Options<Km = LloydKmeans<KmeansPlusPlusInit, HartiganWongRefine>> {
    pub(crate) power: f64,
    pub(crate) kmeans: Km,
}

impl Default for Options<LloydKmeans<KmeansPlusPlusInit, HartiganWongRefine>> {
    fn default() -> Self {
        Self {
            power: 0.5,
            kmeans: LloydKmeans::default(),
        }
    }
}

impl<Km> Options<Km> {
    /// Sets the cluster-count exponent. `K = ceil(N^power)`.
    #[must_use]
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    /// Swaps in a different k-means implementation, e.g. to plug in a
    /// non-default initializer or refinement strategy.
    #[must_use]
    pub fn with_kmeans<Km2>(self, kmeans: Km2) -> Options<Km2> {
        Options { power: self.power, kmeans }
    }

    /// Returns the configured cluster-count exponent.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Returns a reference to the configured k-means implementation.
    pub(crate) fn kmeans(&self) -> &Km {
        &self.kmeans
    }
}

/// Computes `K = ceil(N^power)`, returning an error for a non-positive power
/// or an overflowing result.
///
/// # Errors
///
/// Returns [`crate::KmknnError::Configuration`] if `power` is not positive,
/// or if the computed `K` does not fit in a `usize`.
pub fn cluster_count(n: usize, power: f64) -> Result<usize, crate::KmknnError> {
    if !(power > 0.0) {
        return Err(crate::KmknnError::Configuration(format!("power must be positive, got {power}")));
    }
    if n == 0 {
        return Ok(0);
    }
    #[allow(clippy::cast_precision_loss)]
    let k = (n as f64).powf(power).ceil();
    if !k.is_finite() || k > usize::MAX as f64 {
        return Err(crate::KmknnError::Configuration(format!("computed cluster count {k} overflows usize")));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(k as usize)
}
