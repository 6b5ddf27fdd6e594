//! Reads points from a source and constructs a [`crate::Prebuilt`].

use distances::{Metric, Number};
use knncolle::{kmeans::LloydKmeans, Kmeans};

use crate::{prebuilt::Prebuilt, KmknnError, Options};

/// Builds a [`Prebuilt`] KMKNN index from row-major input points.
///
/// Points may be supplied in any numeric representation (`In`); they are
/// converted element-wise into the index's Common representation `T` at
/// ingest, as the only conversion point between the host's input type and
/// the index's internal one.
pub struct IndexBuilder<T, M, Km = LloydKmeans> {
    metric: M,
    options: Options<Km>,
    _common: std::marker::PhantomData<fn() -> T>,
}

impl<T, M> IndexBuilder<T, M, LloydKmeans>
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T> + Clone,
{
    /// Creates a builder with default [`Options`] (`power = 0.5`, default k-means).
    pub fn new(metric: M) -> Self {
        Self {
            metric,
            options: Options::default(),
            _common: std::marker::PhantomData,
        }
    }
}

impl<T, M, Km> IndexBuilder<T, M, Km>
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T> + Clone,
    Km: Kmeans<T>,
{
    /// Creates a builder with an explicit [`Options`] value, e.g. to plug in
    /// a non-default k-means implementation.
    pub fn with_options(metric: M, options: Options<Km>) -> Self {
        Self {
            metric,
            options,
            _common: std::marker::PhantomData,
        }
    }

    /// Reads `nobs` row-major `dim`-length points (in their original order)
    /// from `points`, converting each element into the Common representation
    /// `T`, and constructs the index.
    ///
    /// # Errors
    ///
    /// Returns [`KmknnError::Configuration`] if the options are invalid, or
    /// [`KmknnError::Collaborator`] if an input element cannot be represented
    /// in `T`.
    pub fn build<In: Number>(&self, dim: usize, points: &[In]) -> Result<Prebuilt<T, M>, KmknnError> {
        if dim == 0 {
            return Err(KmknnError::Configuration("dim must be positive".to_string()));
        }
        if points.len() % dim != 0 {
            return Err(KmknnError::Configuration(format!(
                "input length {} is not a multiple of dim {dim}",
                points.len()
            )));
        }
        let nobs = points.len() / dim;

        let mut data = Vec::with_capacity(points.len());
        for &x in points {
            let converted = <T as num_traits::NumCast>::from(x)
                .ok_or_else(|| KmknnError::Collaborator(format!("input value {x} is not representable in the index's numeric type")))?;
            data.push(converted);
        }

        Prebuilt::new(dim, nobs, data, self.metric.clone(), &self.options)
    }

    /// Like [`IndexBuilder::build`], but for input already in the Common
    /// representation `T` (skips the element-wise conversion).
    ///
    /// # Errors
    ///
    /// Returns [`KmknnError::Configuration`] if the options are invalid.
    pub fn build_common(&self, dim: usize, points: Vec<T>) -> Result<Prebuilt<T, M>, KmknnError> {
        if dim == 0 {
            return Err(KmknnError::Configuration("dim must be positive".to_string()));
        }
        if points.len() % dim != 0 {
            return Err(KmknnError::Configuration(format!(
                "input length {} is not a multiple of dim {dim}",
                points.len()
            )));
        }
        let nobs = points.len() / dim;
        Prebuilt::new(dim, nobs, points, self.metric.clone(), &self.options)
    }
}
