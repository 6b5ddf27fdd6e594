//! On-disk persistence: a set of simple binary blobs sharing a path prefix.

use std::{io, path::Path};

use distances::{Loadable, Metric, Number};

use crate::{prebuilt::Prebuilt, KmknnError};

/// The ASCII tag written to the `ALGORITHM` blob and checked on reload.
pub const ALGORITHM_TAG: &str = "knncolle_kmknn::Kmknn";

impl<T, M> Prebuilt<T, M>
where
    T: Number + serde::Serialize,
    M: Metric<T, Raw = T, Distance = T>,
{
    /// Saves this index to a set of files sharing `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file I/O fails.
    pub fn save(&self, prefix: &Path) -> io::Result<()> {
        distances::save_tag(prefix, "ALGORITHM", ALGORITHM_TAG)?;
        write_blob(prefix, "num_obs", &self.nobs)?;
        write_blob(prefix, "num_dim", &self.dim)?;
        write_blob(prefix, "num_centers", &self.ncenters)?;
        write_blob(prefix, "data", &self.data)?;
        write_blob(prefix, "sizes", &self.sizes)?;
        write_blob(prefix, "offsets", &self.offsets)?;
        write_blob(prefix, "centers", &self.centers)?;
        write_blob(prefix, "observation_id", &self.observation_id)?;
        write_blob(prefix, "new_location", &self.new_location)?;
        write_blob(prefix, "dist_to_centroid", &self.dist_to_centroid)?;
        self.metric.save(prefix)?;
        ftlog::debug!("Prebuilt::save: wrote {} observations to {}", self.nobs, prefix.display());
        Ok(())
    }
}

impl<T, M> Prebuilt<T, M>
where
    T: Number + serde::de::DeserializeOwned,
    M: Metric<T, Raw = T, Distance = T> + Loadable,
{
    /// Reloads an index previously written by [`Prebuilt::save`].
    ///
    /// The `num_centers` blob is treated as authoritative and validated
    /// against the length of the `sizes` blob, resolving the ambiguity
    /// between the two noted during the design of this loader.
    ///
    /// # Errors
    ///
    /// Returns [`KmknnError::TagMismatch`] if the `ALGORITHM` blob does not
    /// carry this loader's tag, or [`KmknnError::Collaborator`] if
    /// `num_centers` disagrees with the `sizes` blob.
    pub fn load(prefix: &Path) -> Result<Self, KmknnError> {
        let tag = distances::load_tag(prefix, "ALGORITHM")?;
        if tag != ALGORITHM_TAG {
            return Err(KmknnError::TagMismatch { expected: ALGORITHM_TAG, found: tag });
        }

        let nobs: usize = read_blob(prefix, "num_obs")?;
        let dim: usize = read_blob(prefix, "num_dim")?;
        let num_centers: usize = read_blob(prefix, "num_centers")?;
        let data: Vec<T> = read_blob(prefix, "data")?;
        let sizes: Vec<usize> = read_blob(prefix, "sizes")?;
        let offsets: Vec<usize> = read_blob(prefix, "offsets")?;
        let centers: Vec<T> = read_blob(prefix, "centers")?;
        let observation_id: Vec<usize> = read_blob(prefix, "observation_id")?;
        let new_location: Vec<usize> = read_blob(prefix, "new_location")?;
        let dist_to_centroid: Vec<T> = read_blob(prefix, "dist_to_centroid")?;
        let metric = M::load(prefix)?;

        if sizes.len() != num_centers {
            return Err(KmknnError::Collaborator(format!(
                "num_centers blob ({num_centers}) disagrees with the sizes blob length ({})",
                sizes.len()
            )));
        }

        ftlog::debug!("Prebuilt::load: reloaded {nobs} observations from {}", prefix.display());

        Ok(Self {
            dim,
            nobs,
            ncenters: num_centers,
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
}

/// Registers the KMKNN loader for `(T, M)` under [`ALGORITHM_TAG`] with the
/// process-wide registry, so that a prefix saved with this `(T, M)`
/// instantiation can be reloaded via `knncolle::registry::load`.
///
/// Idempotent; intended to be called once during single-threaded host
/// startup, as documented on [`knncolle::register`].
pub fn register_loader<T, M>() -> bool
where
    T: 'static + Number + serde::de::DeserializeOwned,
    M: 'static + Metric<T, Raw = T, Distance = T> + Loadable,
{
    knncolle::register(ALGORITHM_TAG, load_boxed::<T, M>)
}

fn load_boxed<T, M>(prefix: &Path) -> io::Result<Box<dyn std::any::Any>>
where
    T: 'static + Number + serde::de::DeserializeOwned,
    M: 'static + Metric<T, Raw = T, Distance = T> + Loadable,
{
    let prebuilt = Prebuilt::<T, M>::load(prefix).map_err(|e| match e {
        KmknnError::Persistence(io_err) => io_err,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    })?;
    Ok(Box::new(prebuilt))
}

fn write_blob<V: serde::Serialize>(prefix: &Path, sub_name: &str, value: &V) -> io::Result<()> {
    let file = std::fs::File::create(tagged_path(prefix, sub_name))?;
    bincode::serialize_into(file, value).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn read_blob<V: serde::de::DeserializeOwned>(prefix: &Path, sub_name: &str) -> io::Result<V> {
    let file = std::fs::File::open(tagged_path(prefix, sub_name))?;
    bincode::deserialize_from(file).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Builds `{prefix}_{sub_name}`, matching the blob-naming convention used by
/// [`distances::save_tag`]/[`distances::load_tag`].
fn tagged_path(prefix: &Path, sub_name: &str) -> std::path::PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!("_{sub_name}"));
    std::path::PathBuf::from(name)
}
