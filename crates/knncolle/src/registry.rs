//! A process-wide registry mapping an on-disk algorithm tag to a loader function.
//!
//! Registration is expected to happen once, during single-threaded host
//! startup (as documented on [`register`]); lookups via [`load`] are safe
//! to call from any thread afterwards.

use std::{
    collections::HashMap,
    fmt,
    path::Path,
    sync::{Mutex, OnceLock},
};

/// A function that attempts to reload a persisted index from `prefix`,
/// returning an opaque boxed value on success.
///
/// The registry itself is type-erased: callers downcast the returned
/// `Box<dyn std::any::Any>` to the concrete index type they expect for the
/// tag they looked up.
pub type Loader = fn(&Path) -> std::io::Result<Box<dyn std::any::Any>>;

fn registry() -> &'static Mutex<HashMap<&'static str, Loader>> {
    static REGISTRY: OnceLock<Mutex<HashMap<&'static str, Loader>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Registers `loader` under `tag`.
///
/// Idempotent: registering the same tag again (with the same or a different
/// loader) always succeeds and returns `true`. Intended to be called during
/// single-threaded host startup, before any call to [`load`] from another
/// thread; the registry is not synchronized against concurrent
/// *registration*, only against concurrent *lookup* after registration is
/// complete.
pub fn register(tag: &'static str, loader: Loader) -> bool {
    if let Ok(mut map) = registry().lock() {
        map.insert(tag, loader);
        true
    } else {
        false
    }
}

/// An error returned by [`load`].
#[derive(Debug)]
pub enum RegistryError {
    /// Reading the `ALGORITHM` tag blob failed.
    Io(std::io::Error),
    /// No loader is registered for the tag found on disk.
    UnknownTag(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read algorithm tag: {e}"),
            Self::UnknownTag(tag) => write!(f, "no loader registered for algorithm tag {tag:?}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reads the `ALGORITHM` blob under `prefix` and dispatches to the
/// registered loader for that tag.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the tag blob cannot be read, or
/// [`RegistryError::UnknownTag`] if no loader is registered for it.
pub fn load(prefix: &Path) -> Result<Box<dyn std::any::Any>, RegistryError> {
    let tag = read_algorithm_tag(prefix)?;
    let loader = {
        let map = registry().lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        map.get(tag.as_str()).copied()
    };
    match loader {
        Some(loader) => Ok(loader(prefix)?),
        None => Err(RegistryError::UnknownTag(tag)),
    }
}

fn read_algorithm_tag(prefix: &Path) -> std::io::Result<String> {
    let mut path = prefix.as_os_str().to_os_string();
    path.push("_ALGORITHM");
    std::fs::read_to_string(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_loader(_prefix: &Path) -> std::io::Result<Box<dyn std::any::Any>> {
        Ok(Box::new(42_i32))
    }

    #[test]
    fn register_and_load_round_trip() {
        register("test::FakeAlgorithm", fake_loader);

        let dir = std::env::temp_dir().join(format!("knncolle-registry-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let prefix = dir.join("prefix");
        std::fs::write(format!("{}_ALGORITHM", prefix.display()), "test::FakeAlgorithm").unwrap();

        let loaded = load(&prefix).expect("load should succeed");
        assert_eq!(*loaded.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let dir = std::env::temp_dir().join(format!("knncolle-registry-test-unknown-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let prefix = dir.join("prefix");
        std::fs::write(format!("{}_ALGORITHM", prefix.display()), "nonexistent::Algorithm").unwrap();

        assert!(matches!(load(&prefix), Err(RegistryError::UnknownTag(_))));
    }
}
