//! Generic, algorithm-agnostic collaborators for nearest-neighbor indices.
//!
//! This crate does not implement any particular search index. It provides
//! the narrow contracts that a concrete index (such as `knncolle-kmknn`)
//! consumes: a pluggable k-means algorithm ([`kmeans`]), a bounded top-k
//! collector ([`NeighborQueue`]), the generic [`Index`]/[`Searcher`] traits
//! every CAKES-family algorithm implements, and a process-wide [`registry`]
//! for reloading a saved index by algorithm tag.

pub mod kmeans;
mod neighbor_queue;
mod registry;
mod search;

pub use kmeans::{Kmeans, KmeansResult};
pub use neighbor_queue::NeighborQueue;
pub use registry::{load, register, Loader, RegistryError};
pub use search::{Index, Searcher};
