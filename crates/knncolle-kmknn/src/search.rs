//! The two pruning search routines: k-NN and radius.

pub(crate) mod knn;
pub(crate) mod radius;
