//! The error type returned by this crate's fallible operations.

use std::{fmt, io};

/// Errors surfaced by construction, search, and persistence.
#[derive(Debug)]
pub enum KmknnError {
    /// A configuration value was invalid (e.g. a non-positive `power`).
    Configuration(String),
    /// A collaborator (the k-means implementation or the metric) failed.
    Collaborator(String),
    /// Save/load hit an I/O error.
    Persistence(io::Error),
    /// The `ALGORITHM` blob did not carry the expected KMKNN tag.
    TagMismatch {
        /// The tag this loader requires.
        expected: &'static str,
        /// The tag actually found on disk.
        found: String,
    },
}

impl fmt::Display for KmknnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Collaborator(msg) => write!(f, "collaborator failed: {msg}"),
            Self::Persistence(e) => write!(f, "persistence failure: {e}"),
            Self::TagMismatch { expected, found } => {
                write!(f, "algorithm tag mismatch: expected {expected:?}, found {found:?}")
            }
        }
    }
}

impl std::error::Error for KmknnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for KmknnError {
    fn from(e: io::Error) -> Self {
        Self::Persistence(e)
    }
}
