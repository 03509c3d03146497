//! Error type shared by every container in the crate.

use thiserror::Error;

/// Failures reported by container operations. None of them leave the
/// container modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An index or position outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Element access or removal on an empty container.
    #[error("container is empty")]
    Empty,

    /// A list position that is the end marker or no longer names a live node.
    #[error("position does not refer to a live element")]
    InvalidPosition,

    /// `insert_unique` found an element with the same key.
    #[error("an element with this key is already present")]
    DuplicateKey,

    /// A growth policy or table configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidPolicy(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
