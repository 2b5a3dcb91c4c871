//! Error types for dataset construction and validation.

use thiserror::Error;

/// Result type alias using DatasetError.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while assembling or validating a labeled dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A variable shares its name with a dimension it does not index.
    #[error("variable '{name}' collides with dimension '{dim}': a variable may only share a dimension's name when it is that dimension's 1-D index coordinate")]
    NameCollision { name: String, dim: String },

    /// A variable or coordinate name is already taken in this dataset.
    #[error("name '{0}' is already in use in this dataset")]
    NameInUse(String),

    /// Two definitions of the same dimension disagree on its length.
    #[error("dimension '{name}' has conflicting lengths: {existing} (existing) vs {requested} (requested)")]
    DimLengthConflict {
        name: String,
        existing: usize,
        requested: usize,
    },

    /// Variable data does not match the declared shape.
    #[error("data length {actual} does not match shape {shape:?} ({expected} elements)")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Dimension-name list and shape disagree in rank.
    #[error("{dims} dimension names for a rank-{rank} shape")]
    RankMismatch { dims: usize, rank: usize },

    /// An attribute payload cannot be represented.
    #[error("unsupported attribute payload: {0}")]
    InvalidAttribute(String),
}
