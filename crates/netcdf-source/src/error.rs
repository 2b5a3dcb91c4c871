//! Error types for NetCDF loading and refactoring.

use thiserror::Error;

/// Result type alias using NetcdfSourceError.
pub type NcResult<T> = Result<T, NetcdfSourceError>;

/// Errors raised while loading, refactoring or writing NetCDF data.
#[derive(Debug, Error)]
pub enum NetcdfSourceError {
    /// File could not be opened or created by the NetCDF library.
    #[error("failed to open NetCDF file {path}: {message}")]
    Open { path: String, message: String },

    /// A variable or attribute could not be read.
    #[error("failed to read '{name}': {message}")]
    Read { name: String, message: String },

    /// A variable or attribute could not be written.
    #[error("failed to write '{name}': {message}")]
    Write { name: String, message: String },

    /// Variables share a name with one of their dimensions and cannot be
    /// represented as a labeled dataset without refactoring.
    #[error(
        "variables {names:?} share a name with one of their dimensions; \
         pass them as refactor variables to rename them into coordinates"
    )]
    NameCollision { names: Vec<String> },

    /// A name given for refactoring does not exist in the file.
    #[error("refactor variable '{name}' does not exist in the source file")]
    MissingVariable { name: String },

    /// The refactor list was empty.
    #[error("no conflicting variable names were supplied")]
    EmptyRefactorList,

    /// The refactor list names the same variable twice.
    #[error("refactor variable '{0}' was supplied more than once")]
    DuplicateRefactorName(String),

    /// A refactored variable is not two-dimensional and cannot take the
    /// `(name, secondary_axis)` axis pair.
    #[error("refactor variable '{name}' has rank {ndim}, expected 2")]
    UnsupportedRank { name: String, ndim: usize },

    /// A dataset constraint was violated, e.g. a residual collision while
    /// merging refactored coordinates.
    #[error("dataset constraint violated: {0}")]
    Dataset(#[from] dataset::DatasetError),
}
