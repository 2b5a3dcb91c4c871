//! Error types for Zarr store operations.

use thiserror::Error;

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while writing or reading chunked stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The destination store is already populated. Existing stores are
    /// never overwritten or truncated.
    #[error("store {path} already exists; remove it or persist under a different name")]
    AlreadyExists { path: String },

    /// The store path does not exist or is not a store.
    #[error("failed to open store {path}: {message}")]
    Open { path: String, message: String },

    /// Store directory or metadata could not be created.
    #[error("failed to create store {path}: {message}")]
    Create { path: String, message: String },

    /// An array or its metadata could not be read.
    #[error("failed to read '{name}': {message}")]
    Read { name: String, message: String },

    /// An array or its metadata could not be written.
    #[error("failed to write '{name}': {message}")]
    Write { name: String, message: String },

    /// The requested variable is not present in the store.
    #[error("variable '{variable}' not found in store {path}")]
    MissingVariable { variable: String, path: String },

    /// Store metadata lacks the bookkeeping this tool records at persist
    /// time; the store was not written by gridzarr or is damaged.
    #[error("store {path} is missing bookkeeping attribute '{key}'")]
    MissingBookkeeping { path: String, key: String },

    /// Filesystem error outside the Zarr library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset constraint was violated while rebuilding from the store.
    #[error("dataset constraint violated: {0}")]
    Dataset(#[from] dataset::DatasetError),
}
