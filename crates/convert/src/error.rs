//! Error types for conversion orchestration.

use thiserror::Error;

/// Result type alias using ConvertError.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while orchestrating conversions.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source file is not in the raw-data directory.
    #[error("source file {path} does not exist; download it into the raw-data directory first")]
    MissingSource { path: String },

    /// Unknown combine strategy name.
    #[error("unknown combine strategy '{0}'; expected 'by_coords' or 'nested'")]
    InvalidCombineStrategy(String),

    #[error(transparent)]
    Netcdf(#[from] netcdf_source::NetcdfSourceError),

    #[error(transparent)]
    Grib(#[from] grib_source::GribSourceError),

    #[error(transparent)]
    Store(#[from] zarr_store::StoreError),

    #[error("dataset constraint violated: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
