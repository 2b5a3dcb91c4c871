//! Error types for GRIB2 loading and filtering.

use thiserror::Error;

/// Result type alias using GribSourceError.
pub type GribResult<T> = Result<T, GribSourceError>;

/// Errors raised while loading or filtering GRIB2 data.
#[derive(Debug, Error)]
pub enum GribSourceError {
    /// File could not be opened.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The GRIB2 structure could not be parsed.
    #[error("failed to parse GRIB2 file {path}: {message}")]
    Parse { path: String, message: String },

    /// A field's packed values could not be decoded.
    #[error("failed to decode GRIB2 field '{name}': {message}")]
    Decode { name: String, message: String },

    /// `-k` and `-v` lists differ in length.
    #[error("{keys} filter keys were given but {values} values; supply exactly one value per key")]
    MismatchedFilterPairs { keys: usize, values: usize },

    /// A filter key outside the supported set.
    #[error("unsupported filter key '{key}'; supported keys are shortName, typeOfLevel and level")]
    UnsupportedFilterKey { key: String },

    /// The same filter key was given twice.
    #[error("filter key '{0}' was supplied more than once")]
    DuplicateFilterKey(String),

    /// After filtering, one field name still maps to several messages; the
    /// dataset cannot hold more than one hypercube per name.
    #[error(
        "field '{name}' matches more than one message; narrow the selection \
         with key/value filters (e.g. typeOfLevel or level)"
    )]
    MultipleFields { name: String },

    /// The filter removed every message. Recoverable by correcting the
    /// key/value pairs; reported as an expected empty outcome upstream.
    #[error("the key/value filter selected no fields ({filter})")]
    FilterUnderSelection { filter: String },

    /// The file contains no GRIB2 messages at all.
    #[error("no GRIB2 fields found in {path}")]
    NoMessages { path: String },

    /// A dataset constraint was violated while assembling the result.
    #[error("dataset constraint violated: {0}")]
    Dataset(#[from] dataset::DatasetError),
}
