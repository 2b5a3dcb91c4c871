//! GRIB2 source loading for gridzarr.
//!
//! Delegates GRIB2 structure and value decoding to the `grib` crate and
//! exposes the loaded fields as a [`dataset::LabeledDataset`], with
//! cfgrib-style key/value filtering to pick one hypercube per field out of
//! products that carry several.

pub mod error;
pub mod filter;
pub mod reader;

pub use error::{GribResult, GribSourceError};
pub use filter::{KeyFilter, SUPPORTED_KEYS};
pub use reader::{load_dataset, MessageMeta};
