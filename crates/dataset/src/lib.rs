//! In-memory labeled dataset model shared across the gridzarr crates.
//!
//! A [`LabeledDataset`] is a self-describing collection of N-dimensional
//! variables: named dimensions, coordinate variables, data variables, and
//! free-form attributes at dataset and variable granularity. Source loaders
//! (NetCDF, GRIB2) produce it; the Zarr store persists and restores it.

pub mod attrs;
pub mod dataset;
pub mod error;

pub use attrs::AttrValue;
pub use dataset::{LabeledDataset, Variable};
pub use error::{DatasetError, DatasetResult};
