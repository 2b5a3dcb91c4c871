//! Conversion orchestration for gridzarr.
//!
//! Ties the source loaders and the chunked store together: NetCDF/GRIB2 →
//! store, store → NetCDF, and the lazy single-variable load. Also owns the
//! data-directory layout the CLI works across.

pub mod dirs;
pub mod error;
pub mod export;
pub mod grib;
pub mod netcdf;
pub mod outcome;

pub use dirs::DataDirs;
pub use error::{ConvertError, ConvertResult};
pub use export::{load_lazy, zarr_to_netcdf, CombineStrategy};
pub use grib::{grib_to_zarr, load_grib, store_name_with_filter};
pub use netcdf::{load_netcdf, netcdf_to_zarr, Loaded};
pub use outcome::{ConvertOutcome, SkipReason};
