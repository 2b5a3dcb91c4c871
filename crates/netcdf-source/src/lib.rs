//! NetCDF source loading for gridzarr.
//!
//! Reads NetCDF files into [`dataset::LabeledDataset`] values, detects the
//! variable/dimension naming collision that makes some model output (UFS
//! tile files and similar) unrepresentable in labeled form, and implements
//! the coordinate refactoring that resolves it. Also writes datasets back
//! out as NetCDF for the store-to-source path.
//!
//! Time axes are never decoded: raw encodings pass through untouched.

pub mod error;
pub mod reader;
pub mod refactor;
pub mod writer;

pub use error::{NcResult, NetcdfSourceError};
pub use reader::{open_dataset, open_dataset_dropping};
pub use refactor::{refactor_coordinates, DEFAULT_COORD_SUFFIX, DEFAULT_SECONDARY_AXIS};
pub use writer::write_dataset;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics to stderr even for conditions the
/// Rust code handles gracefully (missing optional attributes, probing a
/// non-HDF5 file). Calling `H5Eset_auto2` with null handlers turns that off
/// for the whole process. Safe to call any number of times.
pub fn silence_hdf5_errors() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe; null handlers are the
        // documented way to disable automatic error reporting.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}
