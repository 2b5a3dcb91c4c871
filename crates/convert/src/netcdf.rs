//! NetCDF → store conversion.

use std::time::Instant;

use tracing::{info, warn};

use dataset::LabeledDataset;
use netcdf_source::{NetcdfSourceError, DEFAULT_COORD_SUFFIX, DEFAULT_SECONDARY_AXIS};
use zarr_store::StoreConfig;

use crate::dirs::{require_file, DataDirs};
use crate::error::ConvertResult;
use crate::outcome::{ConvertOutcome, SkipReason};

/// A load that may legitimately produce nothing.
#[derive(Debug)]
pub enum Loaded {
    Dataset(LabeledDataset),
    Skipped(SkipReason),
}

/// Load a NetCDF file from the raw-data directory.
///
/// With `conflicting` names the coordinate refactorer runs; without, a
/// direct load. A direct load that hits name collisions comes back as
/// [`Loaded::Skipped`] (an expected, user-correctable state) rather than
/// an error.
pub fn load_netcdf(dirs: &DataDirs, filename: &str, conflicting: &[String]) -> ConvertResult<Loaded> {
    let path = dirs.raw_file(filename);
    require_file(&path)?;

    let started = Instant::now();
    if conflicting.is_empty() {
        match netcdf_source::open_dataset(&path) {
            Ok(ds) => {
                info!(
                    file = %filename,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "converted NetCDF to labeled dataset"
                );
                Ok(Loaded::Dataset(ds))
            }
            Err(NetcdfSourceError::NameCollision { names }) => {
                warn!(file = %filename, names = ?names, "unresolved name collisions");
                Ok(Loaded::Skipped(SkipReason::UnresolvedCollision { names }))
            }
            Err(e) => Err(e.into()),
        }
    } else {
        let ds = netcdf_source::refactor_coordinates(
            &path,
            conflicting,
            DEFAULT_COORD_SUFFIX,
            DEFAULT_SECONDARY_AXIS,
        )?;
        info!(
            file = %filename,
            refactored = conflicting.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "converted NetCDF to labeled dataset with refactored coordinates"
        );
        Ok(Loaded::Dataset(ds))
    }
}

/// Convert a NetCDF file to a new store `{store_name}.zarr`.
pub fn netcdf_to_zarr(
    dirs: &DataDirs,
    filename: &str,
    store_name: &str,
    conflicting: &[String],
    config: &StoreConfig,
) -> ConvertResult<ConvertOutcome> {
    match load_netcdf(dirs, filename, conflicting)? {
        Loaded::Skipped(reason) => Ok(ConvertOutcome::Skipped(reason)),
        Loaded::Dataset(ds) => {
            let started = Instant::now();
            let report = zarr_store::persist(&dirs.zarr, store_name, &ds, config)?;
            info!(
                store = %report.path.display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "converted dataset to store"
            );
            Ok(ConvertOutcome::Stored(report))
        }
    }
}
