//! GRIB2 → store conversion.

use std::time::Instant;

use tracing::{info, warn};

use grib_source::{GribSourceError, KeyFilter};
use zarr_store::StoreConfig;

use crate::dirs::{require_file, DataDirs};
use crate::error::ConvertResult;
use crate::netcdf::Loaded;
use crate::outcome::{ConvertOutcome, SkipReason};

/// Load a GRIB2 file from the raw-data directory, applying `filter`.
///
/// An under-selecting filter comes back as [`Loaded::Skipped`].
pub fn load_grib(dirs: &DataDirs, filename: &str, filter: &KeyFilter) -> ConvertResult<Loaded> {
    let path = dirs.raw_file(filename);
    require_file(&path)?;

    let started = Instant::now();
    match grib_source::load_dataset(&path, filter) {
        Ok(ds) => {
            info!(
                file = %filename,
                fields = ds.data_vars().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "converted GRIB2 to labeled dataset"
            );
            Ok(Loaded::Dataset(ds))
        }
        Err(GribSourceError::FilterUnderSelection { filter }) => {
            warn!(file = %filename, %filter, "filter selected no fields");
            Ok(Loaded::Skipped(SkipReason::UnderSelected { filter }))
        }
        Err(e) => Err(e.into()),
    }
}

/// The store name for a filtered extract: `{name}_{key}{value}…` so several
/// filtered extracts of one source file store side by side.
pub fn store_name_with_filter(store_name: &str, filter: &KeyFilter) -> String {
    if filter.is_empty() {
        store_name.to_string()
    } else {
        format!("{}_{}", store_name, filter.suffix())
    }
}

/// Convert a GRIB2 file to a new store, suffixing the store name with the
/// filter's key/value pairs when one is in effect.
pub fn grib_to_zarr(
    dirs: &DataDirs,
    filename: &str,
    store_name: &str,
    filter: &KeyFilter,
    config: &StoreConfig,
) -> ConvertResult<ConvertOutcome> {
    match load_grib(dirs, filename, filter)? {
        Loaded::Skipped(reason) => Ok(ConvertOutcome::Skipped(reason)),
        Loaded::Dataset(ds) => {
            let full_name = store_name_with_filter(store_name, filter);
            let started = Instant::now();
            let report = zarr_store::persist(&dirs.zarr, &full_name, &ds, config)?;
            info!(
                store = %report.path.display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "converted dataset to store"
            );
            Ok(ConvertOutcome::Stored(report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_store_name_without_filter() {
        let filter = KeyFilter::new();
        assert_eq!(store_name_with_filter("GFSPRS.GrbF24", &filter), "GFSPRS.GrbF24");
    }

    #[test]
    fn test_store_name_with_filter_suffix() {
        let filter = KeyFilter::from_pairs(
            &strings(&["typeOfLevel"]),
            &strings(&["highCloudTop"]),
        )
        .unwrap();
        assert_eq!(
            store_name_with_filter("GFSPRS.GrbF24", &filter),
            "GFSPRS.GrbF24_typeOfLevelhighCloudTop"
        );
    }
}
