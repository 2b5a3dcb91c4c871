//! Store → NetCDF export.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use tracing::info;

use crate::dirs::DataDirs;
use crate::error::{ConvertError, ConvertResult};

/// How a store's pieces are combined into one dataset before export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineStrategy {
    /// Validate that every array's axes agree with the store's recorded
    /// dimensions before combining.
    ByCoords,
    /// Take arrays in recorded order without cross-validation.
    Nested,
}

impl FromStr for CombineStrategy {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_coords" | "by-coords" => Ok(CombineStrategy::ByCoords),
            "nested" => Ok(CombineStrategy::Nested),
            other => Err(ConvertError::InvalidCombineStrategy(other.to_string())),
        }
    }
}

/// Convert a store back to a NetCDF file `{nc_dir}/{store_name}.nc`.
///
/// Failures propagate to the caller; nothing is swallowed.
pub fn zarr_to_netcdf(
    dirs: &DataDirs,
    store_name: &str,
    combine: CombineStrategy,
) -> ConvertResult<PathBuf> {
    let store_path = dirs.store_path(store_name);
    let started = Instant::now();

    let ds = zarr_store::open_dataset(&store_path)?;
    if combine == CombineStrategy::ByCoords {
        ds.validate()?;
    }

    let out_path = dirs.nc_file(store_name);
    netcdf_source::write_dataset(&out_path, &ds)?;

    info!(
        store = %store_path.display(),
        out = %out_path.display(),
        combine = ?combine,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "converted store to NetCDF"
    );
    Ok(out_path)
}

/// Open one variable of a store as a lazily-evaluated array.
pub fn load_lazy(
    dirs: &DataDirs,
    store_name: &str,
    variable: &str,
) -> ConvertResult<zarr_store::LazyArray> {
    Ok(zarr_store::LazyArray::open(
        &dirs.store_path(store_name),
        variable,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_strategy_parsing() {
        assert_eq!(
            "by_coords".parse::<CombineStrategy>().unwrap(),
            CombineStrategy::ByCoords
        );
        assert_eq!(
            "nested".parse::<CombineStrategy>().unwrap(),
            CombineStrategy::Nested
        );
        assert!(matches!(
            "diagonal".parse::<CombineStrategy>(),
            Err(ConvertError::InvalidCombineStrategy(_))
        ));
    }
}
