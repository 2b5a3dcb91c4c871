//! Data directory layout.

use std::path::{Path, PathBuf};

/// The three sibling directories the pipeline works across: raw source
/// files, chunked stores, and reconstituted NetCDF output.
#[derive(Debug, Clone)]
pub struct DataDirs {
    pub raw: PathBuf,
    pub zarr: PathBuf,
    pub nc: PathBuf,
}

impl DataDirs {
    pub fn new(raw: impl Into<PathBuf>, zarr: impl Into<PathBuf>, nc: impl Into<PathBuf>) -> Self {
        Self {
            raw: raw.into(),
            zarr: zarr.into(),
            nc: nc.into(),
        }
    }

    /// Create all three directories if absent. Idempotent; called once by
    /// the composition root, never from individual operations.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.raw)?;
        std::fs::create_dir_all(&self.zarr)?;
        std::fs::create_dir_all(&self.nc)?;
        Ok(())
    }

    /// Path of a raw source file.
    pub fn raw_file(&self, filename: &str) -> PathBuf {
        self.raw.join(filename)
    }

    /// Path of a store directory for a full store name.
    pub fn store_path(&self, store_name: &str) -> PathBuf {
        self.zarr.join(format!("{}.zarr", store_name))
    }

    /// Path of a reconstituted NetCDF file.
    pub fn nc_file(&self, store_name: &str) -> PathBuf {
        self.nc.join(format!("{}.nc", store_name))
    }
}

impl Default for DataDirs {
    fn default() -> Self {
        Self::new("raw_data", "zarr_data", "nc_data")
    }
}

pub(crate) fn require_file(path: &Path) -> Result<(), crate::error::ConvertError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(crate::error::ConvertError::MissingSource {
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = DataDirs::new(
            tmp.path().join("raw"),
            tmp.path().join("zarr"),
            tmp.path().join("nc"),
        );
        dirs.ensure().unwrap();
        dirs.ensure().unwrap();
        assert!(dirs.raw.is_dir() && dirs.zarr.is_dir() && dirs.nc.is_dir());
    }

    #[test]
    fn test_paths() {
        let dirs = DataDirs::default();
        assert_eq!(dirs.store_path("gfs"), PathBuf::from("zarr_data/gfs.zarr"));
        assert_eq!(dirs.nc_file("gfs"), PathBuf::from("nc_data/gfs.nc"));
    }
}
