//! Writing labeled datasets as Zarr V3 stores.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use zarrs::array::{ArrayBuilder, DataType, DimensionName, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs::group::GroupBuilder;
use zarrs_filesystem::FilesystemStore;

use dataset::{LabeledDataset, Variable};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Group attribute holding the dimension name → length map.
pub(crate) const ATTR_DIMENSIONS: &str = "dimensions";
/// Group attribute listing coordinate variable names.
pub(crate) const ATTR_COORDINATES: &str = "coordinates";
/// Group attribute listing data variable names.
pub(crate) const ATTR_DATA_VARIABLES: &str = "data_variables";
/// Group attribute holding the dataset's own attributes.
pub(crate) const ATTR_SOURCE_ATTRIBUTES: &str = "source_attributes";
/// Group attribute with the store creation timestamp.
pub(crate) const ATTR_CREATED: &str = "created";
/// Per-array attribute listing the array's dimension names.
pub(crate) const ATTR_ARRAY_DIMENSIONS: &str = "_dimensions";

/// Outcome of a successful persist.
#[derive(Debug)]
pub struct StoreReport {
    /// Absolute or caller-relative store directory.
    pub path: PathBuf,
    /// Number of arrays written.
    pub arrays: usize,
    /// Total chunks across all arrays.
    pub chunks: u64,
    /// Bytes on disk after writing.
    pub bytes_on_disk: u64,
}

/// Persist a dataset as a new store `{zarr_root}/{name}.zarr`.
///
/// An already-populated destination is refused before anything is written;
/// existing stores are never deleted or truncated.
pub fn persist(
    zarr_root: &Path,
    name: &str,
    ds: &LabeledDataset,
    config: &StoreConfig,
) -> StoreResult<StoreReport> {
    let store_path = zarr_root.join(format!("{}.zarr", name));
    if store_path.exists() {
        return Err(StoreError::AlreadyExists {
            path: store_path.display().to_string(),
        });
    }

    std::fs::create_dir_all(&store_path)?;
    let store = Arc::new(FilesystemStore::new(&store_path).map_err(|e| StoreError::Create {
        path: store_path.display().to_string(),
        message: e.to_string(),
    })?);

    write_root_group(&store, &store_path, ds)?;

    let mut chunks = 0u64;
    for (var_name, var) in ds.coords().iter().chain(ds.data_vars().iter()) {
        chunks += write_array(&store, var_name, var, config)?;
    }

    let bytes_on_disk = directory_size(&store_path);
    info!(
        store = %store_path.display(),
        arrays = ds.num_vars(),
        chunks,
        bytes = bytes_on_disk,
        "persisted dataset to store"
    );

    Ok(StoreReport {
        path: store_path,
        arrays: ds.num_vars(),
        chunks,
        bytes_on_disk,
    })
}

/// Root group metadata: dataset attributes plus the bookkeeping the reader
/// relies on to enumerate the hierarchy.
fn write_root_group(
    store: &Arc<FilesystemStore>,
    store_path: &Path,
    ds: &LabeledDataset,
) -> StoreResult<()> {
    let mut group = GroupBuilder::new()
        .build(store.clone(), "/")
        .map_err(|e| StoreError::Create {
            path: store_path.display().to_string(),
            message: e.to_string(),
        })?;

    let attrs = group.attributes_mut();
    attrs.insert(
        ATTR_DIMENSIONS.to_string(),
        serde_json::Value::Object(
            ds.dims()
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(*v)))
                .collect(),
        ),
    );
    attrs.insert(
        ATTR_COORDINATES.to_string(),
        serde_json::Value::Array(
            ds.coords()
                .keys()
                .map(|k| serde_json::Value::String(k.clone()))
                .collect(),
        ),
    );
    attrs.insert(
        ATTR_DATA_VARIABLES.to_string(),
        serde_json::Value::Array(
            ds.data_vars()
                .keys()
                .map(|k| serde_json::Value::String(k.clone()))
                .collect(),
        ),
    );
    attrs.insert(
        ATTR_SOURCE_ATTRIBUTES.to_string(),
        serde_json::Value::Object(
            ds.attrs()
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        ),
    );
    attrs.insert(
        ATTR_CREATED.to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );

    group.store_metadata().map_err(|e| StoreError::Create {
        path: store_path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Write one variable as a float64 array under `/{name}`.
///
/// Returns the number of chunks the array occupies.
fn write_array(
    store: &Arc<FilesystemStore>,
    name: &str,
    var: &Variable,
    config: &StoreConfig,
) -> StoreResult<u64> {
    let shape: Vec<u64> = var.shape().iter().map(|&s| s as u64).collect();
    let chunk_shape = config.chunk_shape(var.shape());

    let mut attrs = serde_json::Map::new();
    for (attr_name, value) in var.attrs() {
        attrs.insert(attr_name.clone(), value.to_json());
    }
    attrs.insert(
        ATTR_ARRAY_DIMENSIONS.to_string(),
        serde_json::Value::Array(
            var.dims()
                .iter()
                .map(|d| serde_json::Value::String(d.clone()))
                .collect(),
        ),
    );

    let chunk_grid: zarrs::array::ChunkGrid =
        chunk_shape
            .clone()
            .try_into()
            .map_err(|e| StoreError::Write {
                name: name.to_string(),
                message: format!("{:?}", e),
            })?;

    let dimension_names: Vec<DimensionName> =
        var.dims().iter().map(|d| d.as_str().into()).collect();

    let mut builder = ArrayBuilder::new(
        shape.clone(),
        DataType::Float64,
        chunk_grid,
        FillValue::from(f64::NAN),
    );
    let array = builder
        .attributes(attrs)
        .dimension_names(Some(dimension_names))
        .build(store.clone(), &format!("/{}", name))
        .map_err(|e| StoreError::Write {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    array.store_metadata().map_err(|e| StoreError::Write {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    let subset = ArraySubset::new_with_shape(shape.clone());
    array
        .store_array_subset_elements(&subset, var.data())
        .map_err(|e| StoreError::Write {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    let chunks = num_chunks(&shape, &chunk_shape);
    debug!(array = %name, shape = ?shape, chunks, "wrote array");
    Ok(chunks)
}

pub(crate) fn num_chunks(shape: &[u64], chunk_shape: &[u64]) -> u64 {
    shape
        .iter()
        .zip(chunk_shape)
        .map(|(&len, &chunk)| len.div_ceil(chunk.max(1)).max(1))
        .product()
}

fn directory_size(path: &Path) -> u64 {
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|entry| entry.metadata().ok())
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_chunks() {
        assert_eq!(num_chunks(&[10, 10], &[4, 4]), 9);
        assert_eq!(num_chunks(&[4], &[4]), 1);
        assert_eq!(num_chunks(&[0], &[1]), 1);
    }
}
