//! Reading a persisted store back into a labeled dataset.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use zarrs::array::Array;
use zarrs::array_subset::ArraySubset;
use zarrs::group::Group;
use zarrs_filesystem::FilesystemStore;

use dataset::{AttrValue, LabeledDataset, Variable};

use crate::error::{StoreError, StoreResult};
use crate::writer::{
    ATTR_ARRAY_DIMENSIONS, ATTR_COORDINATES, ATTR_DATA_VARIABLES, ATTR_DIMENSIONS,
    ATTR_SOURCE_ATTRIBUTES,
};

/// Open a store and materialize the whole dataset eagerly.
///
/// This is the export path (store → NetCDF); partial reads go through
/// [`crate::LazyArray`] instead.
pub fn open_dataset(store_path: &Path) -> StoreResult<LabeledDataset> {
    let store = open_store(store_path)?;
    let group = Group::open(store.clone(), "/").map_err(|e| StoreError::Open {
        path: store_path.display().to_string(),
        message: e.to_string(),
    })?;
    let group_attrs = group.attributes();

    let mut ds = LabeledDataset::new();

    let dims = bookkeeping_object(group_attrs, store_path, ATTR_DIMENSIONS)?;
    for (name, len) in dims {
        let len = len.as_u64().ok_or_else(|| StoreError::Read {
            name: name.clone(),
            message: format!("dimension length is not an integer: {}", len),
        })?;
        ds.add_dim(&name, len as usize)?;
    }

    let source_attrs = bookkeeping_object(group_attrs, store_path, ATTR_SOURCE_ATTRIBUTES)?;
    for (name, value) in source_attrs {
        let attr = AttrValue::from_json(&value).map_err(|e| StoreError::Read {
            name: name.clone(),
            message: e.to_string(),
        })?;
        ds.set_attr(&name, attr);
    }

    for name in bookkeeping_names(group_attrs, store_path, ATTR_COORDINATES)? {
        let var = read_array(&store, store_path, &name)?;
        ds.insert_coord(&name, var)?;
    }
    for name in bookkeeping_names(group_attrs, store_path, ATTR_DATA_VARIABLES)? {
        let var = read_array(&store, store_path, &name)?;
        ds.insert_data_var(&name, var)?;
    }

    info!(
        store = %store_path.display(),
        vars = ds.num_vars(),
        "opened store as dataset"
    );
    Ok(ds)
}

pub(crate) fn open_store(store_path: &Path) -> StoreResult<Arc<FilesystemStore>> {
    if !store_path.is_dir() {
        return Err(StoreError::Open {
            path: store_path.display().to_string(),
            message: "store directory does not exist".to_string(),
        });
    }
    Ok(Arc::new(FilesystemStore::new(store_path).map_err(|e| {
        StoreError::Open {
            path: store_path.display().to_string(),
            message: e.to_string(),
        }
    })?))
}

/// Read one array fully: values, dimension names and attributes.
fn read_array(
    store: &Arc<FilesystemStore>,
    store_path: &Path,
    name: &str,
) -> StoreResult<Variable> {
    let array =
        Array::open(store.clone(), &format!("/{}", name)).map_err(|e| StoreError::Read {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    let shape: Vec<usize> = array.shape().iter().map(|&s| s as usize).collect();

    let mut dims: Vec<String> = Vec::new();
    let mut attrs: BTreeMap<String, AttrValue> = BTreeMap::new();
    for (attr_name, value) in array.attributes() {
        if attr_name.as_str() == ATTR_ARRAY_DIMENSIONS {
            dims = value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            continue;
        }
        let attr = AttrValue::from_json(value).map_err(|e| StoreError::Read {
            name: format!("{}:{}", name, attr_name),
            message: e.to_string(),
        })?;
        attrs.insert(attr_name.clone(), attr);
    }
    if dims.len() != shape.len() {
        return Err(StoreError::MissingBookkeeping {
            path: store_path.display().to_string(),
            key: format!("{}/{}", name, ATTR_ARRAY_DIMENSIONS),
        });
    }

    let subset = ArraySubset::new_with_shape(array.shape().to_vec());
    let data: Vec<f64> =
        array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| StoreError::Read {
                name: name.to_string(),
                message: e.to_string(),
            })?;

    debug!(array = %name, shape = ?shape, "read array");
    Ok(Variable::new(dims, shape, data, attrs)?)
}

fn bookkeeping_object(
    attrs: &serde_json::Map<String, serde_json::Value>,
    store_path: &Path,
    key: &str,
) -> StoreResult<serde_json::Map<String, serde_json::Value>> {
    attrs
        .get(key)
        .and_then(|v| v.as_object())
        .cloned()
        .ok_or_else(|| StoreError::MissingBookkeeping {
            path: store_path.display().to_string(),
            key: key.to_string(),
        })
}

fn bookkeeping_names(
    attrs: &serde_json::Map<String, serde_json::Value>,
    store_path: &Path,
    key: &str,
) -> StoreResult<Vec<String>> {
    attrs
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .ok_or_else(|| StoreError::MissingBookkeeping {
            path: store_path.display().to_string(),
            key: key.to_string(),
        })
}
