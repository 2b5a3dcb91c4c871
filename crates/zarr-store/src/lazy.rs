//! Lazily-evaluated array handles over persisted stores.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use lru::LruCache;
use tracing::debug;
use zarrs::array::Array;
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use crate::error::{StoreError, StoreResult};
use crate::reader::open_store;
use crate::writer::{num_chunks, ATTR_ARRAY_DIMENSIONS};

/// Decompressed chunks kept per handle.
const CHUNK_CACHE_CAPACITY: usize = 64;

/// A handle onto one stored variable that reads chunk-by-chunk on demand.
///
/// Opening the handle touches only array metadata; values are fetched when
/// a chunk or subset is requested, and decompressed chunks are cached so
/// repeated access does not re-touch storage.
pub struct LazyArray {
    array: Array<FilesystemStore>,
    variable: String,
    dims: Vec<String>,
    chunk_shape: Vec<u64>,
    cache: LruCache<Vec<u64>, Vec<f64>>,
}

impl LazyArray {
    /// Open `variable` from the store at `store_path`.
    pub fn open(store_path: &Path, variable: &str) -> StoreResult<Self> {
        let store = open_store(store_path)?;
        let array = Array::open(store, &format!("/{}", variable)).map_err(|_| {
            StoreError::MissingVariable {
                variable: variable.to_string(),
                path: store_path.display().to_string(),
            }
        })?;

        let dims = array
            .attributes()
            .get(ATTR_ARRAY_DIMENSIONS)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let chunk_shape = chunk_shape_of(&array)?;
        debug!(
            store = %store_path.display(),
            variable = %variable,
            shape = ?array.shape(),
            chunk_shape = ?chunk_shape,
            "opened lazy array"
        );

        Ok(Self {
            array,
            variable: variable.to_string(),
            dims,
            chunk_shape,
            cache: LruCache::new(
                NonZeroUsize::new(CHUNK_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Array shape, one entry per axis.
    pub fn shape(&self) -> &[u64] {
        self.array.shape()
    }

    /// Dimension names recorded at persist time.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Shape of a full (non-edge) chunk.
    pub fn chunk_shape(&self) -> &[u64] {
        &self.chunk_shape
    }

    /// Number of chunks along each axis.
    pub fn chunk_grid_shape(&self) -> Vec<u64> {
        self.array
            .shape()
            .iter()
            .zip(&self.chunk_shape)
            .map(|(&len, &chunk)| len.div_ceil(chunk.max(1)).max(1))
            .collect()
    }

    /// Total number of chunks.
    pub fn num_chunks(&self) -> u64 {
        num_chunks(self.array.shape(), &self.chunk_shape)
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> u64 {
        self.array.shape().iter().product()
    }

    /// Read one chunk by grid index, from cache when available.
    ///
    /// Edge chunks come back padded to the full chunk shape with the fill
    /// value, as stored.
    pub fn read_chunk(&mut self, indices: &[u64]) -> StoreResult<Vec<f64>> {
        if let Some(cached) = self.cache.get(indices) {
            return Ok(cached.clone());
        }
        let data: Vec<f64> =
            self.array
                .retrieve_chunk_elements(indices)
                .map_err(|e| StoreError::Read {
                    name: self.variable.clone(),
                    message: e.to_string(),
                })?;
        self.cache.put(indices.to_vec(), data.clone());
        Ok(data)
    }

    /// Read an arbitrary rectangular subset, bypassing the chunk cache.
    pub fn read_subset(&self, start: &[u64], shape: &[u64]) -> StoreResult<Vec<f64>> {
        let subset = ArraySubset::new_with_start_shape(start.to_vec(), shape.to_vec())
            .map_err(|e| StoreError::Read {
                name: self.variable.clone(),
                message: e.to_string(),
            })?;
        self.array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| StoreError::Read {
                name: self.variable.clone(),
                message: e.to_string(),
            })
    }
}

/// Extract the regular chunk shape from an array's chunk grid.
fn chunk_shape_of(array: &Array<FilesystemStore>) -> StoreResult<Vec<u64>> {
    let origin = vec![0u64; array.shape().len()];
    let chunk_shape = array
        .chunk_grid()
        .chunk_shape(&origin, array.shape())
        .map_err(|e| StoreError::Read {
            name: "chunk grid".to_string(),
            message: e.to_string(),
        })?
        .ok_or_else(|| StoreError::Read {
            name: "chunk grid".to_string(),
            message: "chunk shape unavailable at origin".to_string(),
        })?;
    Ok((0..array.shape().len())
        .map(|i| chunk_shape[i].get())
        .collect())
}
