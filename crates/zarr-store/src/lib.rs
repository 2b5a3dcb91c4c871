//! Chunked Zarr storage for gridzarr.
//!
//! Persists [`dataset::LabeledDataset`] values as Zarr V3 stores on the
//! filesystem (one float64 array per variable, group-level bookkeeping for
//! the hierarchy), reads them back, and exposes single variables through a
//! chunk-granular [`LazyArray`] handle.

pub mod config;
pub mod error;
pub mod lazy;
pub mod reader;
pub mod writer;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use lazy::LazyArray;
pub use reader::open_dataset;
pub use writer::{persist, StoreReport};
