//! Cloud object fetching for gridzarr.
//!
//! Downloads one object per invocation from S3-compatible storage into the
//! local raw-data directory. The NOAA open-data buckets this tool targets
//! are public, so requests go unsigned by default; credentials from the
//! environment are honored when signing is enabled.

use std::path::Path;
use std::time::Instant;

use object_store::aws::AmazonS3Builder;
use object_store::{ObjectStore, path::Path as ObjectPath};
use thiserror::Error;
use tracing::{debug, info};

/// Result type alias using FetchError.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised while downloading objects.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The object key does not exist in the bucket. Recoverable by
    /// correcting the key.
    #[error("object '{key}' does not exist in bucket '{bucket}'")]
    MissingObject { bucket: String, key: String },

    /// The S3 client could not be constructed.
    #[error("failed to configure client for bucket '{bucket}': {message}")]
    Config { bucket: String, message: String },

    /// Transport or service failure.
    #[error("failed to fetch '{key}' from bucket '{bucket}': {message}")]
    Transfer {
        bucket: String,
        key: String,
        message: String,
    },

    /// Local write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connection settings for the object store.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// AWS region the bucket lives in.
    pub region: String,
    /// Custom endpoint (MinIO and friends); the real AWS endpoint if unset.
    pub endpoint: Option<String>,
    /// Skip request signing (anonymous access to public buckets).
    pub skip_signature: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            skip_signature: true,
        }
    }
}

/// Client that downloads single objects to local files.
pub struct ObjectFetcher {
    config: FetchConfig,
}

impl ObjectFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Download `key` from `bucket` and persist it at `dest`.
    ///
    /// The destination is written only after the full object body has
    /// arrived; a failed transfer leaves no partial file behind.
    pub async fn download(&self, bucket: &str, key: &str, dest: &Path) -> FetchResult<u64> {
        let store = self.build_store(bucket)?;
        let location = ObjectPath::from(key);

        let started = Instant::now();
        let result = store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => FetchError::MissingObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            other => FetchError::Transfer {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: other.to_string(),
            },
        })?;

        let data = result.bytes().await.map_err(|e| FetchError::Transfer {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let size = data.len() as u64;
        debug!(bucket = %bucket, key = %key, size, "object body received");

        tokio::fs::write(dest, &data).await?;

        info!(
            bucket = %bucket,
            key = %key,
            dest = %dest.display(),
            size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "downloaded object"
        );
        Ok(size)
    }

    fn build_store(&self, bucket: &str) -> FetchResult<impl ObjectStore> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&self.config.region);

        if let Some(endpoint) = &self.config.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }
        if self.config.skip_signature {
            builder = builder.with_skip_signature(true);
        }

        builder.build().map_err(|e| FetchError::Config {
            bucket: bucket.to_string(),
            message: e.to_string(),
        })
    }
}
