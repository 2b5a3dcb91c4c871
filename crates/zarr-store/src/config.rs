//! Store configuration.

/// Tuning for store writing.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum chunk edge length per axis. Axes shorter than this get a
    /// single chunk.
    pub chunk_edge: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { chunk_edge: 256 }
    }
}

impl StoreConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let chunk_edge = std::env::var("GRIDZARR_CHUNK_EDGE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(256);
        Self { chunk_edge }
    }

    /// Chunk shape for an array shape: `min(len, chunk_edge)` per axis.
    pub fn chunk_shape(&self, shape: &[usize]) -> Vec<u64> {
        let edge = self.chunk_edge.max(1);
        shape
            .iter()
            .map(|&len| len.max(1).min(edge) as u64)
            .collect()
    }
}
