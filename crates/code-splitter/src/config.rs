use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted by [`SplitterConfig::from_env`]
pub const MAX_CHUNK_SIZE_ENV: &str = "MAX_CHUNK_SIZE";

/// Default soft limit, in characters, for a single chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 20_000;

/// Configuration for splitting behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Preferred maximum chunk size in characters (soft limit)
    pub max_chunk_size: usize,

    /// Directory acting as the object store for `sourceKey` requests
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::compact()
    }
}

impl SplitterConfig {
    /// Smaller chunks, keeps each downstream pass short
    pub fn compact() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            store_dir: None,
        }
    }

    /// Larger chunks for deployments whose analysis pass accepts more text
    pub fn extended() -> Self {
        Self {
            max_chunk_size: 30_000,
            ..Self::compact()
        }
    }

    /// Build config from the process environment.
    ///
    /// Only meant for the invocation boundary; the result is passed into
    /// [`crate::CodeSplitter::new`] explicitly. Unparseable values are
    /// reported rather than silently replaced.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_CHUNK_SIZE_ENV) {
            config.max_chunk_size = raw.trim().parse().map_err(|_| {
                format!("{MAX_CHUNK_SIZE_ENV} must be a positive integer, got '{raw}'")
            })?;
        }
        Ok(config)
    }

    /// Builder: set the chunk size limit
    #[must_use]
    pub const fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    /// Builder: set the object store directory
    #[must_use]
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be > 0".to_string());
        }

        Ok(())
    }
}
