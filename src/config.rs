//! Engine configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```
//! use caro::config::EngineConfig;
//!
//! let json = r#"{ "seed": 7, "depth": { "base_depth": 1 } }"#;
//! let config: EngineConfig = serde_json::from_str(json).unwrap();
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.depth.base_depth, 1);
//! assert_eq!(config.depth.endgame_depth, 3);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eval::PatternWeights;
use crate::search::{DepthPolicy, TableLifetime};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Tunables for search and move selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub depth: DepthPolicy,
    pub weights: PatternWeights,
    /// Transposition table size in megabytes
    pub tt_size_mb: usize,
    pub tt_lifetime: TableLifetime,
    /// Disable to compare results without the table
    pub use_tt: bool,
    /// Chebyshev radius around the center for the opening move
    pub first_move_radius: u8,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DepthPolicy::default(),
            weights: PatternWeights::default(),
            tt_size_mb: 16,
            tt_lifetime: TableLifetime::PerRequest,
            use_tt: true,
            first_move_radius: 1,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig = serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        if !config.weights.is_ordered() {
            log::warn!("pattern weights in {} break the usual pattern ordering", path.display());
        }
        Ok(config)
    }
}
