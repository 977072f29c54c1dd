//! Engine configuration.

use crate::error::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Evaluation settings.
///
/// ```json
/// { "parallel": true, "endpoint_timeout_secs": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate patterns and federation members on the rayon pool.
    pub parallel: bool,
    /// Default timeout for endpoints created from the command line.
    pub endpoint_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { parallel: false, endpoint_timeout_secs: 30 }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| QuarryError::ConfigError(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            QuarryError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
