//! # Engine Configuration
//!
//! Runtime settings for the meshing engine, loaded from JSON. Every field has a
//! default so a config file only needs to name what it changes.
//!
//! ```json
//! {
//!     "world_height_in_chunks": 8,
//!     "worker_count": 4,
//!     "atlas_capacity": 256,
//!     "texture_failure_policy": "fallback"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a mesh build does when a texture cannot be translated to an atlas slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFailurePolicy {
    /// Use the reserved fallback slot and keep building.
    #[default]
    Fallback,
    /// Abandon the pass and retry the whole chunk later.
    Defer,
}

/// Top-level engine settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vertical size of the world in chunks. Chunk layers outside `0..height` count as
    /// present for the neighbor guard.
    pub world_height_in_chunks: i32,
    /// Number of worker threads used for mesh builds.
    pub worker_count: usize,
    /// Number of slots in the virtual texture atlas, including the fallback slot.
    pub atlas_capacity: usize,
    /// Behavior on texture translation failure.
    pub texture_failure_policy: TextureFailurePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            world_height_in_chunks: 8,
            worker_count: 4,
            atlas_capacity: 256,
            texture_failure_policy: TextureFailurePolicy::Fallback,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.world_height_in_chunks <= 0 {
            return Err(ConfigError::Invalid(format!(
                "world_height_in_chunks must be positive, got {}",
                self.world_height_in_chunks
            )));
        }
        // Slot 0 is the fallback texture, so one slot alone holds nothing useful.
        if self.atlas_capacity < 2 {
            return Err(ConfigError::Invalid(format!(
                "atlas_capacity must be at least 2, got {}",
                self.atlas_capacity
            )));
        }
        Ok(())
    }
}
