//! Error types for the chunk mesh engine.
//!
//! Deferrals (chunk not yet available, neighbors not loaded) are not errors and never
//! show up here; they are reported through the task's "not done" outcome instead.

use thiserror::Error;

/// Errors raised while building a chunk mesh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshingError {
    /// The virtual texture atlas could not provide a slot for a texture.
    #[error("texture '{texture}' could not be resolved to an atlas slot")]
    TextureResolution {
        /// Resource path of the texture that failed to translate
        texture: String,
    },
}

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while building the voxel registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry definition is not valid JSON or has the wrong shape.
    #[error("failed to parse voxel definitions: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two definitions claim the same id.
    #[error("duplicate voxel id {0}")]
    DuplicateId(u16),

    /// Id 0 is reserved for air.
    #[error("voxel id 0 is reserved for air (got '{0}')")]
    ReservedId(String),
}
