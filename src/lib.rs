#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Chunk Mesh Engine
//!
//! Background mesh generation for chunked voxel worlds.
//!
//! Chunks of 32³ packed voxel words are turned into textured, lit quads on a pool of
//! worker threads. A chunk is meshed once it is available and all 26 of its neighbors
//! are loaded; edits flag the chunk (and the neighbors whose border they touch) for
//! a rebuild.
//!
//! ## Key Modules
//!
//! * `config` - Engine settings loaded from JSON
//! * `core` - Shared-state primitives used throughout the engine
//! * `engine_state` - The world, meshing, virtual texturing and task management
//! * `error` - Error types
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use chunk_mesh_engine::{config::EngineConfig, engine_state::EngineState};
//! use chunk_mesh_engine::engine_state::voxels::{chunk::Chunk, voxel::VoxelRegistry, voxel_format};
//!
//! chunk_mesh_engine::init_logging();
//!
//! let registry = VoxelRegistry::from_json_str(r#"[{ "id": 1, "name": "stone", "solid": true }]"#).unwrap();
//! let mut engine = EngineState::new(EngineConfig::default(), registry);
//! let chunk = engine.add_chunk(Chunk::filled(Point3::new(0, 0, 0), voxel_format::format(1, 0, 0, 0)));
//! engine.mark_available(Point3::new(0, 0, 0));
//!
//! engine.run_until_settled(100);
//! let vertices = chunk.get().mesh.get().vertex_count();
//! ```

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Initializes the `env_logger` backend, filtered by `RUST_LOG` and writing to stdout.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let installed = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();

    if installed.is_ok() {
        log::info!("Logger initialized");
    }
}
