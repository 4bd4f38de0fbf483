//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: builds a chunk's mesh once it and its neighbors are loaded

pub mod chunk_mesh_generation_task;

pub use chunk_mesh_generation_task::{ChunkMeshGenerationTask, MeshTaskState};
