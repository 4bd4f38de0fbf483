//! Rendering side of the engine: turning voxel data into GPU-ready chunk meshes.
//!
//! Nothing here talks to a GPU device. Meshes are produced as interleaved vertex
//! bytes plus a `wgpu` vertex layout, and handed to each chunk's
//! [`ChunkMeshProperty`] for whichever renderer uploads them.
//!
//! * `meshing` - culling and vertex emission for one chunk
//! * `tasks` - the background mesh task and its state machine
//! * `virtual_texturing` - texture name to atlas slot translation
//! * `unit_cube` / `vertex` - face geometry and the vertex format

pub mod chunk_mesh_property;
pub mod meshing;
pub mod tasks;
pub mod unit_cube;
pub mod vertex;
pub mod virtual_texturing;

// Re-export commonly used types
pub use chunk_mesh_property::{ChunkMesh, ChunkMeshProperty};
pub use vertex::ChunkVertex;
