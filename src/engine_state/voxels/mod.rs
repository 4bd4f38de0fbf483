//! # Voxel Data
//!
//! The data side of the engine: packed voxel words, voxel definitions, chunks and
//! the world that holds them.
//!
//! ## Architecture
//!
//! * **Voxel format**: Packing of id, metadata and light into one 32-bit word
//! * **Voxel**: Immutable definitions looked up through the `VoxelRegistry`
//! * **Chunk**: 32³ arrays of packed words, shared copy-on-write with mesh builds
//! * **World**: The loaded chunks plus cross-chunk sampling
//!
//! ## Thread Safety
//!
//! * Chunks live in `MtResource`s and are only read by mesh builds
//! * Voxel arrays are `Arc`-shared; writes copy them when a build still holds one

pub mod chunk;
pub mod voxel;
pub mod voxel_format;
pub mod world;
