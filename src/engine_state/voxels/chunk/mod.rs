//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 32x32x32 block of packed voxel words
//! together with its loading state and the render-state holder its mesh is published to.
//!
//! ## Storage
//!
//! The voxel array is stored flat, indexed `x * 32 * 32 + y * 32 + z`, and shared
//! behind an `Arc`. Mesh builds clone the `Arc` and read that snapshot for the whole
//! build; edits go through [`Chunk::poke_raw`], which copies the array first if a
//! build still holds the old one. A chunk with no array at all is homogeneous air.

use std::sync::Arc;

use cgmath::Point3;

use crate::{
    core::MtResource,
    engine_state::{rendering::ChunkMeshProperty, voxels::voxel_format::VoxelWord},
};

/// The dimension (width, height, depth) of a chunk in voxels.
pub const CHUNK_DIMENSION: i32 = 32;
/// The number of voxels in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of voxels in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Loading state of a chunk as seen by its holder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkHolderState {
    /// Voxel data is still being generated or received.
    Loading,
    /// Voxel data is final and the chunk may be meshed.
    Available,
}

/// A 32x32x32 volume of voxels.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    pub position: Point3<i32>,
    state: ChunkHolderState,
    voxel_data: Option<Arc<Vec<VoxelWord>>>,
    air_chunk: bool,
    /// Render state holder the mesh task publishes into
    pub mesh: MtResource<ChunkMeshProperty>,
}

/// Flat index of a local position.
///
/// Coordinates must be within `0..CHUNK_DIMENSION`.
#[inline]
pub fn index(x: i32, y: i32, z: i32) -> usize {
    (x * CHUNK_PLANE_SIZE + y * CHUNK_DIMENSION + z) as usize
}

/// Whether a local coordinate triple lies inside a chunk.
#[inline]
pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    (0..CHUNK_DIMENSION).contains(&x)
        && (0..CHUNK_DIMENSION).contains(&y)
        && (0..CHUNK_DIMENSION).contains(&z)
}

impl Chunk {
    /// Creates an air chunk with no voxel array, still loading.
    pub fn empty(position: Point3<i32>) -> Self {
        Chunk {
            position,
            state: ChunkHolderState::Loading,
            voxel_data: None,
            air_chunk: true,
            mesh: MtResource::new(ChunkMeshProperty::new()),
        }
    }

    /// Creates a chunk from a full voxel array, still loading.
    ///
    /// Returns `None` if `data` does not hold exactly `CHUNK_SIZE` words.
    pub fn with_data(position: Point3<i32>, data: Vec<VoxelWord>) -> Option<Self> {
        if data.len() != CHUNK_SIZE as usize {
            return None;
        }
        let mut chunk = Chunk::empty(position);
        chunk.air_chunk = Self::is_all_air(&data);
        chunk.voxel_data = Some(Arc::new(data));
        Some(chunk)
    }

    /// Creates a chunk by evaluating `f` at every local position.
    pub fn from_fn(position: Point3<i32>, mut f: impl FnMut(i32, i32, i32) -> VoxelWord) -> Self {
        let mut data = Vec::with_capacity(CHUNK_SIZE as usize);
        for x in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for z in 0..CHUNK_DIMENSION {
                    data.push(f(x, y, z));
                }
            }
        }
        let mut chunk = Chunk::empty(position);
        chunk.air_chunk = Self::is_all_air(&data);
        chunk.voxel_data = Some(Arc::new(data));
        chunk
    }

    /// Creates a chunk where every voxel holds `word`.
    pub fn filled(position: Point3<i32>, word: VoxelWord) -> Self {
        Self::from_fn(position, |_, _, _| word)
    }

    fn is_all_air(data: &[VoxelWord]) -> bool {
        data.iter()
            .all(|word| super::voxel_format::id(*word) == 0)
    }

    /// Current holder state.
    pub fn state(&self) -> ChunkHolderState {
        self.state
    }

    /// Marks the chunk as loading or available.
    pub fn set_state(&mut self, state: ChunkHolderState) {
        self.state = state;
    }

    /// Whether every voxel in the chunk is air.
    pub fn is_air_chunk(&self) -> bool {
        self.air_chunk
    }

    /// A shared snapshot of the voxel array, if the chunk has one.
    pub fn voxel_data(&self) -> Option<Arc<Vec<VoxelWord>>> {
        self.voxel_data.clone()
    }

    /// Reads the word at a local position. Out-of-bounds positions and chunks without
    /// an array read as air.
    pub fn peek_raw(&self, x: i32, y: i32, z: i32) -> VoxelWord {
        if !in_bounds(x, y, z) {
            return 0;
        }
        self.voxel_data
            .as_ref()
            .map(|data| data[index(x, y, z)])
            .unwrap_or(0)
    }

    /// Writes the word at a local position and flags the mesh for a rebuild.
    ///
    /// The array is copied first if a mesh build still holds the current one.
    /// Returns `false` if the position is outside the chunk.
    pub fn poke_raw(&mut self, x: i32, y: i32, z: i32, word: VoxelWord) -> bool {
        if !in_bounds(x, y, z) {
            return false;
        }
        let data = self
            .voxel_data
            .get_or_insert_with(|| Arc::new(vec![0; CHUNK_SIZE as usize]));
        Arc::make_mut(data)[index(x, y, z)] = word;

        if super::voxel_format::id(word) != 0 {
            self.air_chunk = false;
        } else if !self.air_chunk {
            self.air_chunk = Self::is_all_air(data);
        }

        self.mesh.get_mut().request_update();
        true
    }
}
