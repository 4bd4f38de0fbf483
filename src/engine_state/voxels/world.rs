//! # World Module
//!
//! This module provides the `World` struct which manages the loaded chunks of the voxel
//! world and answers voxel queries that cross chunk borders.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach: only loaded chunks are present in the map.
//! The world is bounded vertically (`0..height_in_chunks`) and unbounded horizontally.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map
//! - `peek_raw` takes a read lock on the owning chunk; mesh builds avoid it in their
//!   inner loop by snapshotting the neighborhood once (see `ChunkNeighborhood`)

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;

use crate::core::MtResource;
use crate::engine_state::voxels::{
    chunk::{Chunk, ChunkHolderState, CHUNK_DIMENSION},
    voxel::VoxelRegistry,
    voxel_format::{VoxelWord, UNLOADED},
};

/// Anything that can answer "which word sits at this world position".
pub trait VoxelSampler {
    /// Returns the packed word at a world position, or [`UNLOADED`] if that position's
    /// chunk is not loaded.
    fn peek_raw(&self, x: i32, y: i32, z: i32) -> VoxelWord;
}

/// Splits a world coordinate into (chunk coordinate, local coordinate).
#[inline]
pub fn split_coordinate(world: i32) -> (i32, i32) {
    (
        world.div_euclid(CHUNK_DIMENSION),
        world.rem_euclid(CHUNK_DIMENSION),
    )
}

/// Represents a voxel world composed of multiple chunks.
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point3<i32>, MtResource<Chunk>>,
    /// Vertical size of the world in chunks.
    height_in_chunks: i32,
    /// Voxel definitions shared with every mesh build.
    registry: Arc<VoxelRegistry>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new(height_in_chunks: i32, registry: Arc<VoxelRegistry>) -> Self {
        World {
            chunks: HashMap::new(),
            height_in_chunks,
            registry,
        }
    }

    /// Vertical size of the world in chunks.
    pub fn height_in_chunks(&self) -> i32 {
        self.height_in_chunks
    }

    /// Whether a chunk layer lies outside the world's vertical bounds.
    pub fn is_out_of_vertical_bounds(&self, cy: i32) -> bool {
        cy < 0 || cy >= self.height_in_chunks
    }

    /// Voxel definitions of this world.
    pub fn registry(&self) -> &Arc<VoxelRegistry> {
        &self.registry
    }

    /// Inserts a chunk, replacing any chunk already at its position.
    ///
    /// Loaded neighbors that have a mesh, or a build in flight, are flagged for a
    /// rebuild since their border faces were culled against the old contents.
    ///
    /// # Arguments
    ///
    /// * `chunk` - The chunk to insert
    ///
    /// # Returns
    ///
    /// The handle of the inserted chunk.
    pub fn add_chunk(&mut self, chunk: Chunk) -> MtResource<Chunk> {
        let position = chunk.position;
        let chunk = MtResource::new(chunk);
        if self.chunks.insert(position, chunk.clone()).is_some() {
            log::debug!("Replaced chunk at {:?}", position);
        }
        self.invalidate_neighbors(position);
        chunk
    }

    /// Requests a rebuild of every loaded neighbor mesh around `position` that was
    /// built or is being built.
    fn invalidate_neighbors(&self, position: Point3<i32>) {
        let mut invalidated = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    let neighbor = Point3::new(position.x + dx, position.y + dy, position.z + dz);
                    let Some(neighbor) = self.chunks.get(&neighbor) else {
                        continue;
                    };
                    let mesh = neighbor.get().mesh.clone();
                    let mut property = mesh.get_mut();
                    if property.mesh().is_some() || property.is_build_in_flight() {
                        property.request_update();
                        invalidated += 1;
                    }
                }
            }
        }
        if invalidated > 0 {
            log::trace!("Chunk {:?} loaded, {} neighbor meshes stale", position, invalidated);
        }
    }

    /// Removes the chunk at the given chunk coordinates.
    pub fn remove_chunk(&mut self, position: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.remove(&position)
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk(&self, cx: i32, cy: i32, cz: i32) -> Option<MtResource<Chunk>> {
        self.chunks.get(&Point3::new(cx, cy, cz)).cloned()
    }

    /// Iterates over all loaded chunks.
    pub fn chunks(&self) -> impl Iterator<Item = &MtResource<Chunk>> {
        self.chunks.values()
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Marks the chunk at the given position available for meshing.
    pub fn mark_available(&self, position: Point3<i32>) -> bool {
        match self.chunks.get(&position) {
            Some(chunk) => {
                chunk.get_mut().set_state(ChunkHolderState::Available);
                true
            }
            None => false,
        }
    }

    /// Writes a voxel at a world position.
    ///
    /// The owning chunk's mesh is flagged for a rebuild, and so is each face-adjacent
    /// chunk whose border the voxel touches. Returns `false` if the chunk is not loaded.
    pub fn poke_raw(&self, x: i32, y: i32, z: i32, word: VoxelWord) -> bool {
        let (cx, lx) = split_coordinate(x);
        let (cy, ly) = split_coordinate(y);
        let (cz, lz) = split_coordinate(z);

        let Some(chunk) = self.get_chunk(cx, cy, cz) else {
            return false;
        };
        chunk.get_mut().poke_raw(lx, ly, lz, word);

        let last = CHUNK_DIMENSION - 1;
        let borders = [
            (lx == 0, Point3::new(cx - 1, cy, cz)),
            (lx == last, Point3::new(cx + 1, cy, cz)),
            (ly == 0, Point3::new(cx, cy - 1, cz)),
            (ly == last, Point3::new(cx, cy + 1, cz)),
            (lz == 0, Point3::new(cx, cy, cz - 1)),
            (lz == last, Point3::new(cx, cy, cz + 1)),
        ];
        for (touches, neighbor) in borders {
            if !touches {
                continue;
            }
            if let Some(neighbor) = self.chunks.get(&neighbor) {
                let mesh = neighbor.get().mesh.clone();
                mesh.get_mut().request_update();
            }
        }
        true
    }
}

impl VoxelSampler for World {
    fn peek_raw(&self, x: i32, y: i32, z: i32) -> VoxelWord {
        let (cx, lx) = split_coordinate(x);
        let (cy, ly) = split_coordinate(y);
        let (cz, lz) = split_coordinate(z);

        match self.get_chunk(cx, cy, cz) {
            Some(chunk) => chunk.get().peek_raw(lx, ly, lz),
            None => UNLOADED,
        }
    }
}
