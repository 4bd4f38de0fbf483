//! Voxel reads for a mesh build.
//!
//! [`VoxelAccessor`] routes local reads to the chunk's own array and everything else to
//! a [`VoxelSampler`]. During a build that sampler is a [`ChunkNeighborhood`]: the
//! voxel arrays of the chunk and its 26 neighbors, captured once when the build starts
//! so that the whole build reads one consistent state.

use std::sync::Arc;

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    chunk::{self, CHUNK_DIMENSION},
    voxel_format::{VoxelWord, UNLOADED},
    world::{split_coordinate, VoxelSampler, World},
};

/// Offsets of the 26 chunks around a chunk.
pub fn neighbor_offsets() -> impl Iterator<Item = Vector3<i32>> {
    (-1..=1)
        .flat_map(|x| (-1..=1).flat_map(move |y| (-1..=1).map(move |z| Vector3::new(x, y, z))))
        .filter(|offset| *offset != Vector3::new(0, 0, 0))
}

/// Snapshot of the voxel arrays in a 3x3x3 block of chunks.
pub struct ChunkNeighborhood {
    center: Point3<i32>,
    chunks: [Option<Arc<Vec<VoxelWord>>>; 27],
}

impl ChunkNeighborhood {
    fn slot(offset: Vector3<i32>) -> usize {
        ((offset.x + 1) * 9 + (offset.y + 1) * 3 + (offset.z + 1)) as usize
    }

    /// Captures the arrays around `center` from the world.
    ///
    /// Chunks that are not loaded, or loaded without an array, read as air.
    pub fn snapshot(world: &World, center: Point3<i32>) -> Self {
        let mut chunks: [Option<Arc<Vec<VoxelWord>>>; 27] = Default::default();
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    let offset = Vector3::new(x, y, z);
                    let position = center + offset;
                    chunks[Self::slot(offset)] = world
                        .get_chunk(position.x, position.y, position.z)
                        .and_then(|chunk| chunk.get().voxel_data());
                }
            }
        }
        ChunkNeighborhood { center, chunks }
    }

    /// The center chunk's array, if it has one.
    pub fn center_data(&self) -> Option<&Arc<Vec<VoxelWord>>> {
        self.chunks[Self::slot(Vector3::new(0, 0, 0))].as_ref()
    }
}

impl VoxelSampler for ChunkNeighborhood {
    fn peek_raw(&self, x: i32, y: i32, z: i32) -> VoxelWord {
        let (cx, lx) = split_coordinate(x);
        let (cy, ly) = split_coordinate(y);
        let (cz, lz) = split_coordinate(z);
        let offset = Point3::new(cx, cy, cz) - self.center;

        if offset.x.abs() > 1 || offset.y.abs() > 1 || offset.z.abs() > 1 {
            return UNLOADED;
        }
        match &self.chunks[Self::slot(offset)] {
            Some(data) => data[chunk::index(lx, ly, lz)],
            None => UNLOADED,
        }
    }
}

/// Reads voxels relative to one chunk.
pub struct VoxelAccessor<'a, S: VoxelSampler> {
    data: &'a [VoxelWord],
    origin: Point3<i32>,
    sampler: &'a S,
}

impl<'a, S: VoxelSampler> VoxelAccessor<'a, S> {
    /// Creates an accessor for the chunk at `position` holding `data`.
    pub fn new(data: &'a [VoxelWord], position: Point3<i32>, sampler: &'a S) -> Self {
        VoxelAccessor {
            data,
            origin: position * CHUNK_DIMENSION,
            sampler,
        }
    }

    /// Word at a local position; positions outside the chunk go to the world sampler.
    #[inline]
    pub fn sample(&self, x: i32, y: i32, z: i32) -> VoxelWord {
        if chunk::in_bounds(x, y, z) {
            self.data[chunk::index(x, y, z)]
        } else {
            self.sampler
                .peek_raw(x + self.origin.x, y + self.origin.y, z + self.origin.z)
        }
    }
}
