use crate::engine_state::voxels::{
    voxel::{voxel_side::VoxelSide, VoxelRegistry},
    voxel_format::VoxelWord,
    world::VoxelSampler,
};

use super::accessor::VoxelAccessor;

/// Decides which faces of a voxel are visible.
///
/// A face is visible when the voxel is opaque and the voxel across the face is not.
/// Opacity comes from the registry (solid, or water).
pub struct FaceCuller<'a, S: VoxelSampler> {
    accessor: &'a VoxelAccessor<'a, S>,
    registry: &'a VoxelRegistry,
}

impl<'a, S: VoxelSampler> FaceCuller<'a, S> {
    /// Creates a culler reading through `accessor`.
    pub fn new(accessor: &'a VoxelAccessor<'a, S>, registry: &'a VoxelRegistry) -> Self {
        FaceCuller { accessor, registry }
    }

    /// Whether the voxel at a local position gets any geometry at all.
    #[inline]
    pub fn is_opaque(&self, x: i32, y: i32, z: i32) -> bool {
        self.registry.is_opaque(self.accessor.sample(x, y, z))
    }

    /// Returns the neighbor's word if the face on `side` should be emitted.
    ///
    /// Only the neighbor is checked; callers gate on [`FaceCuller::is_opaque`] once
    /// per voxel. The neighbor word is returned because its sunlight lights the face.
    #[inline]
    pub fn visible_face(&self, x: i32, y: i32, z: i32, side: VoxelSide) -> Option<VoxelWord> {
        let offset = side.offset();
        let neighbor = self
            .accessor
            .sample(x + offset.x, y + offset.y, z + offset.z);
        if self.registry.is_opaque(neighbor) {
            None
        } else {
            Some(neighbor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::meshing::accessor::ChunkNeighborhood,
        voxels::{
            chunk::{self, Chunk, CHUNK_SIZE},
            voxel_format,
            world::World,
        },
    };
    use cgmath::Point3;
    use std::sync::Arc;

    const REGISTRY: &str = r#"[
        { "id": 1, "name": "stone", "solid": true },
        { "id": 2, "name": "water", "color": [0.2, 0.4, 1.0, 0.5] },
        { "id": 3, "name": "flower" }
    ]"#;

    fn visible_sides(data: &[VoxelWord], x: i32, y: i32, z: i32) -> Vec<VoxelSide> {
        let registry = VoxelRegistry::from_json_str(REGISTRY).unwrap();
        let world = World::new(4, Arc::new(VoxelRegistry::new()));
        let neighborhood = ChunkNeighborhood::snapshot(&world, Point3::new(0, 0, 0));
        let accessor = VoxelAccessor::new(data, Point3::new(0, 0, 0), &neighborhood);
        let culler = FaceCuller::new(&accessor, &registry);

        if !culler.is_opaque(x, y, z) {
            return Vec::new();
        }
        VoxelSide::MESHING_ORDER
            .into_iter()
            .filter(|side| culler.visible_face(x, y, z, *side).is_some())
            .collect()
    }

    #[test]
    fn face_visible_iff_neighbor_not_opaque() {
        let stone = voxel_format::format(1, 0, 0, 0);
        let water = voxel_format::format(2, 0, 0, 0);
        let flower = voxel_format::format(3, 0, 0, 0);

        let mut data = vec![0; CHUNK_SIZE as usize];
        data[chunk::index(5, 5, 5)] = stone;
        data[chunk::index(5, 6, 5)] = stone;
        data[chunk::index(5, 4, 5)] = water;
        data[chunk::index(4, 5, 5)] = flower;

        let sides = visible_sides(&data, 5, 5, 5);
        assert!(!sides.contains(&VoxelSide::TOP));
        assert!(!sides.contains(&VoxelSide::BOTTOM));
        assert!(sides.contains(&VoxelSide::LEFT));
        assert_eq!(sides.len(), 4);
    }

    #[test]
    fn non_opaque_voxels_emit_nothing() {
        let mut data = vec![0; CHUNK_SIZE as usize];
        data[chunk::index(1, 1, 1)] = voxel_format::format(3, 0, 0, 0);
        assert!(visible_sides(&data, 1, 1, 1).is_empty());
        assert!(visible_sides(&data, 2, 2, 2).is_empty());
    }

    #[test]
    fn unloaded_neighbors_count_as_air() {
        let data = Chunk::filled(Point3::new(0, 0, 0), voxel_format::format(1, 0, 0, 0))
            .voxel_data()
            .unwrap();
        assert_eq!(visible_sides(&data, 0, 0, 0).len(), 3);
        assert!(visible_sides(&data, 10, 10, 10).is_empty());
    }
}
