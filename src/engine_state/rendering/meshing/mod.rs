//! Chunk mesh generation.
//!
//! Converts a chunk's voxel array into a list of textured, lit quads.
//!
//! # Architecture
//! - [`VoxelAccessor`]: reads the chunk's array, or the world across chunk borders
//! - [`FaceCuller`]: keeps a face when its voxel is opaque and the neighbor is not
//! - [`VertexEmitter`]: builds four vertices per kept face
//! - [`MeshBuffer`]: the growing vertex list, viewed as bytes at the end
//!
//! # Determinism
//! Voxels are visited x outer, y middle, z inner, and faces in
//! `VoxelSide::MESHING_ORDER`. Lighting noise is drawn in that order from a generator
//! seeded once per build, so the same chunk state always produces the same bytes.
//!
//! # Usage
//! ```no_run
//! use std::sync::Arc;
//! use cgmath::Point3;
//! use chunk_mesh_engine::config::TextureFailurePolicy;
//! use chunk_mesh_engine::engine_state::rendering::{
//!     meshing::{build_chunk_mesh, ChunkNeighborhood},
//!     virtual_texturing::VirtualTexturing,
//! };
//! use chunk_mesh_engine::engine_state::voxels::{chunk::Chunk, voxel::VoxelRegistry, world::World};
//!
//! let registry = Arc::new(VoxelRegistry::new());
//! let mut world = World::new(8, registry.clone());
//! world.add_chunk(Chunk::filled(Point3::new(0, 0, 0), 0));
//!
//! let neighborhood = ChunkNeighborhood::snapshot(&world, Point3::new(0, 0, 0));
//! let data = neighborhood.center_data().unwrap().clone();
//! let atlas = VirtualTexturing::new(64);
//! let mut context = atlas.get_context();
//! let output = build_chunk_mesh(
//!     &data,
//!     Point3::new(0, 0, 0),
//!     &neighborhood,
//!     &registry,
//!     &mut context,
//!     TextureFailurePolicy::Fallback,
//! )
//! .unwrap();
//! assert!(output.buffer.is_empty());
//! ```

use cgmath::{Point3, Vector3};

use crate::{
    config::TextureFailurePolicy,
    engine_state::voxels::{
        chunk::{self, CHUNK_DIMENSION},
        voxel::{voxel_side::VoxelSide, VoxelRegistry},
        voxel_format::VoxelWord,
        world::VoxelSampler,
    },
    error::MeshingError,
};

use super::virtual_texturing::VirtualTexturingContext;

mod accessor;
mod culling;
mod emitter;
mod mesh_buffer;

pub use accessor::{neighbor_offsets, ChunkNeighborhood, VoxelAccessor};
pub use culling::FaceCuller;
pub use emitter::{SurfaceColor, VertexEmitter, DITHER_SEED, UNDERWATER_TINT};
pub use mesh_buffer::MeshBuffer;

/// Result of one meshing pass.
#[derive(Debug, Default)]
pub struct MeshOutput {
    /// Emitted vertices
    pub buffer: MeshBuffer,
    /// Texture paths that were drawn with the fallback slot
    pub fallback_textures: Vec<String>,
}

/// Meshes one chunk.
///
/// `data` is the chunk's voxel array and `sampler` answers reads outside of it.
/// With [`TextureFailurePolicy::Defer`] the first texture that cannot be placed in the
/// atlas aborts the pass.
pub fn build_chunk_mesh<S: VoxelSampler>(
    data: &[VoxelWord],
    position: Point3<i32>,
    sampler: &S,
    registry: &VoxelRegistry,
    texturing: &mut VirtualTexturingContext,
    policy: TextureFailurePolicy,
) -> Result<MeshOutput, MeshingError> {
    let accessor = VoxelAccessor::new(data, position, sampler);
    let culler = FaceCuller::new(&accessor, registry);
    let origin = Vector3::new(
        (position.x * CHUNK_DIMENSION) as f32,
        (position.y * CHUNK_DIMENSION) as f32,
        (position.z * CHUNK_DIMENSION) as f32,
    );
    let mut emitter = VertexEmitter::new(origin, texturing, policy);
    let mut buffer = MeshBuffer::new();

    for x in 0..CHUNK_DIMENSION {
        for y in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                let current = data[chunk::index(x, y, z)];
                let Some(voxel) = registry.get_voxel_for_word(current) else {
                    continue;
                };
                if !voxel.is_opaque() {
                    continue;
                }

                for side in VoxelSide::MESHING_ORDER {
                    if let Some(neighbor) = culler.visible_face(x, y, z, side) {
                        emitter.emit_face(&mut buffer, voxel, (x, y, z), side, neighbor)?;
                    }
                }
            }
        }
    }

    Ok(MeshOutput {
        buffer,
        fallback_textures: emitter.into_fallback_textures(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::{vertex::BYTES_PER_VERTEX, virtual_texturing::VirtualTexturing},
        voxels::{chunk::Chunk, voxel_format, world::World},
    };
    use std::sync::Arc;

    const REGISTRY: &str = r#"[
        { "id": 1, "name": "stone", "solid": true },
        { "id": 2, "name": "water", "color": [0.2, 0.4, 1.0, 0.5] },
        { "id": 3, "name": "grass", "solid": true, "texture": "dirt",
          "sides": { "top": { "name": "grass_top" } } }
    ]"#;

    fn registry() -> Arc<VoxelRegistry> {
        Arc::new(VoxelRegistry::from_json_str(REGISTRY).unwrap())
    }

    fn air(sunlight: u8) -> VoxelWord {
        voxel_format::format(0, 0, sunlight, 0)
    }

    /// Builds the mesh of chunk (0, 0, 0) with all 26 neighbors loaded as sunlit air.
    fn mesh_with_air_neighbors(center: Chunk, atlas: &VirtualTexturing) -> MeshOutput {
        let registry = registry();
        let mut world = World::new(4, registry.clone());
        for offset in neighbor_offsets() {
            world.add_chunk(Chunk::filled(Point3::new(0, 0, 0) + offset, air(15)));
        }
        world.add_chunk(center);

        let neighborhood = ChunkNeighborhood::snapshot(&world, Point3::new(0, 0, 0));
        let data = neighborhood.center_data().unwrap().clone();
        let mut context = atlas.get_context();
        build_chunk_mesh(
            &data,
            Point3::new(0, 0, 0),
            &neighborhood,
            &registry,
            &mut context,
            TextureFailurePolicy::Fallback,
        )
        .unwrap()
    }

    #[test]
    fn single_voxel_emits_six_faces() {
        let stone = voxel_format::format(1, 0, 0, 0);
        let center = Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| {
            if (x, y, z) == (0, 0, 0) { stone } else { air(15) }
        });

        let output = mesh_with_air_neighbors(center, &VirtualTexturing::new(8));
        assert_eq!(output.buffer.face_count(), 6);
        assert_eq!(output.buffer.vertex_count(), 24);
        assert_eq!(output.buffer.as_bytes().len(), 24 * BYTES_PER_VERTEX);
    }

    #[test]
    fn solid_chunk_only_has_its_shell() {
        let center = Chunk::filled(Point3::new(0, 0, 0), voxel_format::format(1, 0, 0, 0));
        let output = mesh_with_air_neighbors(center, &VirtualTexturing::new(8));

        // every face points out of the chunk, none between two solid voxels
        assert_eq!(output.buffer.face_count(), 6 * 32 * 32);
        for vertex in output.buffer.vertices() {
            let outside = vertex.position.iter().zip(vertex.normal.iter()).any(|(p, n)| {
                (*n > 0.0 && *p == 32.0) || (*n < 0.0 && *p == 0.0)
            });
            assert!(outside, "{:?}", vertex);
        }
    }

    #[test]
    fn enclosed_interior_emits_nothing() {
        let registry = registry();
        let stone = voxel_format::format(1, 0, 0, 0);
        let mut world = World::new(4, registry.clone());
        for offset in neighbor_offsets() {
            world.add_chunk(Chunk::filled(Point3::new(0, 0, 0) + offset, stone));
        }
        world.add_chunk(Chunk::filled(Point3::new(0, 0, 0), stone));

        let neighborhood = ChunkNeighborhood::snapshot(&world, Point3::new(0, 0, 0));
        let data = neighborhood.center_data().unwrap().clone();
        let atlas = VirtualTexturing::new(8);
        let mut context = atlas.get_context();
        let output = build_chunk_mesh(
            &data,
            Point3::new(0, 0, 0),
            &neighborhood,
            &registry,
            &mut context,
            TextureFailurePolicy::Fallback,
        )
        .unwrap();

        assert!(output.buffer.is_empty());
        assert_eq!(context.translated_count(), 0);
    }

    #[test]
    fn rebuilding_is_byte_identical() {
        let make = || {
            Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| {
                if (x * 7 + y * 3 + z) % 5 == 0 {
                    voxel_format::format(1 + ((x + z) % 3) as u16, 0, 0, 0)
                } else {
                    air(((x + y) % 16) as u8)
                }
            })
        };

        let atlas = VirtualTexturing::new(16);
        let first = mesh_with_air_neighbors(make(), &atlas);
        let second = mesh_with_air_neighbors(make(), &atlas);

        assert!(!first.buffer.is_empty());
        assert_eq!(first.buffer.vertex_count() % 4, 0);
        assert_eq!(first.buffer.as_bytes(), second.buffer.as_bytes());
    }

    #[test]
    fn water_is_culled_like_a_solid_and_tinted() {
        let water = voxel_format::format(2, 0, 0, 0);
        let stone = voxel_format::format(1, 0, 0, 0);
        let center = Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| match (x, y, z) {
            (10, 10, 10) => water,
            (10, 11, 10) => stone,
            _ => air(15),
        });

        let output = mesh_with_air_neighbors(center, &VirtualTexturing::new(8));
        // the underwater tint zeroes red, the untinted stone keeps it
        let (water_faces, stone_faces): (Vec<_>, Vec<_>) = output
            .buffer
            .vertices()
            .chunks(4)
            .partition(|face| face[0].color[0] == 0.0);

        // stone sits on the water: no top face for the water, no bottom face for the stone
        assert_eq!(water_faces.len(), 5);
        assert_eq!(stone_faces.len(), 5);
        for face in water_faces {
            assert_ne!(face[0].normal, [0.0, 1.0, 0.0]);
            assert!(face.iter().all(|v| (10.0..=11.0).contains(&v.position[1])));
            assert!(face[0].color[1] > 0.0);
        }
        for face in stone_faces {
            assert_ne!(face[0].normal, [0.0, -1.0, 0.0]);
        }
    }

    #[test]
    fn side_textures_map_to_distinct_slots() {
        let grass = voxel_format::format(3, 0, 0, 0);
        let center = Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| {
            if (x, y, z) == (4, 4, 4) { grass } else { air(15) }
        });

        let atlas = VirtualTexturing::new(8);
        let output = mesh_with_air_neighbors(center, &atlas);

        let top = output
            .buffer
            .vertices()
            .iter()
            .find(|v| v.normal == [0.0, 1.0, 0.0])
            .unwrap();
        let bottom = output
            .buffer
            .vertices()
            .iter()
            .find(|v| v.normal == [0.0, -1.0, 0.0])
            .unwrap();
        assert_ne!(top.texture_id, bottom.texture_id);
        assert!(output.fallback_textures.is_empty());
    }
}
