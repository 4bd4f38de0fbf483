use cgmath::Point3;
use chunk_mesh_engine::{
    config::{EngineConfig, TextureFailurePolicy},
    engine_state::{
        rendering::{vertex::BYTES_PER_VERTEX, virtual_texturing::VirtualTexturing},
        voxels::{chunk::Chunk, voxel::VoxelRegistry, voxel_format},
        EngineState,
    },
};

const VOXELS: &str = r#"[
    { "id": 1, "name": "stone", "solid": true },
    { "id": 2, "name": "water", "color": [0.2, 0.4, 1.0, 0.5] },
    { "id": 3, "name": "brick", "solid": true }
]"#;

fn stone() -> u32 {
    voxel_format::format(1, 0, 0, 0)
}

fn sky() -> u32 {
    voxel_format::format(0, 0, 15, 0)
}

/// A single layer world, meshed inline on the test thread.
fn engine(policy: TextureFailurePolicy, atlas_capacity: usize) -> EngineState {
    let config = EngineConfig {
        world_height_in_chunks: 1,
        worker_count: 0,
        atlas_capacity,
        texture_failure_policy: policy,
    };
    EngineState::new(config, VoxelRegistry::from_json_str(VOXELS).unwrap())
}

/// Loads sunlit air on the 8 chunks around the origin.
fn load_ring(engine: &mut EngineState) {
    for x in -1..=1 {
        for z in -1..=1 {
            if (x, z) != (0, 0) {
                engine.add_chunk(Chunk::filled(Point3::new(x, 0, z), sky()));
            }
        }
    }
}

fn only_voxel_at(local: (i32, i32, i32), word: u32) -> Chunk {
    Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| {
        if (x, y, z) == local { word } else { sky() }
    })
}

fn mesh_bytes(engine: &EngineState, position: Point3<i32>) -> Option<Vec<u8>> {
    let chunk = engine.chunk(position)?;
    let mesh = chunk.get().mesh.clone();
    let bytes = mesh.get().bytes().map(<[u8]>::to_vec);
    bytes
}

fn vertex_count(engine: &EngineState, position: Point3<i32>) -> usize {
    engine
        .chunk(position)
        .map(|chunk| chunk.get().mesh.get().vertex_count())
        .unwrap_or(0)
}

#[test]
fn single_corner_voxel_is_a_full_cube() {
    let mut engine = engine(TextureFailurePolicy::Fallback, 16);
    load_ring(&mut engine);
    engine.add_chunk(only_voxel_at((0, 0, 0), stone()));
    engine.mark_available(Point3::new(0, 0, 0));

    assert!(engine.run_until_settled(10));

    let origin = Point3::new(0, 0, 0);
    assert_eq!(vertex_count(&engine, origin), 24);
    assert_eq!(mesh_bytes(&engine, origin).unwrap().len(), 24 * BYTES_PER_VERTEX);
}

#[test]
fn air_chunk_has_an_empty_mesh_even_among_solid_neighbors() {
    let mut engine = engine(TextureFailurePolicy::Fallback, 16);
    for x in -1..=1 {
        for z in -1..=1 {
            engine.add_chunk(Chunk::filled(Point3::new(x, 0, z), stone()));
        }
    }
    engine.add_chunk(Chunk::filled(Point3::new(0, 0, 0), sky()));
    engine.mark_available(Point3::new(0, 0, 0));

    assert!(engine.run_until_settled(10));

    let chunk = engine.chunk(Point3::new(0, 0, 0)).unwrap();
    let mesh = chunk.get().mesh.clone();
    let mesh = mesh.get();
    assert!(mesh.mesh().is_some());
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.bytes(), None);
}

#[test]
fn meshing_waits_for_availability_and_neighbors() {
    let mut engine = engine(TextureFailurePolicy::Fallback, 16);
    let origin = Point3::new(0, 0, 0);
    engine.add_chunk(only_voxel_at((4, 4, 4), stone()));

    // not available: never scheduled
    engine.update();
    assert!(engine.task_manager().is_idle());
    assert_eq!(mesh_bytes(&engine, origin), None);

    // available, neighbors missing: the task keeps deferring
    engine.mark_available(origin);
    assert!(!engine.run_until_settled(5));
    assert!(engine.chunk(origin).unwrap().get().mesh.get().mesh().is_none());

    load_ring(&mut engine);
    assert!(engine.run_until_settled(5));
    assert_eq!(vertex_count(&engine, origin), 24);
}

#[test]
fn same_state_meshes_to_the_same_bytes() {
    let build = || {
        let mut engine = engine(TextureFailurePolicy::Fallback, 16);
        load_ring(&mut engine);
        engine.add_chunk(Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| {
            match (x ^ y ^ z) % 7 {
                0 => stone(),
                1 => voxel_format::format(2, 0, 0, 0),
                2 => voxel_format::format(3, 0, 0, 0),
                _ => voxel_format::format(0, 0, (y % 16) as u8, 0),
            }
        }));
        engine.mark_available(Point3::new(0, 0, 0));
        assert!(engine.run_until_settled(10));
        mesh_bytes(&engine, Point3::new(0, 0, 0)).unwrap()
    };

    let first = build();
    assert_eq!(first.len() % (4 * BYTES_PER_VERTEX), 0);
    assert_eq!(first, build());
}

#[test]
fn border_edit_rebuilds_both_chunks() {
    let mut engine = engine(TextureFailurePolicy::Fallback, 16);
    for x in -1..=2 {
        for z in -1..=1 {
            engine.add_chunk(Chunk::filled(Point3::new(x, 0, z), sky()));
        }
    }
    let west = Point3::new(0, 0, 0);
    let east = Point3::new(1, 0, 0);
    engine.mark_available(west);
    engine.mark_available(east);

    assert!(engine.set_voxel(31, 5, 5, stone()));
    assert!(engine.run_until_settled(10));
    assert_eq!(vertex_count(&engine, west), 24);
    assert_eq!(vertex_count(&engine, east), 0);

    // the new voxel sits against the first one across the chunk border
    assert!(engine.set_voxel(32, 5, 5, stone()));
    assert!(engine.run_until_settled(10));
    assert_eq!(vertex_count(&engine, west), 20);
    assert_eq!(vertex_count(&engine, east), 20);
    assert_eq!(engine.get_voxel(32, 5, 5), stone());
}

#[test]
fn exhausted_atlas_falls_back_or_defers() {
    let two_textures = || {
        Chunk::from_fn(Point3::new(0, 0, 0), |x, y, z| match (x, y, z) {
            (2, 2, 2) => stone(),
            (8, 8, 8) => voxel_format::format(3, 0, 0, 0),
            _ => sky(),
        })
    };

    // capacity 2: the fallback slot plus room for one texture
    let mut falling_back = engine(TextureFailurePolicy::Fallback, 2);
    load_ring(&mut falling_back);
    falling_back.add_chunk(two_textures());
    falling_back.mark_available(Point3::new(0, 0, 0));
    assert!(falling_back.run_until_settled(10));
    assert_eq!(vertex_count(&falling_back, Point3::new(0, 0, 0)), 48);

    let chunk = falling_back.chunk(Point3::new(0, 0, 0)).unwrap();
    let mesh = chunk.get().mesh.clone();
    let mesh = mesh.get();
    let buffer = mesh.mesh().and_then(|m| m.buffer.as_ref()).unwrap();
    assert!(buffer
        .vertices()
        .iter()
        .any(|v| v.texture_id == VirtualTexturing::FALLBACK_SLOT));

    let mut deferring = engine(TextureFailurePolicy::Defer, 2);
    load_ring(&mut deferring);
    deferring.add_chunk(two_textures());
    deferring.mark_available(Point3::new(0, 0, 0));
    assert!(!deferring.run_until_settled(5));
    assert_eq!(mesh_bytes(&deferring, Point3::new(0, 0, 0)), None);
    // each abandoned pass gives back the slot it took
    assert_eq!(deferring.virtual_texturing().references(1), 0);
}

#[test]
fn reloading_a_neighbor_rebuilds_the_border() {
    let mut engine = engine(TextureFailurePolicy::Fallback, 16);
    load_ring(&mut engine);
    let origin = Point3::new(0, 0, 0);
    engine.add_chunk(Chunk::filled(origin, stone()));
    engine.mark_available(origin);

    assert!(engine.run_until_settled(10));
    assert_eq!(vertex_count(&engine, origin), 6 * 32 * 32 * 4);

    // the east neighbor is replaced by solid rock, hiding the east face of the chunk
    engine.add_chunk(Chunk::filled(Point3::new(1, 0, 0), stone()));
    assert!(!engine.is_settled());
    assert!(engine.run_until_settled(10));
    assert_eq!(vertex_count(&engine, origin), 5 * 32 * 32 * 4);
    assert_eq!(engine.world().get().chunk_count(), 9);
}

#[test]
fn worker_pool_meshes_a_terrain() {
    let config = EngineConfig {
        world_height_in_chunks: 1,
        worker_count: 3,
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(config, VoxelRegistry::from_json_str(VOXELS).unwrap());

    for x in -2..=2 {
        for z in -2..=2 {
            let position = Point3::new(x, 0, z);
            engine.add_chunk(Chunk::from_fn(position, |_, y, _| {
                if y < 16 { stone() } else { sky() }
            }));
            if x.abs() < 2 && z.abs() < 2 {
                engine.mark_available(position);
            }
        }
    }

    assert!(engine.run_until_settled(10_000));
    for x in -1..=1 {
        for z in -1..=1 {
            // flat ground: only the top layer and the floor of the world are visible
            let count = vertex_count(&engine, Point3::new(x, 0, z));
            assert_eq!(count, 2 * 32 * 32 * 4, "chunk ({}, {})", x, z);
        }
    }
}
