//! # Chunk Mesh Engine Demo
//!
//! Loads a small terrain, meshes every chunk on the worker pool and logs the result.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [voxels.json]
//! ```

use cgmath::Point3;
use chunk_mesh_engine::{
    config::EngineConfig,
    engine_state::{
        voxels::{chunk::Chunk, voxel::VoxelRegistry, voxel_format},
        EngineState,
    },
};

const DEFAULT_VOXELS: &str = r#"[
    { "id": 1, "name": "stone", "solid": true },
    { "id": 2, "name": "dirt", "solid": true },
    { "id": 3, "name": "grass", "solid": true, "texture": "dirt",
      "sides": { "top": { "name": "grass_top", "color": [0.5, 0.8, 0.3, 1.0] } } },
    { "id": 4, "name": "water", "color": [0.2, 0.4, 1.0, 0.6] }
]"#;

const SEA_LEVEL: i32 = 20;
const RADIUS: i32 = 2;

fn terrain_height(x: i32, z: i32) -> i32 {
    let (fx, fz) = (x as f32 / 24.0, z as f32 / 31.0);
    (18.0 + 6.0 * fx.sin() + 5.0 * fz.cos()) as i32
}

fn terrain_chunk(position: Point3<i32>) -> Chunk {
    let origin = position * 32;
    Chunk::from_fn(position, |x, y, z| {
        let (wx, wy, wz) = (origin.x + x, origin.y + y, origin.z + z);
        let height = terrain_height(wx, wz);
        if wy < height - 3 {
            voxel_format::format(1, 0, 0, 0)
        } else if wy < height {
            voxel_format::format(2, 0, 0, 0)
        } else if wy == height {
            voxel_format::format(3, 0, 0, 0)
        } else if wy <= SEA_LEVEL {
            voxel_format::format(4, 0, 8, 0)
        } else {
            voxel_format::format(0, 0, 15, 0)
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    chunk_mesh_engine::init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig {
            world_height_in_chunks: 2,
            ..EngineConfig::default()
        },
    };
    let registry = match args.next() {
        Some(path) => VoxelRegistry::from_json_str(&std::fs::read_to_string(path)?)?,
        None => VoxelRegistry::from_json_str(DEFAULT_VOXELS)?,
    };

    let height = config.world_height_in_chunks;
    let mut engine = EngineState::new(config, registry);

    // the outer ring only exists so that the inner chunks have all their neighbors
    for x in -RADIUS..=RADIUS {
        for y in 0..height {
            for z in -RADIUS..=RADIUS {
                let position = Point3::new(x, y, z);
                engine.add_chunk(terrain_chunk(position));
                if x.abs() < RADIUS && z.abs() < RADIUS {
                    engine.mark_available(position);
                }
            }
        }
    }

    let started = std::time::Instant::now();
    let settled = engine.run_until_settled(10_000);
    log::info!(
        "Meshing {} in {:?}",
        if settled { "finished" } else { "did not finish" },
        started.elapsed()
    );

    // dig a hole through the surface and rebuild
    for y in 0..SEA_LEVEL + 10 {
        engine.set_voxel(0, y, 0, voxel_format::format(0, 0, 15, 0));
    }
    engine.run_until_settled(10_000);

    let mut total = 0;
    for x in 1 - RADIUS..RADIUS {
        for y in 0..height {
            for z in 1 - RADIUS..RADIUS {
                let Some(chunk) = engine.chunk(Point3::new(x, y, z)) else {
                    continue;
                };
                let vertices = chunk.get().mesh.get().vertex_count();
                log::info!("Chunk ({}, {}, {}): {} vertices", x, y, z, vertices);
                total += vertices;
            }
        }
    }
    let chunk_count = engine.world().get().chunk_count();
    log::info!(
        "{} vertices in total over {} loaded chunks, {} atlas slots",
        total,
        chunk_count,
        engine.virtual_texturing().capacity()
    );
    Ok(())
}
