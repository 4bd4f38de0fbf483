//! # Engine State Module
//!
//! The core engine module: owns the voxel world, the virtual texture atlas and the
//! task manager, and keeps chunk meshes in step with the voxel data.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `rendering` - Chunk meshing, vertex layout and virtual texturing
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Voxel definitions, chunks and the world
//!
//! ## Update Cycle
//!
//! Every call to [`EngineState::update`]:
//! 1. publishes a mesh task for each available chunk whose mesh is stale and not
//!    already being built
//! 2. handles finished tasks, requeueing the ones that had to defer
//! 3. hands queued tasks to idle workers (or runs them inline without workers)

use std::sync::Arc;
use std::time::Duration;

use cgmath::Point3;
use rendering::{tasks::ChunkMeshGenerationTask, virtual_texturing::VirtualTexturing};
use task_management::TaskManager;
use voxels::{
    chunk::{Chunk, ChunkHolderState},
    voxel::VoxelRegistry,
    voxel_format::VoxelWord,
    world::{VoxelSampler, World},
};

use crate::{config::EngineConfig, core::MtResource};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The main state container for the meshing engine.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use chunk_mesh_engine::config::EngineConfig;
/// use chunk_mesh_engine::engine_state::{voxels::{chunk::Chunk, voxel::VoxelRegistry}, EngineState};
///
/// let config = EngineConfig { worker_count: 0, world_height_in_chunks: 1, ..Default::default() };
/// let mut engine = EngineState::new(config, VoxelRegistry::new());
/// engine.add_chunk(Chunk::empty(Point3::new(0, 0, 0)));
/// engine.mark_available(Point3::new(0, 0, 0));
///
/// engine.update();
/// ```
pub struct EngineState {
    config: EngineConfig,
    world: MtResource<World>,
    virtual_texturing: VirtualTexturing,
    task_manager: TaskManager,
}

impl EngineState {
    /// Creates an engine with an empty world.
    pub fn new(config: EngineConfig, registry: VoxelRegistry) -> Self {
        log::info!(
            "Creating engine: {} chunks tall, {} workers, {} atlas slots, {:?} on texture failure",
            config.world_height_in_chunks,
            config.worker_count,
            config.atlas_capacity,
            config.texture_failure_policy
        );

        let world = MtResource::new(World::new(
            config.world_height_in_chunks,
            Arc::new(registry),
        ));

        EngineState {
            virtual_texturing: VirtualTexturing::new(config.atlas_capacity),
            task_manager: TaskManager::new(config.worker_count),
            world,
            config,
        }
    }

    /// The configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared handle to the world.
    pub fn world(&self) -> &MtResource<World> {
        &self.world
    }

    /// Shared handle to the texture atlas.
    pub fn virtual_texturing(&self) -> &VirtualTexturing {
        &self.virtual_texturing
    }

    /// The task manager running mesh builds.
    pub fn task_manager(&self) -> &TaskManager {
        &self.task_manager
    }

    /// Loads a chunk, replacing any chunk at the same position. The chunk is meshed
    /// once it is marked available, and meshed neighbors are flagged for a rebuild.
    pub fn add_chunk(&mut self, chunk: Chunk) -> MtResource<Chunk> {
        self.world.get_mut().add_chunk(chunk)
    }

    /// Marks a loaded chunk as ready for meshing.
    pub fn mark_available(&self, position: Point3<i32>) -> bool {
        self.world.get().mark_available(position)
    }

    /// Unloads a chunk. A build already running for it drops its result.
    pub fn remove_chunk(&mut self, position: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.world.get_mut().remove_chunk(position)
    }

    /// Handle of the chunk at the given chunk coordinates.
    pub fn chunk(&self, position: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.world.get().get_chunk(position.x, position.y, position.z)
    }

    /// Reads the voxel at a world position.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> VoxelWord {
        self.world.get().peek_raw(x, y, z)
    }

    /// Writes the voxel at a world position, flagging the owning chunk's mesh and
    /// the meshes of face-adjacent chunks whose border it touches.
    ///
    /// Returns `false` if the position's chunk is not loaded.
    pub fn set_voxel(&self, x: i32, y: i32, z: i32, word: VoxelWord) -> bool {
        self.world.get().poke_raw(x, y, z, word)
    }

    /// Publishes a mesh task for every available chunk with a stale mesh and no build
    /// in flight. Returns the number of tasks published.
    pub fn schedule_mesh_updates(&mut self) -> usize {
        let chunks: Vec<MtResource<Chunk>> = self.world.get().chunks().cloned().collect();

        let mut scheduled = 0;
        for chunk in chunks {
            let mesh = {
                let chunk = chunk.get();
                if chunk.state() != ChunkHolderState::Available {
                    continue;
                }
                chunk.mesh.clone()
            };
            let Some(target) = mesh.get_mut().try_begin_build() else {
                continue;
            };

            self.task_manager.publish_task(Box::new(ChunkMeshGenerationTask::new(
                self.world.clone(),
                chunk,
                self.virtual_texturing.clone(),
                self.config.texture_failure_policy,
                target,
            )));
            scheduled += 1;
        }

        if scheduled > 0 {
            log::debug!("Scheduled {} chunk mesh builds", scheduled);
        }
        scheduled
    }

    /// Runs one engine tick.
    pub fn update(&mut self) {
        self.schedule_mesh_updates();
        self.task_manager.process_completed_tasks();
        self.task_manager.process_queued_tasks();
        if self.task_manager.worker_count() == 0 {
            self.task_manager.run_pending_inline();
        }
    }

    /// Whether every available chunk has an up to date mesh and no task is pending.
    pub fn is_settled(&self) -> bool {
        if !self.task_manager.is_idle() {
            return false;
        }
        let world = self.world.get();
        let settled = world.chunks().all(|chunk| {
            let chunk = chunk.get();
            let stale = chunk.mesh.get().needs_update();
            chunk.state() != ChunkHolderState::Available || !stale
        });
        settled
    }

    /// Ticks until [`EngineState::is_settled`] or until `max_ticks` ticks have run.
    ///
    /// Returns whether the engine settled. Chunks waiting on neighbors that never load
    /// keep the engine from settling.
    pub fn run_until_settled(&mut self, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            self.update();
            if self.is_settled() {
                return true;
            }
            if self.task_manager.worker_count() > 0 {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
        log::warn!(
            "Engine did not settle after {} ticks ({} tasks queued, {} in flight)",
            max_ticks,
            self.task_manager.queued_count(),
            self.task_manager.in_flight_count()
        );
        false
    }
}
