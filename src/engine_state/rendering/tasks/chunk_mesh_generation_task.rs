//! Task for generating mesh data for chunks in a background thread.
//!
//! A `ChunkMeshGenerationTask` walks `Pending → WaitingOnNeighbors → Building →
//! Complete`. Each call to [`ChunkMeshGenerationTask::update`] runs the machine as far
//! as it can and reports whether the task is done. A task that is not done goes back
//! to `Pending` and is handed back to the task manager to be tried again.

use cgmath::Point3;

use crate::{
    config::TextureFailurePolicy,
    core::MtResource,
    engine_state::{
        rendering::{
            meshing::{build_chunk_mesh, neighbor_offsets, ChunkNeighborhood},
            virtual_texturing::VirtualTexturing,
        },
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{Chunk, ChunkHolderState},
            world::World,
        },
    },
};

/// Progress of a mesh task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshTaskState {
    /// Not started, or sent back to the start by a retrigger or a deferral
    Pending,
    /// Chunk is available, waiting for the 26 neighbors to load
    WaitingOnNeighbors,
    /// Meshing is in progress
    Building,
    /// The mesh has been published
    Complete,
}

/// A task that generates mesh data for a chunk in a background thread.
///
/// The task owns the build claim on the chunk's mesh property (see
/// `ChunkMeshProperty::try_begin_build`) until it publishes or gives up.
pub struct ChunkMeshGenerationTask {
    world: MtResource<World>,
    chunk: MtResource<Chunk>,
    texturing: VirtualTexturing,
    policy: TextureFailurePolicy,
    /// Update counter of the mesh property this build was claimed for
    target_update: u64,
    state: MeshTaskState,
    /// Consecutive builds abandoned because a texture could not be resolved
    texture_deferrals: u32,
}

impl ChunkMeshGenerationTask {
    /// Creates a mesh task for `chunk`, built for the property's `target_update`.
    pub fn new(
        world: MtResource<World>,
        chunk: MtResource<Chunk>,
        texturing: VirtualTexturing,
        policy: TextureFailurePolicy,
        target_update: u64,
    ) -> Self {
        ChunkMeshGenerationTask {
            world,
            chunk,
            texturing,
            policy,
            target_update,
            state: MeshTaskState::Pending,
            texture_deferrals: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> MeshTaskState {
        self.state
    }

    /// Position of the chunk this task meshes.
    pub fn position(&self) -> Point3<i32> {
        self.chunk.get().position
    }

    /// Sends the task back to `Pending`, now targeting a newer update counter.
    pub fn retrigger(&mut self, target_update: u64) {
        self.target_update = self.target_update.max(target_update);
        self.state = MeshTaskState::Pending;
    }

    /// Runs the state machine. Returns `true` when the task is done, `false` when it
    /// should be retried later.
    pub fn update(&mut self) -> bool {
        self.state = MeshTaskState::Pending;

        let (position, holder_state, mesh, voxel_data, air_chunk) = {
            let chunk = self.chunk.get();
            (
                chunk.position,
                chunk.state(),
                chunk.mesh.clone(),
                chunk.voxel_data(),
                chunk.is_air_chunk(),
            )
        };

        let world = self.world.get();
        let still_loaded = world
            .get_chunk(position.x, position.y, position.z)
            .is_some_and(|current| current.ptr_eq(&self.chunk));
        if !still_loaded {
            log::debug!("Chunk {:?} was unloaded before meshing, dropping task", position);
            mesh.get_mut().abandon_build();
            return true;
        }

        if holder_state != ChunkHolderState::Available {
            log::trace!("Chunk {:?} not available yet, deferring mesh", position);
            return false;
        }

        self.state = MeshTaskState::WaitingOnNeighbors;
        let missing = neighbor_offsets().map(|offset| position + offset).find(|n| {
            world.get_chunk(n.x, n.y, n.z).is_none() && !world.is_out_of_vertical_bounds(n.y)
        });
        if let Some(missing) = missing {
            log::trace!("Chunk {:?} waiting on neighbor {:?}", position, missing);
            self.state = MeshTaskState::Pending;
            return false;
        }

        self.state = MeshTaskState::Building;
        let data = match voxel_data {
            Some(data) if !air_chunk => data,
            _ => {
                drop(world);
                mesh.get_mut().accept_new_data(None, None, 0, self.target_update);
                self.state = MeshTaskState::Complete;
                return true;
            }
        };

        let neighborhood = ChunkNeighborhood::snapshot(&world, position);
        let registry = world.registry().clone();
        drop(world);

        let mut context = self.texturing.get_context();
        let output = match build_chunk_mesh(
            &data,
            position,
            &neighborhood,
            &registry,
            &mut context,
            self.policy,
        ) {
            Ok(output) => output,
            Err(err) => {
                // warn once per run of consecutive failures
                self.texture_deferrals += 1;
                if self.texture_deferrals == 1 {
                    log::warn!("Deferring mesh of chunk {:?}: {}", position, err);
                } else {
                    log::trace!(
                        "Deferring mesh of chunk {:?} ({} times in a row): {}",
                        position,
                        self.texture_deferrals,
                        err
                    );
                }
                self.state = MeshTaskState::Pending;
                return false;
            }
        };
        self.texture_deferrals = 0;

        context.update_contents();
        for texture in &output.fallback_textures {
            log::warn!(
                "Texture '{}' had no atlas slot, chunk {:?} uses the fallback texture",
                texture,
                position
            );
        }

        let vertex_count = output.buffer.vertex_count();
        log::debug!(
            "Meshed chunk {:?}: {} faces, {} textures",
            position,
            output.buffer.face_count(),
            context.translated_count()
        );
        let buffer = (!output.buffer.is_empty()).then_some(output.buffer);
        mesh.get_mut()
            .accept_new_data(buffer, Some(context), vertex_count, self.target_update);

        self.state = MeshTaskState::Complete;
        true
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(mut self: Box<Self>) -> Box<dyn TaskResult + Send> {
        let done = self.update();
        Box::new(ChunkMeshGenerationTaskResult { task: self, done })
    }
}

/// The result of one run of a [`ChunkMeshGenerationTask`].
pub struct ChunkMeshGenerationTaskResult {
    task: Box<ChunkMeshGenerationTask>,
    done: bool,
}

impl ChunkMeshGenerationTaskResult {
    /// Whether the task finished.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Requeues deferred tasks. A finished task whose chunk changed while it was
    /// building is retriggered instead of waiting for the next scheduling pass.
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
        let ChunkMeshGenerationTaskResult { mut task, done } = *self;
        if !done {
            log::trace!("Requeueing mesh task of chunk {:?}", task.position());
            return vec![task as Box<dyn Task + Send>];
        }
        if task.state() != MeshTaskState::Complete {
            return Vec::new();
        }

        let mesh = task.chunk.get().mesh.clone();
        let target = mesh.get_mut().try_begin_build();
        match target {
            Some(target) => {
                log::debug!("Chunk {:?} changed during its build, rebuilding", task.position());
                task.retrigger(target);
                vec![task as Box<dyn Task + Send>]
            }
            None => Vec::new(),
        }
    }
}
