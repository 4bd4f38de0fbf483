//! Chunk-owned render state: the latest mesh of a chunk and its rebuild bookkeeping.
//!
//! Rebuilds are driven by two counters. `request_update()` bumps the update counter
//! whenever the chunk (or a neighbor border) changes; a published mesh records the
//! counter value its build started from. The chunk needs a rebuild while the built
//! value lags behind, so a change that lands during a build simply leaves the property
//! dirty and the next scheduling pass starts another build.

use crate::engine_state::rendering::{
    meshing::MeshBuffer, virtual_texturing::VirtualTexturingContext,
};

/// A published chunk mesh.
///
/// The texturing context is kept alive as long as the buffer, since the buffer's
/// vertices refer to atlas slots the context holds.
pub struct ChunkMesh {
    /// Vertex data, `None` for chunks with no visible faces
    pub buffer: Option<MeshBuffer>,
    /// Translation context the buffer's texture ids come from
    pub texturing_context: Option<VirtualTexturingContext>,
    /// Number of vertices in `buffer`
    pub vertex_count: usize,
}

/// Render state holder of one chunk.
pub struct ChunkMeshProperty {
    mesh: Option<ChunkMesh>,
    update_counter: u64,
    built_counter: u64,
    build_in_flight: bool,
}

impl Default for ChunkMeshProperty {
    fn default() -> Self {
        ChunkMeshProperty {
            mesh: None,
            update_counter: 1,
            built_counter: 0,
            build_in_flight: false,
        }
    }
}

impl ChunkMeshProperty {
    /// Creates a property that still needs its first build.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags the mesh as stale.
    pub fn request_update(&mut self) {
        self.update_counter += 1;
    }

    /// Current update counter.
    pub fn update_counter(&self) -> u64 {
        self.update_counter
    }

    /// Whether the published mesh is older than the latest update request.
    pub fn needs_update(&self) -> bool {
        self.built_counter < self.update_counter
    }

    /// Whether a mesh task for this chunk is live.
    pub fn is_build_in_flight(&self) -> bool {
        self.build_in_flight
    }

    /// Claims the right to build. Returns the update counter the build targets, or
    /// `None` if the mesh is current or another build is already live.
    pub fn try_begin_build(&mut self) -> Option<u64> {
        if self.build_in_flight || !self.needs_update() {
            return None;
        }
        self.build_in_flight = true;
        Some(self.update_counter)
    }

    /// Releases the build claim without publishing anything.
    pub fn abandon_build(&mut self) {
        self.build_in_flight = false;
    }

    /// Replaces the published mesh. The previous buffer and context are released.
    ///
    /// `built_for` is the update counter the build started from.
    pub fn accept_new_data(
        &mut self,
        buffer: Option<MeshBuffer>,
        texturing_context: Option<VirtualTexturingContext>,
        vertex_count: usize,
        built_for: u64,
    ) {
        self.mesh = Some(ChunkMesh {
            buffer,
            texturing_context,
            vertex_count,
        });
        self.built_counter = self.built_counter.max(built_for);
        self.build_in_flight = false;
    }

    /// The published mesh, if any build has completed.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Vertex count of the published mesh, 0 if none.
    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map(|m| m.vertex_count).unwrap_or(0)
    }

    /// GPU-ready bytes of the published mesh.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.mesh
            .as_ref()
            .and_then(|m| m.buffer.as_ref())
            .map(MeshBuffer::as_bytes)
    }
}
