use crate::engine_state::rendering::vertex::{ChunkVertex, BYTES_PER_VERTEX};

/// Growable list of chunk vertices, four per face.
///
/// Faces are appended independently; there is no index buffer and no vertex sharing.
/// The bytes handed to the GPU are a view of the vertex list, see [`MeshBuffer::as_bytes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<ChunkVertex>,
}

impl MeshBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one quad.
    pub fn push_face(&mut self, face: [ChunkVertex; 4]) {
        self.vertices.extend_from_slice(&face);
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of quads.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Whether no face was emitted.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertices in emission order.
    pub fn vertices(&self) -> &[ChunkVertex] {
        &self.vertices
    }

    /// Interleaved vertex bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Size of [`MeshBuffer::as_bytes`] in bytes.
    pub fn byte_len(&self) -> usize {
        self.vertices.len() * BYTES_PER_VERTEX
    }
}
