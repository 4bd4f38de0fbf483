//! Vertex data structures and layouts for chunk rendering.
//!
//! This module defines the interleaved vertex format produced by the chunk mesher
//! and the matching `wgpu` buffer layout.

use cgmath::Vector3;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Color: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes)
/// - Texture Id: u32 (4 bytes)
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkVertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Lit vertex color, alpha dropped
    pub color: [f32; 3],
    /// Face normal
    pub normal: [f32; 3],
    /// UV texture coordinates within the atlas slot
    pub tex_coords: [f32; 2],
    /// Virtual texture atlas slot
    pub texture_id: u32,
}

/// Size of one vertex in bytes.
pub const BYTES_PER_VERTEX: usize = std::mem::size_of::<ChunkVertex>();

impl ChunkVertex {
    /// Creates a new vertex.
    pub fn new(
        position: Vector3<f32>,
        color: Vector3<f32>,
        normal: Vector3<f32>,
        tex_coords: [f32; 2],
        texture_id: u32,
    ) -> Self {
        ChunkVertex {
            position: position.into(),
            color: color.into(),
            normal: normal.into(),
            tex_coords,
            texture_id,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: color (vec3<f32>)
    /// - `location = 2`: normal (vec3<f32>)
    /// - `location = 3`: tex_coords (vec2<f32>)
    /// - `location = 4`: texture_id (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ChunkVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}
