//! Turns visible faces into vertices.

use cgmath::{ElementWise, Vector3};

use crate::{
    config::TextureFailurePolicy,
    engine_state::{
        rendering::{
            unit_cube,
            vertex::ChunkVertex,
            virtual_texturing::{TranslationResult, VirtualTexturing, VirtualTexturingContext},
        },
        voxels::{
            voxel::{voxel_side::VoxelSide, Voxel, VoxelTexture},
            voxel_format::{self, VoxelWord, MAX_LIGHT},
        },
    },
    error::MeshingError,
};

use super::MeshBuffer;

/// Color multiplier applied to translucent surfaces.
pub const UNDERWATER_TINT: [f32; 3] = [0.0, 1.0, 0.3];

/// Seed of the per-build dithering sequence.
pub const DITHER_SEED: u64 = 1;

/// Base color of a surface, separated from its translucency.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceColor {
    /// Tint without alpha, white when the texture has none
    pub base_color: Vector3<f32>,
    /// The tint's alpha was below one
    pub is_translucent: bool,
}

impl SurfaceColor {
    /// Reads the tint of a texture descriptor.
    pub fn of(texture: &VoxelTexture) -> Self {
        match texture.color {
            Some([r, g, b, a]) => SurfaceColor {
                base_color: Vector3::new(r, g, b),
                is_translucent: a < 1.0,
            },
            None => SurfaceColor {
                base_color: Vector3::new(1.0, 1.0, 1.0),
                is_translucent: false,
            },
        }
    }

    /// Color before lighting.
    pub fn unlit(&self) -> Vector3<f32> {
        if self.is_translucent {
            self.base_color
                .mul_element_wise(Vector3::from(UNDERWATER_TINT))
        } else {
            self.base_color
        }
    }
}

/// Appends lit, textured quads to a mesh buffer.
///
/// One dithering value is drawn per emitted face, in emission order, from a generator
/// seeded with [`DITHER_SEED`] when the emitter is created.
pub struct VertexEmitter<'a> {
    chunk_origin: Vector3<f32>,
    rng: fastrand::Rng,
    texturing: &'a mut VirtualTexturingContext,
    policy: TextureFailurePolicy,
    fallback_textures: Vec<String>,
}

impl<'a> VertexEmitter<'a> {
    /// Creates an emitter for the chunk whose first voxel sits at `chunk_origin`.
    pub fn new(
        chunk_origin: Vector3<f32>,
        texturing: &'a mut VirtualTexturingContext,
        policy: TextureFailurePolicy,
    ) -> Self {
        VertexEmitter {
            chunk_origin,
            rng: fastrand::Rng::with_seed(DITHER_SEED),
            texturing,
            policy,
            fallback_textures: Vec::new(),
        }
    }

    fn resolve_texture(&mut self, texture: &VoxelTexture) -> Result<u32, MeshingError> {
        let path = texture.resource_path();
        match self.texturing.translate(&path) {
            TranslationResult::Success(id) => Ok(id),
            TranslationResult::Failure => match self.policy {
                TextureFailurePolicy::Fallback => {
                    if !self.fallback_textures.contains(&path) {
                        self.fallback_textures.push(path);
                    }
                    Ok(VirtualTexturing::FALLBACK_SLOT)
                }
                TextureFailurePolicy::Defer => {
                    Err(MeshingError::TextureResolution { texture: path })
                }
            },
        }
    }

    /// Emits the face of `voxel` at local `(x, y, z)` facing `side`.
    ///
    /// `neighbor` is the word across the face; its sunlight lights the face.
    pub fn emit_face(
        &mut self,
        buffer: &mut MeshBuffer,
        voxel: &Voxel,
        (x, y, z): (i32, i32, i32),
        side: VoxelSide,
        neighbor: VoxelWord,
    ) -> Result<(), MeshingError> {
        let texture = voxel.texture(side);
        let texture_id = self.resolve_texture(texture)?;

        let sunlight = voxel_format::sunlight(neighbor) as f32 / MAX_LIGHT as f32;
        let light = sunlight * 0.9 + self.rng.f32() * 0.1;
        let color = SurfaceColor::of(texture).unlit() * light;

        let face = unit_cube::face_data(side);
        let normal = Vector3::from(face.normal);
        let base = self.chunk_origin + Vector3::new(x as f32, y as f32, z as f32);

        let vertices = face.vertices.map(|(corner, tex_coords)| {
            ChunkVertex::new(base + Vector3::from(corner), color, normal, tex_coords, texture_id)
        });
        buffer.push_face(vertices);
        Ok(())
    }

    /// Texture paths that were replaced by the fallback slot so far.
    pub fn fallback_textures(&self) -> &[String] {
        &self.fallback_textures
    }

    /// Consumes the emitter, returning the fallback texture paths.
    pub fn into_fallback_textures(self) -> Vec<String> {
        self.fallback_textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(color: Option<[f32; 4]>) -> VoxelTexture {
        VoxelTexture {
            name: "stone".to_string(),
            color,
        }
    }

    fn voxel(color: Option<[f32; 4]>) -> Voxel {
        let texture = texture(color);
        Voxel {
            id: 1,
            name: "stone".to_string(),
            solid: true,
            textures: std::array::from_fn(|_| texture.clone()),
        }
    }

    #[test]
    fn surface_color_separates_translucency() {
        let opaque = SurfaceColor::of(&texture(Some([0.5, 0.5, 0.5, 1.0])));
        assert!(!opaque.is_translucent);
        assert_eq!(opaque.unlit(), Vector3::new(0.5, 0.5, 0.5));

        let water = SurfaceColor::of(&texture(Some([0.2, 0.4, 1.0, 0.5])));
        assert!(water.is_translucent);
        assert_eq!(water.unlit(), Vector3::new(0.0, 0.4, 0.3));

        let plain = SurfaceColor::of(&texture(None));
        assert_eq!(plain.unlit(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn face_is_placed_in_world_space() {
        let atlas = VirtualTexturing::new(4);
        let mut context = atlas.get_context();
        let mut emitter = VertexEmitter::new(
            Vector3::new(32.0, 0.0, -32.0),
            &mut context,
            TextureFailurePolicy::Fallback,
        );
        let mut buffer = MeshBuffer::new();

        emitter
            .emit_face(
                &mut buffer,
                &voxel(None),
                (1, 2, 3),
                VoxelSide::TOP,
                voxel_format::format(0, 0, 15, 0),
            )
            .unwrap();

        assert_eq!(buffer.vertex_count(), 4);
        for vertex in buffer.vertices() {
            assert_eq!(vertex.position[1], 3.0);
            assert!((33.0..=34.0).contains(&vertex.position[0]));
            assert!((-29.0..=-28.0).contains(&vertex.position[2]));
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
            assert_eq!(vertex.texture_id, 1);
            // full sunlight keeps the color between 0.9 and 1.0
            assert!(vertex.color.iter().all(|c| (0.9..=1.0).contains(c)));
        }
    }

    #[test]
    fn dark_faces_only_keep_the_dither() {
        let atlas = VirtualTexturing::new(4);
        let mut context = atlas.get_context();
        let mut emitter =
            VertexEmitter::new(Vector3::new(0.0, 0.0, 0.0), &mut context, TextureFailurePolicy::Fallback);
        let mut buffer = MeshBuffer::new();

        emitter
            .emit_face(&mut buffer, &voxel(None), (0, 0, 0), VoxelSide::LEFT, 0)
            .unwrap();

        assert!(buffer.vertices()[0].color.iter().all(|c| (0.0..=0.1).contains(c)));
    }

    #[test]
    fn texture_failure_follows_policy() {
        let atlas = VirtualTexturing::new(2);
        let mut hog = atlas.get_context();
        assert!(matches!(hog.translate("other"), TranslationResult::Success(1)));

        let mut context = atlas.get_context();
        let mut buffer = MeshBuffer::new();

        let mut deferring =
            VertexEmitter::new(Vector3::new(0.0, 0.0, 0.0), &mut context, TextureFailurePolicy::Defer);
        let err = deferring
            .emit_face(&mut buffer, &voxel(None), (0, 0, 0), VoxelSide::TOP, 0)
            .unwrap_err();
        assert_eq!(
            err,
            MeshingError::TextureResolution {
                texture: "voxels/textures/stone.png".to_string()
            }
        );
        assert!(buffer.is_empty());

        let mut falling_back =
            VertexEmitter::new(Vector3::new(0.0, 0.0, 0.0), &mut context, TextureFailurePolicy::Fallback);
        falling_back
            .emit_face(&mut buffer, &voxel(None), (0, 0, 0), VoxelSide::TOP, 0)
            .unwrap();
        falling_back
            .emit_face(&mut buffer, &voxel(None), (0, 0, 0), VoxelSide::BOTTOM, 0)
            .unwrap();
        assert_eq!(buffer.vertices()[0].texture_id, VirtualTexturing::FALLBACK_SLOT);
        assert_eq!(falling_back.fallback_textures(), ["voxels/textures/stone.png".to_string()]);
    }
}
