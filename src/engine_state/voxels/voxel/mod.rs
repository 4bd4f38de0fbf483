//! # Voxel Module
//!
//! Immutable voxel definitions and the registry that maps packed voxel ids to them.
//!
//! Definitions are data-driven: the registry is built from a JSON list such as
//!
//! ```json
//! [
//!     { "id": 1, "name": "stone", "solid": true, "texture": "stone" },
//!     { "id": 2, "name": "grass", "solid": true, "texture": "dirt",
//!       "sides": { "top": { "name": "grass_top", "color": [0.5, 0.8, 0.3, 1.0] } } },
//!     { "id": 3, "name": "water", "solid": false, "texture": "water",
//!       "color": [0.2, 0.4, 1.0, 0.5] }
//! ]
//! ```

use serde::Deserialize;

use crate::error::RegistryError;

use super::voxel_format::{self, VoxelWord};

pub mod voxel_side;

use voxel_side::VoxelSide;

/// Name of the voxel that is opaque for meshing even though it is not solid.
pub const WATER: &str = "water";

/// Name given to the implicit id 0 definition.
pub const AIR: &str = "air";

/// The texture descriptor of one voxel side.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VoxelTexture {
    /// Texture name, resolved as `voxels/textures/<name>.png`
    pub name: String,
    /// Optional RGBA tint. An alpha below 1 marks the surface translucent.
    #[serde(default)]
    pub color: Option<[f32; 4]>,
}

impl VoxelTexture {
    /// Resource path used to look the texture up in the virtual atlas.
    pub fn resource_path(&self) -> String {
        format!("voxels/textures/{}.png", self.name)
    }
}

/// An immutable voxel definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Voxel {
    /// Id stored in the low bits of packed voxel words
    pub id: u16,
    /// Unique name
    pub name: String,
    /// Whether the voxel is solid
    pub solid: bool,
    /// Texture descriptors indexed by `VoxelSide`
    pub textures: [VoxelTexture; 6],
}

impl Voxel {
    /// The implicit air definition.
    pub fn air() -> Self {
        let texture = VoxelTexture {
            name: AIR.to_string(),
            color: None,
        };
        Voxel {
            id: 0,
            name: AIR.to_string(),
            solid: false,
            textures: std::array::from_fn(|_| texture.clone()),
        }
    }

    /// Whether faces against this voxel are hidden.
    ///
    /// Water counts as opaque here even though it renders translucent.
    pub fn is_opaque(&self) -> bool {
        self.solid || self.name == WATER
    }

    /// Texture descriptor for one side.
    pub fn texture(&self, side: VoxelSide) -> &VoxelTexture {
        &self.textures[side as usize]
    }
}

#[derive(Deserialize)]
struct VoxelDefinition {
    id: u16,
    name: String,
    #[serde(default)]
    solid: bool,
    texture: Option<String>,
    #[serde(default)]
    color: Option<[f32; 4]>,
    #[serde(default)]
    sides: SideOverrides,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SideOverrides {
    left: Option<VoxelTexture>,
    front: Option<VoxelTexture>,
    right: Option<VoxelTexture>,
    back: Option<VoxelTexture>,
    top: Option<VoxelTexture>,
    bottom: Option<VoxelTexture>,
}

impl SideOverrides {
    fn take(&mut self, side: VoxelSide) -> Option<VoxelTexture> {
        match side {
            VoxelSide::LEFT => self.left.take(),
            VoxelSide::FRONT => self.front.take(),
            VoxelSide::RIGHT => self.right.take(),
            VoxelSide::BACK => self.back.take(),
            VoxelSide::TOP => self.top.take(),
            VoxelSide::BOTTOM => self.bottom.take(),
        }
    }
}

impl VoxelDefinition {
    fn into_voxel(self) -> Voxel {
        let default_texture = VoxelTexture {
            name: self.texture.unwrap_or_else(|| self.name.clone()),
            color: self.color,
        };
        let mut sides = self.sides;
        let textures = VoxelSide::all().map(|side| {
            sides
                .take(side)
                .unwrap_or_else(|| default_texture.clone())
        });

        Voxel {
            id: self.id,
            name: self.name,
            solid: self.solid,
            textures,
        }
    }
}

/// Lookup table from voxel id to definition.
///
/// Id 0 is always air. Ids without a definition are treated like air by
/// [`VoxelRegistry::is_opaque`].
#[derive(Debug)]
pub struct VoxelRegistry {
    voxels: Vec<Option<Voxel>>,
}

impl Default for VoxelRegistry {
    fn default() -> Self {
        VoxelRegistry {
            voxels: vec![Some(Voxel::air())],
        }
    }
}

impl VoxelRegistry {
    /// Creates a registry holding only air.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a JSON array of definitions.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<VoxelDefinition> = serde_json::from_str(json)?;
        let mut registry = VoxelRegistry::new();
        for definition in definitions {
            registry.register(definition.into_voxel())?;
        }
        log::info!("Loaded {} voxel definitions", registry.len());
        Ok(registry)
    }

    /// Adds a definition.
    pub fn register(&mut self, voxel: Voxel) -> Result<(), RegistryError> {
        if voxel.id == 0 {
            return Err(RegistryError::ReservedId(voxel.name));
        }
        let index = voxel.id as usize;
        if index >= self.voxels.len() {
            self.voxels.resize(index + 1, None);
        }
        if self.voxels[index].is_some() {
            return Err(RegistryError::DuplicateId(voxel.id));
        }
        self.voxels[index] = Some(voxel);
        Ok(())
    }

    /// Number of definitions, air included.
    pub fn len(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_some()).count()
    }

    /// Always false: air is always registered.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Looks a definition up by id.
    pub fn get_voxel_for_id(&self, id: u16) -> Option<&Voxel> {
        self.voxels.get(id as usize).and_then(Option::as_ref)
    }

    /// Looks the definition of a packed word up.
    pub fn get_voxel_for_word(&self, data: VoxelWord) -> Option<&Voxel> {
        self.get_voxel_for_id(voxel_format::id(data))
    }

    /// Looks a definition up by name.
    pub fn get_voxel_by_name(&self, name: &str) -> Option<&Voxel> {
        self.voxels.iter().flatten().find(|v| v.name == name)
    }

    /// Whether a packed word hides the faces next to it.
    pub fn is_opaque(&self, data: VoxelWord) -> bool {
        if data == 0 {
            return false;
        }
        self.get_voxel_for_word(data)
            .map(Voxel::is_opaque)
            .unwrap_or(false)
    }
}
