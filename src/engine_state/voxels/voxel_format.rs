//! # Voxel Format
//!
//! Packing and unpacking of the 32-bit voxel data words stored in chunks.
//!
//! ## Layout
//!
//! | bits    | field      |
//! |---------|------------|
//! | 0..16   | voxel id   |
//! | 16..24  | metadata   |
//! | 24..28  | sunlight   |
//! | 28..32  | block light|
//!
//! A word of `0` is air. Air is never opaque, whatever its light values.

/// A packed voxel data word.
pub type VoxelWord = u32;

/// The word returned for positions whose chunk is not loaded.
pub const UNLOADED: VoxelWord = 0;

/// Highest light level a voxel can carry.
pub const MAX_LIGHT: u8 = 15;

const ID_MASK: u32 = 0x0000_FFFF;
const META_SHIFT: u32 = 16;
const META_MASK: u32 = 0xFF;
const SUNLIGHT_SHIFT: u32 = 24;
const BLOCKLIGHT_SHIFT: u32 = 28;
const LIGHT_MASK: u32 = 0xF;

/// Extracts the voxel id.
#[inline]
pub fn id(data: VoxelWord) -> u16 {
    (data & ID_MASK) as u16
}

/// Extracts the metadata byte.
#[inline]
pub fn meta(data: VoxelWord) -> u8 {
    ((data >> META_SHIFT) & META_MASK) as u8
}

/// Extracts the sunlight level (0-15).
#[inline]
pub fn sunlight(data: VoxelWord) -> u8 {
    ((data >> SUNLIGHT_SHIFT) & LIGHT_MASK) as u8
}

/// Extracts the block light level (0-15).
#[inline]
pub fn blocklight(data: VoxelWord) -> u8 {
    ((data >> BLOCKLIGHT_SHIFT) & LIGHT_MASK) as u8
}

/// Packs the fields into a word. Light levels above 15 are clamped.
#[inline]
pub fn format(id: u16, meta: u8, sunlight: u8, blocklight: u8) -> VoxelWord {
    (id as u32)
        | ((meta as u32) << META_SHIFT)
        | ((sunlight.min(MAX_LIGHT) as u32) << SUNLIGHT_SHIFT)
        | ((blocklight.min(MAX_LIGHT) as u32) << BLOCKLIGHT_SHIFT)
}
