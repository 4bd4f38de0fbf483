//! # Voxel Side Module
//!
//! The six axis-aligned faces of a voxel, with their neighbor offsets and normals.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel.
///
/// The discriminant indexes per-side tables such as a voxel's texture descriptors.
/// The order is: [LEFT, FRONT, RIGHT, BACK, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelSide {
    /// The left face (facing negative X)
    LEFT = 0,

    /// The front face (facing positive Z)
    FRONT = 1,

    /// The right face (facing positive X)
    RIGHT = 2,

    /// The back face (facing negative Z)
    BACK = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

impl VoxelSide {
    /// Returns an array containing all six voxel faces in discriminant order.
    ///
    /// This is the order of per-side tables. The mesher uses
    /// [`VoxelSide::MESHING_ORDER`] instead.
    ///
    /// # Returns
    /// An array containing all `VoxelSide` variants.
    pub fn all() -> [VoxelSide; 6] {
        [
            VoxelSide::LEFT,
            VoxelSide::FRONT,
            VoxelSide::RIGHT,
            VoxelSide::BACK,
            VoxelSide::TOP,
            VoxelSide::BOTTOM,
        ]
    }

    /// The order in which the mesher visits the faces of one voxel.
    ///
    /// The dithering noise is drawn once per emitted face, so this order is part of
    /// what makes a rebuild reproduce the same bytes.
    pub const MESHING_ORDER: [VoxelSide; 6] = [
        VoxelSide::BOTTOM,
        VoxelSide::TOP,
        VoxelSide::LEFT,
        VoxelSide::RIGHT,
        VoxelSide::BACK,
        VoxelSide::FRONT,
    ];

    /// Offset from a voxel to its neighbor across this face.
    ///
    /// Used by the face culler to find the word a face is tested against.
    ///
    /// # Returns
    /// A unit vector along one axis, pointing out of the voxel.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            VoxelSide::LEFT => Vector3::new(-1, 0, 0),
            VoxelSide::RIGHT => Vector3::new(1, 0, 0),
            VoxelSide::BOTTOM => Vector3::new(0, -1, 0),
            VoxelSide::TOP => Vector3::new(0, 1, 0),
            VoxelSide::BACK => Vector3::new(0, 0, -1),
            VoxelSide::FRONT => Vector3::new(0, 0, 1),
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        self.offset().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }

    /// The face on the other side of the voxel.
    ///
    /// # Returns
    /// The side whose offset cancels this side's offset.
    pub fn opposite(self) -> VoxelSide {
        match self {
            VoxelSide::LEFT => VoxelSide::RIGHT,
            VoxelSide::RIGHT => VoxelSide::LEFT,
            VoxelSide::BOTTOM => VoxelSide::TOP,
            VoxelSide::TOP => VoxelSide::BOTTOM,
            VoxelSide::BACK => VoxelSide::FRONT,
            VoxelSide::FRONT => VoxelSide::BACK,
        }
    }
}
