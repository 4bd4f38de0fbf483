//! Corner positions, texture coordinates and normals of the unit cube's faces.
//!
//! Corners are listed counter-clockwise as seen from outside the cube, so a face
//! draws as the triangles (0, 1, 2) and (0, 2, 3).

use crate::engine_state::voxels::voxel::voxel_side::VoxelSide;

/// Per-face geometry of the unit cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeFaceData {
    /// Corner offsets and their texture coordinates
    pub vertices: [([f32; 3], [f32; 2]); 4],
    /// Outward normal
    pub normal: [f32; 3],
}

const TEXCOORDS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

const fn face(corners: [[f32; 3]; 4], normal: [f32; 3]) -> CubeFaceData {
    CubeFaceData {
        vertices: [
            (corners[0], TEXCOORDS[0]),
            (corners[1], TEXCOORDS[1]),
            (corners[2], TEXCOORDS[2]),
            (corners[3], TEXCOORDS[3]),
        ],
        normal,
    }
}

/// Face facing +Y.
pub static TOP_FACE: CubeFaceData = face(
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    [0.0, 1.0, 0.0],
);

/// Face facing -Y.
pub static BOTTOM_FACE: CubeFaceData = face(
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    [0.0, -1.0, 0.0],
);

/// Face facing -X.
pub static LEFT_FACE: CubeFaceData = face(
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    [-1.0, 0.0, 0.0],
);

/// Face facing +X.
pub static RIGHT_FACE: CubeFaceData = face(
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    [1.0, 0.0, 0.0],
);

/// Face facing +Z.
pub static FRONT_FACE: CubeFaceData = face(
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    [0.0, 0.0, 1.0],
);

/// Face facing -Z.
pub static BACK_FACE: CubeFaceData = face(
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    [0.0, 0.0, -1.0],
);

/// Geometry of the face on the given side.
pub fn face_data(side: VoxelSide) -> &'static CubeFaceData {
    match side {
        VoxelSide::TOP => &TOP_FACE,
        VoxelSide::BOTTOM => &BOTTOM_FACE,
        VoxelSide::LEFT => &LEFT_FACE,
        VoxelSide::RIGHT => &RIGHT_FACE,
        VoxelSide::FRONT => &FRONT_FACE,
        VoxelSide::BACK => &BACK_FACE,
    }
}
