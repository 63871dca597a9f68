use glam::{Vec2, Vec4};

use crate::camera::CameraUniform;

/// Per-vertex record handed from the vertex stage to the fragment stage.
///
/// `position` is in clip space; `color` is interpolated across the
/// triangle before the fragment stage sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VsOutput {
    pub position: Vec4,
    pub color: Vec4,
}

/// Local-space position derived from the vertex index.
///
/// Indices 0, 1, 2 yield (-1, -1), (0, 1), (1, -1): x walks the index
/// offset by one, y flips on index parity.
pub fn local_position(vertex_index: u32) -> Vec2 {
    let x = (vertex_index as i32 - 1) as f32;
    let y = ((vertex_index as i32 & 1) * 2 - 1) as f32;
    Vec2::new(x, y)
}

/// Debug color for the vertex: each channel cycles through 0, 1, 2.
pub fn vertex_color(vertex_index: u32) -> Vec4 {
    Vec4::new(
        (vertex_index % 3) as f32,
        ((vertex_index + 1) % 3) as f32,
        ((vertex_index + 2) % 3) as f32,
        1.0,
    )
}

/// Vertex stage: derive the local position and color, then project into
/// clip space with the camera's view-projection matrix.
pub fn vertex_stage(vertex_index: u32, camera: &CameraUniform) -> VsOutput {
    let local = local_position(vertex_index);
    let position = camera.to_mat4() * Vec4::new(local.x, local.y, 0.0, 1.0);
    VsOutput {
        position,
        color: vertex_color(vertex_index),
    }
}

/// Fragment stage: emit the interpolated color unchanged.
pub fn fragment_stage(color: Vec4) -> Vec4 {
    color
}
