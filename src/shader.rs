//! The WGSL program and the interface data a host needs to run it.
//!
//! The crate never touches a GPU device itself; a host compiles
//! [`SOURCE`], binds one 64-byte camera uniform at group 0 / binding 0 and
//! issues a three-vertex draw. Everything here is declarative.

use std::num::NonZeroU64;

use crate::camera::CameraUniform;

/// Complete shader program: procedural triangle, camera projection,
/// per-vertex debug colors interpolated across the surface.
pub const SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

struct VsOutput {
    @builtin(position) position: vec4<f32>,
    @location(1) color: vec4<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VsOutput {
    var out: VsOutput;
    let x = f32(i32(vertex_index) - 1);
    let y = f32(i32(vertex_index & 1u) * 2 - 1);
    out.position = camera.view_proj * vec4<f32>(x, y, 0.0, 1.0);
    out.color = vec4<f32>(
        f32(vertex_index % 3u),
        f32((vertex_index + 1u) % 3u),
        f32((vertex_index + 2u) % 3u),
        1.0,
    );
    return out;
}

@fragment
fn fs_main(in: VsOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub const VS_ENTRY_POINT: &str = "vs_main";
pub const FS_ENTRY_POINT: &str = "fs_main";

/// Bind group slot holding the camera uniform.
pub const CAMERA_BIND_GROUP: u32 = 0;
/// Binding slot of the camera uniform within its group.
pub const CAMERA_BINDING: u32 = 0;

/// Number of vertices the host must draw for one triangle.
pub const VERTEX_COUNT: u32 = 3;

/// Layout entry for the camera uniform, ready for a bind group layout.
pub fn camera_bind_group_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: CAMERA_BINDING,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(NonZeroU64::new(CameraUniform::SIZE as u64).unwrap()),
        },
        count: None,
    }
}

/// Labelled module descriptor wrapping [`SOURCE`].
pub fn shader_module_descriptor() -> wgpu::ShaderModuleDescriptor<'static> {
    wgpu::ShaderModuleDescriptor {
        label: Some("camera-triangle-shader"),
        source: wgpu::ShaderSource::Wgsl(SOURCE.into()),
    }
}
