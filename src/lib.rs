//! Camera-triangle shader program, packaged for hosts and for tests.
//!
//! The crate carries the WGSL program that derives a triangle's vertices
//! and debug colors from the vertex index, the camera that produces its
//! view-projection uniform, and a CPU reference implementation of both
//! shader stages plus the fixed-function interpolation between them.  GPU
//! pipeline setup, surfaces and draw submission are intentionally left to
//! the embedding host so that the code remains testable and easy to embed
//! in headless tools.

pub mod camera;
pub mod config;
pub mod raster;
pub mod shader;
pub mod stage;

pub use camera::{Camera, CameraUniform};
pub use config::{CameraConfig, ConfigError};
pub use raster::{barycentric_weights, draw_triangle, interpolate_color, Framebuffer};
pub use stage::{fragment_stage, local_position, vertex_color, vertex_stage, VsOutput};
