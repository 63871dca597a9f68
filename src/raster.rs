//! Software emulation of the fixed-function path between the two shader
//! stages: perspective divide, viewport mapping, coverage and barycentric
//! interpolation. This is what makes the interpolation contract observable
//! without a GPU.

use std::path::Path;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3, Vec4};
use log::debug;

use crate::camera::CameraUniform;
use crate::stage::{fragment_stage, vertex_stage, VsOutput};

/// Linear RGBA render target.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Framebuffer {
    /// Creates a framebuffer filled with the clear color. Zero dimensions
    /// are clamped to one pixel.
    pub fn new(width: u32, height: u32, clear: Vec4) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![clear; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the color stored at the pixel, row 0 at the top.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Vec4) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Converts the linear float pixels to 8-bit RGBA, clamping to 0..1.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            for channel in [pixel.x, pixel.y, pixel.z, pixel.w] {
                bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        bytes
    }

    /// Writes the framebuffer contents as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .context("framebuffer dimensions do not match pixel data")?;
        image
            .save(path)
            .with_context(|| format!("unable to write {}", path.display()))?;
        Ok(())
    }
}

fn edge(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    (b.x - a.x) * (point.y - a.y) - (b.y - a.y) * (point.x - a.x)
}

/// Barycentric weights of `point` with respect to `triangle`, or `None`
/// when the point lies outside or the triangle is degenerate. Weights are
/// normalized by the signed area, so both windings are accepted.
pub fn barycentric_weights(point: Vec2, triangle: [Vec2; 3]) -> Option<Vec3> {
    let area = edge(triangle[0], triangle[1], triangle[2]);
    if area == 0.0 {
        return None;
    }
    let w0 = edge(triangle[1], triangle[2], point) / area;
    let w1 = edge(triangle[2], triangle[0], point) / area;
    let w2 = edge(triangle[0], triangle[1], point) / area;
    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
        Some(Vec3::new(w0, w1, w2))
    } else {
        None
    }
}

/// The linear blend the hardware performs on per-vertex outputs.
pub fn interpolate_color(weights: Vec3, colors: [Vec4; 3]) -> Vec4 {
    colors[0] * weights.x + colors[1] * weights.y + colors[2] * weights.z
}

/// Maps a clip-space position to pixel coordinates, row 0 at the top.
fn viewport_map(clip: Vec4, width: u32, height: u32) -> Vec2 {
    let ndc = clip / clip.w;
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * width as f32,
        (1.0 - (ndc.y * 0.5 + 0.5)) * height as f32,
    )
}

/// Draws the procedural triangle into the framebuffer.
///
/// Runs the vertex stage for indices 0..3, maps to pixels, and writes the
/// fragment stage output for every covered pixel center. Triangles with a
/// vertex at w <= 0 are skipped; there is no clipping path.
pub fn draw_triangle(framebuffer: &mut Framebuffer, camera: &CameraUniform) {
    let outputs: [VsOutput; 3] = [0, 1, 2].map(|index| vertex_stage(index, camera));
    if outputs.iter().any(|out| out.position.w <= 0.0) {
        debug!("triangle crosses the w = 0 plane, skipping draw");
        return;
    }

    let width = framebuffer.width();
    let height = framebuffer.height();
    let screen = outputs.map(|out| viewport_map(out.position, width, height));
    let colors = outputs.map(|out| out.color);

    let min_x = screen.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let max_x = screen.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
    let min_y = screen.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = screen.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

    let x_start = min_x.floor().max(0.0) as u32;
    let x_end = (max_x.ceil().max(0.0) as u32).min(width);
    let y_start = min_y.floor().max(0.0) as u32;
    let y_end = (max_y.ceil().max(0.0) as u32).min(height);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if let Some(weights) = barycentric_weights(center, screen) {
                let color = fragment_stage(interpolate_color(weights, colors));
                framebuffer.set_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::stage::vertex_color;

    const CLEAR: Vec4 = Vec4::ZERO;

    fn unit_triangle() -> [Vec2; 3] {
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn weights_are_exact_at_the_vertices() {
        let triangle = unit_triangle();
        assert_eq!(
            barycentric_weights(triangle[0], triangle),
            Some(Vec3::new(1.0, 0.0, 0.0))
        );
        assert_eq!(
            barycentric_weights(triangle[1], triangle),
            Some(Vec3::new(0.0, 1.0, 0.0))
        );
        assert_eq!(
            barycentric_weights(triangle[2], triangle),
            Some(Vec3::new(0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn weights_reject_outside_points_and_degenerate_triangles() {
        let triangle = unit_triangle();
        assert_eq!(barycentric_weights(Vec2::new(4.0, 4.0), triangle), None);

        let line = [Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        assert_eq!(barycentric_weights(Vec2::new(1.0, 1.0), line), None);
    }

    #[test]
    fn interpolation_blends_interior_points() {
        let triangle = unit_triangle();
        let colors = [vertex_color(0), vertex_color(1), vertex_color(2)];

        let centroid = (triangle[0] + triangle[1] + triangle[2]) / 3.0;
        let weights = barycentric_weights(centroid, triangle).unwrap();
        let blended = interpolate_color(weights, colors);
        for channel in [blended.x, blended.y, blended.z] {
            assert_relative_eq!(channel, 1.0, max_relative = 1e-5);
        }
        assert_relative_eq!(blended.w, 1.0, max_relative = 1e-6);

        // Exactly a vertex color when the full weight sits on that vertex.
        assert_eq!(
            interpolate_color(Vec3::new(0.0, 1.0, 0.0), colors),
            vertex_color(1)
        );
    }

    #[test]
    fn identity_camera_renders_white_centroid() {
        let mut framebuffer = Framebuffer::new(64, 64, CLEAR);
        draw_triangle(&mut framebuffer, &CameraUniform::IDENTITY);

        // Clip-space centroid (0, -1/3) lands at pixel column 32, row 42.
        let sample = framebuffer.pixel(32, 42).unwrap();
        for channel in [sample.x, sample.y, sample.z] {
            assert_relative_eq!(channel, 1.0, max_relative = 0.1);
        }
        assert_eq!(sample.w, 1.0);

        // Outside the triangle the clear color survives.
        assert_eq!(framebuffer.pixel(1, 1), Some(CLEAR));
    }

    #[test]
    fn vertex_behind_the_camera_skips_the_draw() {
        let behind = CameraUniform::from_mat4(glam::Mat4::from_cols_array_2d(&[
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, -1.0],
        ]));
        let mut framebuffer = Framebuffer::new(8, 8, CLEAR);
        draw_triangle(&mut framebuffer, &behind);
        assert_eq!(framebuffer.pixel(4, 4), Some(CLEAR));
    }

    #[test]
    fn rgba8_conversion_clamps_debug_colors() {
        let framebuffer = Framebuffer::new(1, 1, Vec4::new(2.0, -1.0, 0.5, 1.0));
        assert_eq!(framebuffer.to_rgba8(), vec![255, 0, 128, 255]);
    }
}
