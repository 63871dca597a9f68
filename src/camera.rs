use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// View-projection matrix in the exact layout the shader's uniform expects.
///
/// 64 bytes of column-major 32-bit floats, bound at group 0 / binding 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Size of the uniform in bytes, matching the host-side binding layout.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub const IDENTITY: Self = Self {
        view_proj: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_mat4(matrix: Mat4) -> Self {
        Self {
            view_proj: matrix.to_cols_array_2d(),
        }
    }

    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Perspective camera producing the shader's view-projection uniform.
///
/// Left-handed conventions throughout: the view matrix looks from the
/// position along the direction vector, and the projection maps onto the
/// 0..1 depth range. A `None` far plane selects an infinite projection.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    direction: Vec3,
    up_axis: Vec3,
    up: Vec3,
    aspect: f32,
    fov: f32,
    near: f32,
    far: Option<f32>,
    dirty: bool,
    uniform: CameraUniform,
}

impl Camera {
    pub fn new(
        position: Vec3,
        direction: Vec3,
        fov_degrees: f32,
        near: f32,
        far: Option<f32>,
        aspect: f32,
        up_axis: Vec3,
    ) -> Self {
        let right = up_axis.cross(direction);
        Self {
            position,
            direction,
            up_axis,
            up: direction.cross(right),
            aspect,
            fov: fov_degrees.to_radians(),
            near,
            far,
            dirty: true,
            uniform: CameraUniform::IDENTITY,
        }
    }

    /// Recomputes the cached uniform if any setter changed the camera.
    pub fn update(&mut self) {
        if !self.dirty {
            return;
        }

        let view = Mat4::look_at_lh(self.position, self.position + self.direction, self.up);
        let projection = match self.far {
            Some(far) => Mat4::perspective_lh(self.fov, self.aspect, self.near, far),
            None => Mat4::perspective_infinite_lh(self.fov, self.aspect, self.near),
        };

        self.uniform = CameraUniform::from_mat4(projection * view);
        self.dirty = false;
    }

    /// Returns the uniform produced by the last `update` call.
    pub fn uniform(&self) -> CameraUniform {
        self.uniform
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_position(&mut self, position: Vec3) {
        if self.position == position {
            return;
        }
        self.position = position;
        self.dirty = true;
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        if self.direction == direction {
            return;
        }
        self.direction = direction;
        let right = self.up_axis.cross(self.direction);
        self.up = self.direction.cross(right);
        self.dirty = true;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if self.aspect == aspect {
            return;
        }
        self.aspect = aspect;
        self.dirty = true;
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        let fov = fov_degrees.to_radians();
        if self.fov == fov {
            return;
        }
        self.fov = fov;
        self.dirty = true;
    }

    pub fn set_near(&mut self, near: f32) {
        if self.near == near {
            return;
        }
        self.near = near;
        self.dirty = true;
    }

    pub fn set_far(&mut self, far: Option<f32>) {
        if self.far == far {
            return;
        }
        self.far = far;
        self.dirty = true;
    }

    /// Points the camera using yaw and pitch angles in degrees.
    pub fn set_rotation_euler(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        let yaw = yaw_degrees.to_radians();
        let pitch = pitch_degrees.to_radians();
        self.direction = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        let right = self.up_axis.cross(self.direction);
        self.up = self.direction.cross(right);
        self.dirty = true;
    }

    pub fn yaw(&self) -> f32 {
        self.direction.z.atan2(self.direction.x).to_degrees()
    }

    pub fn pitch(&self) -> f32 {
        self.direction.y.asin().to_degrees()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn up_axis(&self) -> Vec3 {
        self.up_axis
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> Option<f32> {
        self.far
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 1.0),
            70.0,
            0.01,
            Some(1000.0),
            16.0 / 9.0,
            Vec3::Y,
        )
    }

    #[test]
    fn uniform_is_sixty_four_bytes() {
        assert_eq!(CameraUniform::SIZE, 64);
    }

    #[test]
    fn uniform_defaults_to_identity() {
        assert_eq!(CameraUniform::default().to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn uniform_round_trips_through_mat4() {
        let matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(CameraUniform::from_mat4(matrix).to_mat4(), matrix);
    }

    #[test]
    fn update_combines_projection_and_view() {
        let mut camera = test_camera();
        camera.update();

        let view = Mat4::look_at_lh(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::Y,
        );
        let projection =
            Mat4::perspective_lh(70.0f32.to_radians(), 16.0 / 9.0, 0.01, 1000.0);
        let expected = projection * view;

        let produced = camera.uniform().to_mat4().to_cols_array();
        for (lhs, rhs) in produced.into_iter().zip(expected.to_cols_array()) {
            assert_relative_eq!(lhs, rhs, max_relative = 1e-6);
        }
    }

    #[test]
    fn missing_far_plane_selects_infinite_projection() {
        let mut camera = test_camera();
        camera.set_far(None);
        camera.update();

        let view = Mat4::look_at_lh(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::Y,
        );
        let projection =
            Mat4::perspective_infinite_lh(70.0f32.to_radians(), 16.0 / 9.0, 0.01);
        assert_eq!(camera.uniform().to_mat4(), projection * view);
    }

    #[test]
    fn setters_only_dirty_on_change() {
        let mut camera = test_camera();
        camera.update();
        assert!(!camera.is_dirty());

        camera.set_position(camera.position());
        assert!(!camera.is_dirty());

        camera.set_position(Vec3::new(1.0, 0.0, -5.0));
        assert!(camera.is_dirty());
    }

    #[test]
    fn euler_rotation_round_trips() {
        let mut camera = test_camera();
        camera.set_rotation_euler(45.0, 30.0);
        assert_relative_eq!(camera.yaw(), 45.0, max_relative = 1e-5);
        assert_relative_eq!(camera.pitch(), 30.0, max_relative = 1e-5);
        assert_relative_eq!(camera.direction().length(), 1.0, max_relative = 1e-6);
    }
}
