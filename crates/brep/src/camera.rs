//! First-person fly camera
//!
//! Controls (driven through [`InputState`]):
//! - W/S: Move along the view direction
//! - A/D: Strafe
//! - Space/Shift: Move straight up/down
//! - Mouse drag with look held: Yaw and pitch
//!
//! The camera also turns cursor positions into world-space picking rays.

use brep_config::CameraConfig;
use glam::{Mat4, Vec2, Vec3};

use crate::edit::InputState;
use crate::raycast::Ray;

/// Pitch limit in degrees, keeps the view from flipping over the poles
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Yaw/pitch camera with cached basis vectors
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Rotation around +Y in radians; 0 looks down +X
    pub yaw: f32,
    /// Elevation in radians, clamped to +-89 degrees
    pub pitch: f32,
    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Default for FlyCamera {
    fn default() -> Self {
        // Slightly above the floor, looking down -Z
        Self::new(Vec3::new(0.0, 2.0, 6.0), -std::f32::consts::FRAC_PI_2, 0.0)
    }
}

impl FlyCamera {
    /// Create a camera and derive its basis vectors
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: 0.0,
            right: Vec3::X,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        };
        camera.rotate(0.0, pitch);
        camera.recompute_direction_vectors();
        camera
    }

    /// Move along the view direction
    pub fn move_straight(&mut self, distance: f32) {
        self.position += distance * self.forward;
    }

    /// Move along world +Y
    pub fn move_vertically(&mut self, distance: f32) {
        self.position.y += distance;
    }

    /// Move along the right vector
    pub fn strafe(&mut self, distance: f32) {
        self.position += distance * self.right;
    }

    /// Add to yaw and pitch. Basis vectors are not refreshed until
    /// [`FlyCamera::recompute_direction_vectors`] runs.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let max_pitch = MAX_PITCH_DEGREES.to_radians();
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-max_pitch, max_pitch);
    }

    /// Rebuild forward/right/up from yaw and pitch
    pub fn recompute_direction_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();

        self.forward = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos);
        self.right = Vec3::new(-yaw_sin, 0.0, yaw_cos);
        self.up = self.right.cross(self.forward);
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// OpenGL-style perspective projection for the given aspect ratio
    pub fn projection_matrix(config: &CameraConfig, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            config.fov_degrees.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        )
    }

    /// Apply one frame of movement and mouse look.
    pub fn apply_input(&mut self, input: &InputState, dt: f32, config: &CameraConfig) {
        let step = config.move_speed * dt;
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };

        if input.look_held {
            self.rotate(
                input.mouse_delta.x * config.look_sensitivity,
                -input.mouse_delta.y * config.look_sensitivity,
            );
            self.recompute_direction_vectors();
        }

        self.move_straight(axis(input.move_forward, input.move_backward) * step);
        self.strafe(axis(input.move_right, input.move_left) * step);
        self.move_vertically(axis(input.move_up, input.move_down) * step);
    }

    /// Ray from the camera through a cursor position.
    ///
    /// `cursor` is in window pixels with the origin at the top-left corner.
    /// The ray starts at the camera position; its direction is unit length.
    pub fn viewport_ray(&self, cursor: Vec2, viewport_size: Vec2, projection: Mat4) -> Ray {
        let ndc = Vec2::new(
            2.0 * cursor.x / viewport_size.x - 1.0,
            1.0 - 2.0 * cursor.y / viewport_size.y,
        );
        let inverse = (projection * self.view_matrix()).inverse();
        let far_point = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position, far_point - self.position)
    }
}
