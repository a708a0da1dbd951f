//! Orbit camera over the meadow.

use glam::{Mat4, Vec3};

/// Wide field of view, matching the low, close-in framing of the scene.
const FOV_Y_DEGREES: f32 = 90.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Orbit camera: yaw/pitch/distance around a target point.
///
/// The default pose looks across the field from just above the blade tips,
/// with the horizon high in the frame.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    /// Create a camera with the default meadow framing.
    pub fn new() -> Self {
        Self {
            yaw: -0.46,
            pitch: -0.09,
            distance: 11.2,
            target: Vec3::new(0.0, 5.0, 0.0),
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// View matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Projection matrix for the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Apply a mouse-drag orbit delta.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Apply a scroll-wheel zoom delta.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.3).clamp(0.5, 40.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
