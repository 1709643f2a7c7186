//! Orbit camera with a constrained vertical angle and no panning.

use glam::{Mat4, Vec3};
use std::f32::consts::PI;

use crate::config::CameraConfig;

/// Polar angle clamp, measured from the +Y axis. Keeps the view near the
/// horizon so the camera can neither go overhead nor under the ground.
pub const MIN_POLAR: f32 = PI / 2.5;
pub const MAX_POLAR: f32 = PI / 1.8;

/// Vertical field of view (50 degrees).
pub const FOV_Y: f32 = 50.0 * PI / 180.0;

/// Orbit camera state: spherical coordinates around a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Azimuth around the Y axis, radians.
    azimuth: f32,
    /// Polar angle from +Y, clamped to [MIN_POLAR, MAX_POLAR].
    polar: f32,
    /// Distance from the target, clamped to the configured zoom range.
    radius: f32,
    zoom_min: f32,
    zoom_max: f32,
    sensitivity: f32,
    target: Vec3,
}

impl OrbitCamera {
    /// Camera looking at the origin from (0, 0, radius).
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            azimuth: 0.0,
            polar: PI / 2.0,
            radius: config.initial_radius,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            sensitivity: config.orbit_sensitivity,
            target: Vec3::ZERO,
        }
    }

    /// Rotate by a drag delta in pixels. The polar angle stays clamped;
    /// there is intentionally no pan operation.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.polar = (self.polar - dy * self.sensitivity).clamp(MIN_POLAR, MAX_POLAR);
    }

    /// Zoom by a scroll delta (positive = toward the avatar).
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta * 0.01 * self.radius).clamp(self.zoom_min, self.zoom_max);
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.radius
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, aspect, 0.1, 100.0)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> OrbitCamera {
        OrbitCamera::new(&CameraConfig::default())
    }

    #[test]
    fn test_initial_eye_in_front() {
        let cam = test_camera();
        let eye = cam.eye();
        assert!((eye - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-5, "{:?}", eye);
    }

    #[test]
    fn test_polar_stays_clamped() {
        let mut cam = test_camera();
        // Drag far upward and downward
        cam.rotate(0.0, 1e5);
        assert!(cam.polar() >= MIN_POLAR - 1e-6);
        cam.rotate(0.0, -1e5);
        assert!(cam.polar() <= MAX_POLAR + 1e-6);
    }

    #[test]
    fn test_zoom_stays_clamped() {
        let mut cam = test_camera();
        for _ in 0..1000 {
            cam.zoom(100.0);
        }
        assert!(cam.radius() >= 3.0 - 1e-6);

        for _ in 0..1000 {
            cam.zoom(-100.0);
        }
        assert!(cam.radius() <= 12.0 + 1e-6);
    }

    #[test]
    fn test_rotation_preserves_distance() {
        let mut cam = test_camera();
        cam.rotate(120.0, 35.0);
        assert!((cam.eye().length() - cam.radius()).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_looks_at_target() {
        let mut cam = test_camera();
        cam.rotate(200.0, -40.0);
        let view = cam.view_matrix();
        // The target must land on the view-space -Z axis
        let target_view = view.transform_point3(Vec3::ZERO);
        assert!(target_view.x.abs() < 1e-4);
        assert!(target_view.y.abs() < 1e-4);
        assert!(target_view.z < 0.0);
    }
}
