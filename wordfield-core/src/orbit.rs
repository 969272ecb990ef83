/// Orbit camera controls
///
/// Orbits the camera around a target point with optional damping. Each
/// update re-derives the spherical offset from the camera's current
/// position, so a sketch that moves the camera itself stays in charge.

use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

use crate::projection::Camera;

const EPS: f32 = 1e-6;
const MOVE_EPS: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits around
    pub target: Point3<f32>,
    pub enabled: bool,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    // Pending motion
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vector3<f32>,
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        Self {
            target,
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vector3::zeros(),
        }
    }

    /// Swing the camera around the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle * self.rotate_speed;
    }

    /// Tilt the camera over the target
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle * self.rotate_speed;
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    pub fn dolly_in(&mut self) {
        self.scale *= self.zoom_scale();
    }

    pub fn dolly_out(&mut self) {
        self.scale /= self.zoom_scale();
    }

    /// Shift the target in the camera's screen plane
    pub fn pan(&mut self, right: f32, up: f32, camera: &Camera) {
        let forward = (camera.target - camera.position).normalize();
        let side = forward.cross(&camera.up);
        let side = if side.norm() < EPS { Vector3::x() } else { side.normalize() };
        let vertical = side.cross(&forward);
        self.pan_offset += side * right + vertical * up;
    }

    /// Apply pending motion to the camera. Returns `true` if it moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }

        let offset = camera.position - self.target;
        let radius = offset.norm();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius < EPS {
            PI / 2.0
        } else {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        };

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        theta += self.delta_theta * factor;
        phi += self.delta_phi * factor;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * factor;

        let sin_phi_radius = phi.sin() * radius;
        let new_offset = Vector3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );

        let new_position = self.target + new_offset;
        let moved = (new_position - camera.position).norm() > MOVE_EPS
            || (camera.target - self.target).norm() > MOVE_EPS;

        camera.position = new_position;
        camera.target = self.target;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vector3::zeros();
        }
        self.scale = 1.0;

        moved
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(x: f32, y: f32, z: f32) -> Camera {
        let mut camera = Camera::default();
        camera.set_position(x, y, z);
        camera
    }

    #[test]
    fn idle_update_keeps_camera_in_place() {
        let mut camera = camera_at(0.0, 12.0, -20.0);
        let mut controls = OrbitControls::default();
        assert!(!controls.update(&mut camera));
        assert_relative_eq!(camera.position, Point3::new(0.0, 12.0, -20.0), epsilon = 1e-4);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut camera = camera_at(10.0, 2.0, 7.5);
        let before = camera.distance();
        let mut controls = OrbitControls::default();
        controls.rotate_left(0.3);
        controls.rotate_up(0.1);
        assert!(controls.update(&mut camera));
        assert_relative_eq!(camera.distance(), before, epsilon = 1e-4);
    }

    #[test]
    fn damping_spreads_motion_over_updates() {
        let mut camera = camera_at(0.0, 0.0, 6.0);
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        controls.rotate_left(1.0);

        controls.update(&mut camera);
        let first = camera.position;
        controls.update(&mut camera);
        let second = camera.position;

        assert!((first - Point3::new(0.0, 0.0, 6.0)).norm() > 0.0);
        assert!((second - first).norm() > 0.0);
        // Later steps shrink
        assert!((second - first).norm() < (first - Point3::new(0.0, 0.0, 6.0)).norm());
    }

    #[test]
    fn dolly_changes_distance_within_limits() {
        let mut camera = camera_at(0.0, 0.0, 6.0);
        let mut controls = OrbitControls::default();
        controls.min_distance = 5.9;
        controls.dolly_in();
        controls.update(&mut camera);
        assert_relative_eq!(camera.distance(), 5.9, epsilon = 1e-4);

        controls.dolly_out();
        controls.update(&mut camera);
        assert!(camera.distance() > 5.9);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut camera = camera_at(0.0, 0.0, 6.0);
        let mut controls = OrbitControls::default();
        controls.pan(1.0, 0.5, &camera);
        assert!(controls.update(&mut camera));

        assert_relative_eq!(controls.target, Point3::new(1.0, 0.5, 0.0), epsilon = 1e-5);
        assert_relative_eq!(camera.target, controls.target, epsilon = 1e-5);
        assert_relative_eq!(camera.position, Point3::new(1.0, 0.5, 6.0), epsilon = 1e-4);
    }

    #[test]
    fn disabled_controls_do_nothing() {
        let mut camera = camera_at(0.0, 0.0, 6.0);
        let mut controls = OrbitControls::default();
        controls.enabled = false;
        controls.rotate_left(1.0);
        assert!(!controls.update(&mut camera));
        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, 6.0));
    }
}
