/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Perspective camera shared by every sketch
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 75.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Point3::new(x, y, z);
    }

    pub fn look_at(&mut self, x: f32, y: f32, z: f32) {
        self.target = Point3::new(x, y, z);
    }

    /// Update the aspect ratio after a viewport resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance between the camera and its look-at target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0 / 600.0)
    }
}

/// Project a world-space point to screen space through a view-projection matrix.
///
/// Returns `(x, y, depth)` with depth in normalized device units, or `None`
/// when the point is behind the camera or outside the near/far range.
/// Points left or right of the viewport are still returned so triangles
/// straddling the border can be clipped by the rasterizer.
pub fn project_to_screen(
    view_projection: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip: Vector4<f32> = view_projection * point.to_homogeneous();

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    if !(-1.0..=1.0).contains(&depth) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800.0 / 600.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_relative_eq!(camera.fov, 75.0_f32.to_radians());
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn resize_ignores_degenerate_aspect() {
        let mut camera = Camera::default();
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect, 2.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let mut camera = Camera::new(1.0);
        camera.set_position(0.0, 12.0, -20.0);
        camera.look_at(0.0, 0.0, 0.0);

        let vp = camera.view_projection();
        let (x, y, depth) = project_to_screen(&vp, &Point3::origin(), 80, 40).unwrap();
        assert_relative_eq!(x, 40.0, epsilon = 1e-3);
        assert_relative_eq!(y, 20.0, epsilon = 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn points_behind_camera_are_rejected() {
        let camera = Camera::default();
        let vp = camera.view_projection();
        assert!(project_to_screen(&vp, &Point3::new(0.0, 0.0, 10.0), 80, 40).is_none());
    }
}
