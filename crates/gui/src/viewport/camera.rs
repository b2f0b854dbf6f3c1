use glam::{Mat4, Vec3, Vec4};

use super::picking::Ray;

/// Lowest pitch: the eye never goes below the print bed
const MIN_PITCH: f32 = 0.0;
/// Just short of straight down, where `look_at` with a Y up vector degenerates
const MAX_PITCH: f32 = 1.55;

/// Arc-ball camera for 3D viewport
#[derive(Debug, Clone, Copy)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl ArcBallCamera {
    pub fn new() -> Self {
        // Looking at the origin from (10, 10, 10)
        Self {
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: (1.0_f32 / 3.0_f32.sqrt()).asin(),
            distance: 300.0_f32.sqrt(),
            target: Vec3::ZERO,
            fov: 50.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(1.0, 100.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Orbit around a new target, keeping angles and distance
    pub fn focus(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Back to the initial view
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: [f32; 3], rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point[0], point[1], point[2], 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        let aspect = rect.width() / rect.height();

        // Screen → NDC
        let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

        // Inverse view-projection
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_ndc = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_ndc = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_world = vp_inv * near_ndc;
        let far_world = vp_inv * far_ndc;

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        let direction = (far - near).normalize_or_zero();

        Ray {
            origin: self.eye_position(),
            direction,
        }
    }
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn test_initial_eye() {
        let eye = ArcBallCamera::new().eye_position();
        assert!((eye - Vec3::splat(10.0)).length() < 1e-3, "{eye:?}");
    }

    #[test]
    fn test_pitch_stays_above_bed() {
        let mut camera = ArcBallCamera::new();
        camera.rotate(0.0, -500.0);
        assert_eq!(camera.pitch, MIN_PITCH);
        assert!(camera.eye_position().y >= -1e-5);
        camera.rotate(0.0, 500.0);
        assert_eq!(camera.pitch, MAX_PITCH);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = ArcBallCamera::new();
        let ray = camera.screen_ray(rect().center(), rect());
        let to_target = (camera.target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.9999);
    }

    #[test]
    fn test_project_target_to_center() {
        let mut camera = ArcBallCamera::new();
        camera.focus(Vec3::new(1.0, 2.0, 3.0));
        let p = camera.project([1.0, 2.0, 3.0], rect()).unwrap();
        assert!((p - rect().center()).length() < 0.01);

        camera.reset();
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
