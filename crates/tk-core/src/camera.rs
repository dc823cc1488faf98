//! Orbit camera for the layout viewport
//!
//! Y is up and the array lies in the XZ plane. The camera owns no GPU state;
//! the renderer builds its uniform from the matrices exposed here.

use glam::{Mat4, Vec2, Vec3};

use crate::math::{BoundingBox, Ray};

/// Orbit camera
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    // Orbit state
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl Camera {
    /// Camera looking at the origin from the front-right, slightly above
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0_f32.to_radians(),
            aspect,
            near: 1.0,
            far: 100000.0,
            yaw: 45.0_f32.to_radians(),
            pitch: 35.0_f32.to_radians(),
            distance: 600.0,
        };
        camera.update_position_from_orbit();
        camera
    }

    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch =
            (self.pitch + delta_pitch).clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.update_position_from_orbit();
    }

    /// Move the target in the view plane
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = self.view_direction();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        let scale = self.distance * 0.002;
        self.target += right * (-delta_x * scale) + up * (delta_y * scale);
        self.update_position_from_orbit();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(10.0, 50000.0);
        self.update_position_from_orbit();
    }

    fn update_position_from_orbit(&mut self) {
        let horizontal = self.distance * self.pitch.cos();
        let offset = Vec3::new(
            horizontal * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            horizontal * self.yaw.cos(),
        );
        self.position = self.target + offset;
    }

    /// Frame the given bounds
    pub fn fit_bounds(&mut self, bounds: &BoundingBox) {
        if !bounds.is_valid() {
            return;
        }
        self.target = bounds.center();
        let half_fov = self.fov * 0.5;
        self.distance = (bounds.radius() / half_fov.sin()).max(50.0);
        self.update_position_from_orbit();
    }

    pub fn set_top_view(&mut self) {
        self.yaw = 0.0;
        self.pitch = 89.0_f32.to_radians();
        self.update_position_from_orbit();
    }

    /// Unit vector from the eye toward the target
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World ray through a pixel. Screen origin is the top-left corner.
    pub fn screen_to_ray(&self, screen: Vec2, viewport: Vec2) -> Ray {
        let ndc_x = (2.0 * screen.x / viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / viewport.y);

        // Build the direction from the camera basis rather than inverting the
        // projection, which loses precision with a far plane this distant
        let forward = self.view_direction();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction = forward + right * (ndc_x * half_width) + up * (ndc_y * half_height);
        Ray::new(self.position, direction)
    }

    /// Pixel position of a world point, or `None` when it is behind the eye
    pub fn world_to_screen(&self, world: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}
