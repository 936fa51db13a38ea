//! Arc-ball camera and screen-ray construction.

use glam::{Mat4, Vec3, Vec4};

use super::intersect::GeomError;

/// A pick ray in world space: the unprojections of one screen position at
/// near (depth 0) and far (depth 1). Treated as an infinite line by the
/// intersection primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub near: Vec3,
    pub far: Vec3,
}

impl PickRay {
    /// Normalized near-to-far direction
    pub fn direction(&self) -> Vec3 {
        (self.far - self.near).normalize_or_zero()
    }
}

/// Arc-ball camera for the 3D viewport
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

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 6.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 100.0);
    }

    /// Slide the target within the view plane. Pixel deltas are scaled by
    /// the orbit distance so panning feels uniform at any zoom level.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let (right, up) = self.screen_basis();
        self.target += (right * dx + up * dy) * self.distance * 0.002;
    }

    /// Unit vector from the target towards the eye
    fn orbit_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        self.target + self.orbit_direction() * self.distance
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

    /// Screen-space right and up directions in world coordinates
    fn screen_basis(&self) -> (Vec3, Vec3) {
        let fwd = -self.orbit_direction();
        let right = fwd.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(fwd).normalize_or_zero();
        (right, up)
    }

    /// Project a 3D world point to screen coordinates within `rect`.
    /// Returns `None` for points at or behind the eye plane.
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let p = self.view_projection(aspect) * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some(egui::pos2(
            rect.center().x + ndc.x * rect.width() * 0.5,
            rect.center().y - ndc.y * rect.height() * 0.5,
        ))
    }

    /// Build the world-space pick ray for a screen position.
    ///
    /// The combined transform is rebuilt and inverted on every call because
    /// camera state is externally mutable; a singular matrix is a checked
    /// failure, not a panic.
    pub fn screen_ray(&self, pos: egui::Pos2, rect: egui::Rect) -> Result<PickRay, GeomError> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let det = vp.determinant();
        if !det.is_finite() || det.abs() < f32::EPSILON {
            tracing::warn!(det, "view-projection matrix is singular, dropping pick");
            return Err(GeomError::SingularTransform);
        }
        let inv = vp.inverse();

        let ndc_x = (pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(pos.y - rect.center().y) / (rect.height() * 0.5);

        let near = inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < f32::EPSILON || far.w.abs() < f32::EPSILON {
            tracing::warn!("unprojection produced a degenerate homogeneous point");
            return Err(GeomError::SingularTransform);
        }

        Ok(PickRay {
            near: near.truncate() / near.w,
            far: far.truncate() / far.w,
        })
    }
}
