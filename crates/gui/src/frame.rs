//! The rigid coordinate frame of one canvas.
//!
//! A canvas is a local 2D plane (normal = local +Z) placed in world space by
//! a rotation and a translation. `center` and `normal` are derived from the
//! composed transform and are recomputed after every mutation, so they can
//! never drift out of sync with the transform itself.

use glam::{Quat, Vec3};

use crate::viewport::intersect::GeomError;

/// Tolerance for the local z component of an on-plane point
pub const PLANE_THICKNESS: f32 = 1e-3;

/// How far a derived normal may deviate from unit length before the frame is
/// considered corrupt and reset
const NORMAL_DRIFT: f32 = 1e-3;

/// Rigid placement of a canvas plane: rotation + translation with derived
/// center/normal. World points are `rotation * local + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFrame {
    rotation: Quat,
    translation: Vec3,
    center: Vec3,
    normal: Vec3,
}

impl Default for PlaneFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl PlaneFrame {
    /// The plane z = 0 centered at the world origin
    pub fn identity() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            center: Vec3::ZERO,
            normal: Vec3::Z,
        }
    }

    /// Build from the serialized scene representation
    pub fn from_shared(t: &shared::FrameTransform) -> Self {
        let [x, y, z, w] = t.rotation;
        let mut frame = Self::identity();
        frame.rotation = Quat::from_xyzw(x as f32, y as f32, z as f32, w as f32);
        frame.translation = Vec3::new(
            t.translation[0] as f32,
            t.translation[1] as f32,
            t.translation[2] as f32,
        );
        frame.recompute();
        frame
    }

    /// Serialized scene representation of this frame
    pub fn to_shared(&self) -> shared::FrameTransform {
        shared::FrameTransform {
            rotation: [
                self.rotation.x as f64,
                self.rotation.y as f64,
                self.rotation.z as f64,
                self.rotation.w as f64,
            ],
            translation: [
                self.translation.x as f64,
                self.translation.y as f64,
                self.translation.z as f64,
            ],
        }
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// World position of the canvas center (the local origin)
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// World-space unit normal of the canvas plane
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// World direction of the local +U (x) axis
    pub fn u_axis(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// World direction of the local +V (y) axis
    pub fn v_axis(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Coefficients `(n, d)` of the plane equation `n · p = d`
    pub fn plane_eq(&self) -> (Vec3, f32) {
        (self.normal, self.normal.dot(self.center))
    }

    /// Replace the rotation factor and refresh derived state
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.recompute();
    }

    /// Replace the translation factor and refresh derived state
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.recompute();
    }

    /// Offset the frame by a world-space vector
    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
        self.recompute();
    }

    /// Offset the frame along its own normal
    pub fn translate_along_normal(&mut self, dist: f32) {
        let n = self.normal;
        self.translate(n * dist);
    }

    /// Compose a rotation about an arbitrary world-space pivot.
    ///
    /// When the pivot is the frame's own center this only changes the
    /// orientation; otherwise the center orbits the pivot.
    pub fn rotate(&mut self, rot: Quat, pivot: Vec3) {
        self.translation = rot * (self.translation - pivot) + pivot;
        self.rotation = rot * self.rotation;
        self.recompute();
    }

    /// Convert a world point lying on the plane into local (u, v).
    ///
    /// An off-plane input signals a caller mixing up planes, which is a
    /// logic bug; it is logged and reported rather than silently projected.
    pub fn to_local(&self, world: Vec3) -> Result<[f64; 2], GeomError> {
        if (self.rotation.length_squared() - 1.0).abs() > NORMAL_DRIFT {
            tracing::warn!("plane frame rotation is degenerate, cannot invert");
            return Err(GeomError::SingularTransform);
        }
        let local = self.rotation.conjugate() * (world - self.translation);
        if !local.is_finite() {
            tracing::warn!("plane frame inversion produced non-finite coordinates");
            return Err(GeomError::SingularTransform);
        }
        if local.z.abs() > PLANE_THICKNESS {
            tracing::warn!(local_z = local.z, "point is off the canvas plane");
            return Err(GeomError::OffPlane);
        }
        Ok([local.x as f64, local.y as f64])
    }

    /// Lift a local (u, v) point into world space. The 2D parameter keeps
    /// off-plane input unrepresentable.
    pub fn to_global(&self, uv: [f64; 2]) -> Vec3 {
        self.rotation * Vec3::new(uv[0] as f32, uv[1] as f32, 0.0) + self.translation
    }

    /// Refresh `center`/`normal` from the transform. A degenerate result
    /// resets the frame to identity instead of keeping corrupt state.
    fn recompute(&mut self) {
        let normal = self.rotation * Vec3::Z;
        let len = normal.length();
        if !len.is_finite() || (len - 1.0).abs() > NORMAL_DRIFT || !self.translation.is_finite() {
            tracing::warn!("degenerate plane frame detected, resetting to identity");
            *self = Self::identity();
            return;
        }
        self.rotation = self.rotation.normalize();
        self.normal = normal / len;
        self.center = self.translation;
    }
}
