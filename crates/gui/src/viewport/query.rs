//! Per-canvas pick queries: the composition of the camera ray caster, the
//! intersection primitives, and a canvas's plane frame.
//!
//! Camera state and viewport rect are passed in explicitly; nothing here
//! reaches for application globals. Every entry point returns a recoverable
//! error that the interaction layer treats as "abort the current gesture".

use glam::Vec3;

use crate::frame::PlaneFrame;

use super::camera::{ArcBallCamera, PickRay};
use super::intersect::{self, GeomError};

/// One screen event's worth of query context
pub struct CanvasQuery<'a> {
    pub camera: &'a ArcBallCamera,
    pub rect: egui::Rect,
}

impl<'a> CanvasQuery<'a> {
    pub fn new(camera: &'a ArcBallCamera, rect: egui::Rect) -> Self {
        Self { camera, rect }
    }

    /// The raw pick ray for a screen position
    pub fn ray(&self, pos: egui::Pos2) -> Result<PickRay, GeomError> {
        self.camera.screen_ray(pos, self.rect)
    }

    /// Where the click lands on the canvas plane, in local (u, v)
    pub fn local_hit(&self, frame: &PlaneFrame, pos: egui::Pos2) -> Result<[f64; 2], GeomError> {
        let ray = self.ray(pos)?;
        let hit = intersect::ray_plane(frame.normal(), frame.center(), &ray)?;
        frame.to_local(hit)
    }

    /// Point on the line `(point, dir)` closest to the pick ray
    pub fn line_hit(&self, point: Vec3, dir: Vec3, pos: egui::Pos2) -> Result<Vec3, GeomError> {
        let ray = self.ray(pos)?;
        intersect::line_closest_point(point, dir, &ray)
    }

    /// Where the click lands along the canvas's normal axis. Casting against
    /// a line keeps the drag direction well-defined even when the view is
    /// nearly perpendicular to the normal.
    pub fn normal_hit(&self, frame: &PlaneFrame, pos: egui::Pos2) -> Result<Vec3, GeomError> {
        self.line_hit(frame.center(), frame.normal(), pos)
    }

    /// Where the click lands on an arbitrary plane through `center`.
    /// Rotation gestures pick their plane from the active rotation axis.
    pub fn plane_hit(
        &self,
        center: Vec3,
        normal: Vec3,
        pos: egui::Pos2,
    ) -> Result<Vec3, GeomError> {
        let ray = self.ray(pos)?;
        intersect::ray_plane(normal, center, &ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn test_local_hit_round_trips_through_projection() {
        let cam = ArcBallCamera::new();
        let q = CanvasQuery::new(&cam, rect());
        let frame = PlaneFrame::identity();

        let uv = [0.8, -0.4];
        let pos = cam.project(frame.to_global(uv), rect()).unwrap();
        let hit = q.local_hit(&frame, pos).unwrap();
        assert!((hit[0] - uv[0]).abs() < 1e-2);
        assert!((hit[1] - uv[1]).abs() < 1e-2);
    }

    #[test]
    fn test_normal_hit_recovers_axis_point() {
        let cam = ArcBallCamera::new();
        let q = CanvasQuery::new(&cam, rect());
        let frame = PlaneFrame::identity();

        let target = Vec3::new(0.0, 0.0, 1.5);
        let pos = cam.project(target, rect()).unwrap();
        let hit = q.normal_hit(&frame, pos).unwrap();
        assert!((hit - target).length() < 1e-2);
    }

    #[test]
    fn test_normal_hit_fails_when_view_aligned() {
        // Looking straight down the canvas normal makes the center pick ray
        // parallel to the normal line.
        let mut cam = ArcBallCamera::new();
        cam.yaw = 0.0;
        cam.pitch = 0.0;
        let q = CanvasQuery::new(&cam, rect());
        let frame = PlaneFrame::identity();

        let result = q.normal_hit(&frame, rect().center());
        assert_eq!(result, Err(GeomError::ParallelLines));
    }

    #[test]
    fn test_plane_hit_on_tilted_plane() {
        let cam = ArcBallCamera::new();
        let q = CanvasQuery::new(&cam, rect());
        let mut frame = PlaneFrame::identity();
        frame.set_rotation(Quat::from_axis_angle(Vec3::X, 0.4));

        let center = frame.center();
        let axis = frame.v_axis();
        let on_plane = center + frame.u_axis() * 1.2;
        let pos = cam.project(on_plane, rect()).unwrap();
        let hit = q.plane_hit(center, axis, pos).unwrap();
        assert!((hit - on_plane).length() < 1e-2);
    }
}
