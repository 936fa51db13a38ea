//! Spatial occupancy queries for the select modes: which canvas, and which
//! entity within it, sits under the cursor. The search proceeds by
//! increasing structural depth: canvases by ray parameter first, then the
//! entities of the hit canvas by 2D distance.

use shared::{Canvas, CalibrationRig, EntityKind, EntityRef, Photo, Point2D, SceneDescription};

use crate::frame::PlaneFrame;
use crate::helpers;

use super::intersect;
use super::query::CanvasQuery;

/// Result of a scene occupancy query
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHit {
    pub canvas: shared::CanvasId,
    /// Hit point in the canvas's local coordinates
    pub uv: [f64; 2],
    /// Ray parameter of the plane hit (world units from the near point)
    pub t: f32,
}

/// Find the nearest visible canvas under the cursor.
///
/// A canvas is hit when its plane intersection falls inside the canvas's
/// content extent (grown by a margin; empty canvases expose a default
/// square footprint).
pub fn pick_canvas(
    scene: &SceneDescription,
    query: &CanvasQuery,
    pos: egui::Pos2,
    default_half: f64,
    margin: f64,
) -> Option<SceneHit> {
    let ray = query.ray(pos).ok()?;
    let dir = ray.direction();

    let mut best: Option<SceneHit> = None;
    for canvas in scene.canvases.iter().filter(|c| c.visible) {
        let frame = PlaneFrame::from_shared(&canvas.frame);
        let Ok(hit) = intersect::ray_plane(frame.normal(), frame.center(), &ray) else {
            continue;
        };
        let t = (hit - ray.near).dot(dir);
        if t < 0.0 {
            continue; // behind the near plane
        }
        let Ok(uv) = frame.to_local(hit) else {
            continue;
        };

        let (min, max) = helpers::canvas_extent(canvas, default_half, margin);
        if uv[0] < min[0] || uv[0] > max[0] || uv[1] < min[1] || uv[1] > max[1] {
            continue;
        }

        if best.as_ref().is_none_or(|b| t < b.t) {
            best = Some(SceneHit {
                canvas: canvas.id.clone(),
                uv,
                t,
            });
        }
    }
    best
}

/// Find the entity of one canvas closest to a local-space point, within
/// `tolerance`. Strokes measure distance to their polyline, photos to their
/// oriented rectangle (zero inside).
pub fn pick_entity(canvas: &Canvas, uv: [f64; 2], tolerance: f64) -> Option<EntityRef> {
    let mut best: Option<(EntityRef, f64)> = None;

    for (i, stroke) in canvas.strokes.iter().enumerate() {
        if let Some(d) = polyline_distance(&stroke.points, uv) {
            if d <= tolerance && best.as_ref().is_none_or(|(_, bd)| d < *bd) {
                best = Some((EntityRef::stroke(i), d));
            }
        }
    }

    for (i, photo) in canvas.photos.iter().enumerate() {
        let d = photo_distance(photo, uv);
        if d <= tolerance && best.as_ref().is_none_or(|(_, bd)| d < *bd) {
            best = Some((
                EntityRef {
                    kind: EntityKind::Photo,
                    index: i,
                },
                d,
            ));
        }
    }

    best.map(|(r, _)| r)
}

/// Nearest calibration control point within `tolerance`
pub fn pick_calibration_point(rig: &CalibrationRig, uv: [f64; 2], tolerance: f64) -> Option<usize> {
    let cursor = Point2D::new(uv[0], uv[1]);
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in rig.points.iter().enumerate() {
        let d = p.distance(&cursor);
        if d <= tolerance && best.as_ref().is_none_or(|(_, bd)| d < *bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Nearest calibration wire within `tolerance`, as its two point indices
pub fn pick_calibration_wire(
    rig: &CalibrationRig,
    uv: [f64; 2],
    tolerance: f64,
) -> Option<[usize; 2]> {
    let mut best: Option<([usize; 2], f64)> = None;
    for wire in &rig.wires {
        let (Some(a), Some(b)) = (rig.points.get(wire[0]), rig.points.get(wire[1])) else {
            continue;
        };
        let d = segment_distance([a.x, a.y], [b.x, b.y], uv);
        if d <= tolerance && best.as_ref().is_none_or(|(_, bd)| d < *bd) {
            best = Some((*wire, d));
        }
    }
    best.map(|(w, _)| w)
}

/// Distance from a point to a polyline. `None` for an empty polyline.
fn polyline_distance(points: &[Point2D], uv: [f64; 2]) -> Option<f64> {
    match points {
        [] => None,
        [single] => Some(single.distance(&Point2D::new(uv[0], uv[1]))),
        _ => points
            .windows(2)
            .map(|w| segment_distance([w[0].x, w[0].y], [w[1].x, w[1].y], uv))
            .min_by(|a, b| a.total_cmp(b)),
    }
}

/// Distance from a point to a segment a-b
fn segment_distance(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if len_sq > 0.0 {
        ((ap[0] * ab[0] + ap[1] * ab[1]) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a[0] + ab[0] * t - p[0];
    let cy = a[1] + ab[1] * t - p[1];
    (cx * cx + cy * cy).sqrt()
}

/// Distance from a point to a photo's oriented rectangle (zero inside)
fn photo_distance(photo: &Photo, uv: [f64; 2]) -> f64 {
    // Express the point in the photo's own axes.
    let (s, c) = photo.rotation.sin_cos();
    let dx = uv[0] - photo.center.x;
    let dy = uv[1] - photo.center.y;
    let local_x = dx * c + dy * s;
    let local_y = -dx * s + dy * c;

    let ox = (local_x.abs() - photo.width * 0.5).max(0.0);
    let oy = (local_y.abs() - photo.height * 0.5).max(0.0);
    (ox * ox + oy * oy).sqrt()
}
