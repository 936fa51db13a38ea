//! Shared helpers for canvas/entity geometry and scene-model conversions.

use glam::Quat;
use shared::{Canvas, EntityKind, EntityRef, Photo, Point2D, Stroke};

/// Total polyline length of a point sequence
pub fn path_length(points: &[Point2D]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// 2D axis-aligned bounds of the referenced entities, in canvas-local
/// coordinates. `None` when the references resolve to no points.
pub fn entity_bounds(canvas: &Canvas, refs: &[EntityRef]) -> Option<([f64; 2], [f64; 2])> {
    let mut min = [f64::MAX, f64::MAX];
    let mut max = [f64::MIN, f64::MIN];
    let mut any = false;

    let mut grow = |p: [f64; 2]| {
        min[0] = min[0].min(p[0]);
        min[1] = min[1].min(p[1]);
        max[0] = max[0].max(p[0]);
        max[1] = max[1].max(p[1]);
        any = true;
    };

    for r in refs {
        match r.kind {
            EntityKind::Stroke => {
                if let Some(stroke) = canvas.strokes.get(r.index) {
                    for p in &stroke.points {
                        grow([p.x, p.y]);
                    }
                }
            }
            EntityKind::Photo => {
                if let Some(photo) = canvas.photos.get(r.index) {
                    for corner in photo_corners(photo) {
                        grow([corner.x, corner.y]);
                    }
                }
            }
        }
    }

    any.then_some((min, max))
}

/// Bounds of all canvas content grown by `margin`, falling back to a square
/// of `default_half` half-extent for an empty canvas. Used to give an
/// infinite plane a finite pickable/paintable footprint.
pub fn canvas_extent(canvas: &Canvas, default_half: f64, margin: f64) -> ([f64; 2], [f64; 2]) {
    match entity_bounds(canvas, &canvas.entity_refs()) {
        Some((min, max)) => (
            [min[0] - margin, min[1] - margin],
            [max[0] + margin, max[1] + margin],
        ),
        None => ([-default_half, -default_half], [default_half, default_half]),
    }
}

/// The four corners of a photo's oriented rectangle
pub fn photo_corners(photo: &Photo) -> [Point2D; 4] {
    let (s, c) = photo.rotation.sin_cos();
    let hw = photo.width * 0.5;
    let hh = photo.height * 0.5;
    let corner = |dx: f64, dy: f64| {
        Point2D::new(
            photo.center.x + dx * c - dy * s,
            photo.center.y + dx * s + dy * c,
        )
    };
    [
        corner(-hw, -hh),
        corner(hw, -hh),
        corner(hw, hh),
        corner(-hw, hh),
    ]
}

/// Translate the referenced entities by a local-space delta
pub fn translate_entities(canvas: &mut Canvas, refs: &[EntityRef], delta: [f64; 2]) {
    for r in refs {
        match r.kind {
            EntityKind::Stroke => {
                if let Some(stroke) = canvas.strokes.get_mut(r.index) {
                    for p in &mut stroke.points {
                        p.x += delta[0];
                        p.y += delta[1];
                    }
                }
            }
            EntityKind::Photo => {
                if let Some(photo) = canvas.photos.get_mut(r.index) {
                    photo.center.x += delta[0];
                    photo.center.y += delta[1];
                }
            }
        }
    }
}

/// Scale the referenced entities about a local-space center
pub fn scale_entities(canvas: &mut Canvas, refs: &[EntityRef], factor: f64, center: [f64; 2]) {
    let scale_point = |p: &mut Point2D| {
        p.x = center[0] + (p.x - center[0]) * factor;
        p.y = center[1] + (p.y - center[1]) * factor;
    };
    for r in refs {
        match r.kind {
            EntityKind::Stroke => {
                if let Some(stroke) = canvas.strokes.get_mut(r.index) {
                    stroke.points.iter_mut().for_each(scale_point);
                }
            }
            EntityKind::Photo => {
                if let Some(photo) = canvas.photos.get_mut(r.index) {
                    scale_point(&mut photo.center);
                    photo.width *= factor;
                    photo.height *= factor;
                }
            }
        }
    }
}

/// Rotate the referenced entities about a local-space center (radians, CCW)
pub fn rotate_entities(canvas: &mut Canvas, refs: &[EntityRef], angle: f64, center: [f64; 2]) {
    let (s, c) = angle.sin_cos();
    let rotate_point = |p: &mut Point2D| {
        let dx = p.x - center[0];
        let dy = p.y - center[1];
        p.x = center[0] + dx * c - dy * s;
        p.y = center[1] + dx * s + dy * c;
    };
    for r in refs {
        match r.kind {
            EntityKind::Stroke => {
                if let Some(stroke) = canvas.strokes.get_mut(r.index) {
                    stroke.points.iter_mut().for_each(rotate_point);
                }
            }
            EntityKind::Photo => {
                if let Some(photo) = canvas.photos.get_mut(r.index) {
                    rotate_point(&mut photo.center);
                    photo.rotation += angle;
                }
            }
        }
    }
}

/// Offset calibration control points by a local-space delta
pub fn move_calibration_points(canvas: &mut Canvas, indices: &[usize], delta: [f64; 2]) {
    if let Some(rig) = canvas.calibration.as_mut() {
        for &i in indices {
            if let Some(p) = rig.points.get_mut(i) {
                p.x += delta[0];
                p.y += delta[1];
            }
        }
    }
}

/// Deep-copy a canvas with fresh ids, for clone gestures
pub fn clone_canvas(source: &Canvas, name: String) -> Canvas {
    let mut copy = source.clone();
    copy.id = uuid::Uuid::new_v4().to_string();
    copy.name = name;
    for stroke in &mut copy.strokes {
        stroke.id = uuid::Uuid::new_v4().to_string();
    }
    for photo in &mut copy.photos {
        photo.id = uuid::Uuid::new_v4().to_string();
    }
    copy
}

/// Remove the referenced entities from a canvas and return them, preserving
/// the order of `refs`. Indices are removed highest-first per kind so earlier
/// removals cannot shift later ones.
pub fn take_entities(canvas: &mut Canvas, refs: &[EntityRef]) -> (Vec<Stroke>, Vec<Photo>) {
    let mut stroke_idx: Vec<usize> = refs
        .iter()
        .filter(|r| r.kind == EntityKind::Stroke)
        .map(|r| r.index)
        .collect();
    let mut photo_idx: Vec<usize> = refs
        .iter()
        .filter(|r| r.kind == EntityKind::Photo)
        .map(|r| r.index)
        .collect();
    stroke_idx.sort_unstable_by(|a, b| b.cmp(a));
    stroke_idx.dedup();
    photo_idx.sort_unstable_by(|a, b| b.cmp(a));
    photo_idx.dedup();

    let mut strokes = Vec::new();
    for i in stroke_idx {
        if i < canvas.strokes.len() {
            strokes.push(canvas.strokes.remove(i));
        }
    }
    strokes.reverse();

    let mut photos = Vec::new();
    for i in photo_idx {
        if i < canvas.photos.len() {
            photos.push(canvas.photos.remove(i));
        }
    }
    photos.reverse();

    (strokes, photos)
}

/// Quaternion from its serialized (x, y, z, w) form
pub fn quat_from_array(q: [f32; 4]) -> Quat {
    Quat::from_xyzw(q[0], q[1], q[2], q[3])
}

/// Serialized (x, y, z, w) form of a quaternion
pub fn quat_to_array(q: Quat) -> [f32; 4] {
    [q.x, q.y, q.z, q.w]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(f64, f64)]) -> Stroke {
        Stroke {
            id: "s".into(),
            points: points.iter().map(|&(x, y)| Point2D::new(x, y)).collect(),
            width: 2.0,
        }
    }

    #[test]
    fn test_entity_bounds() {
        let mut c = Canvas::new("c".into(), "C".into());
        c.strokes.push(stroke(&[(-1.0, 0.0), (2.0, 3.0)]));
        let (min, max) = entity_bounds(&c, &[EntityRef::stroke(0)]).unwrap();
        assert_eq!(min, [-1.0, 0.0]);
        assert_eq!(max, [2.0, 3.0]);
    }

    #[test]
    fn test_canvas_extent_empty_falls_back() {
        let c = Canvas::new("c".into(), "C".into());
        let (min, max) = canvas_extent(&c, 4.0, 1.0);
        assert_eq!(min, [-4.0, -4.0]);
        assert_eq!(max, [4.0, 4.0]);
    }

    #[test]
    fn test_scale_then_inverse_restores() {
        let mut c = Canvas::new("c".into(), "C".into());
        c.strokes.push(stroke(&[(1.0, 1.0), (3.0, 2.0)]));
        let refs = [EntityRef::stroke(0)];
        scale_entities(&mut c, &refs, 2.0, [1.0, 1.0]);
        assert_eq!(c.strokes[0].points[1], Point2D::new(5.0, 3.0));
        scale_entities(&mut c, &refs, 0.5, [1.0, 1.0]);
        assert_eq!(c.strokes[0].points[1], Point2D::new(3.0, 2.0));
    }

    #[test]
    fn test_take_entities_highest_index_first() {
        let mut c = Canvas::new("c".into(), "C".into());
        c.strokes.push(stroke(&[(0.0, 0.0)]));
        c.strokes.push(stroke(&[(1.0, 1.0)]));
        c.strokes.push(stroke(&[(2.0, 2.0)]));
        let (taken, _) = take_entities(&mut c, &[EntityRef::stroke(0), EntityRef::stroke(2)]);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].points[0].x, 0.0);
        assert_eq!(taken[1].points[0].x, 2.0);
        assert_eq!(c.strokes.len(), 1);
        assert_eq!(c.strokes[0].points[0].x, 1.0);
    }

    #[test]
    fn test_photo_corners_rotated() {
        let photo = Photo {
            id: "p".into(),
            center: Point2D::new(0.0, 0.0),
            width: 2.0,
            height: 2.0,
            rotation: std::f64::consts::FRAC_PI_2,
        };
        let corners = photo_corners(&photo);
        // Rotating (-1, -1) by 90 degrees CCW gives (1, -1).
        assert!((corners[0].x - 1.0).abs() < 1e-12);
        assert!((corners[0].y + 1.0).abs() < 1e-12);
    }
}
