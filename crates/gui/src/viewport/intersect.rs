//! Pure intersection primitives for the pick geometry.
//!
//! Every function here is side-effect-free and reports degenerate input
//! through its return value. This module is the single place where
//! floating-point comparisons against [`EPSILON`] happen.

use glam::Vec3;
use thiserror::Error;

use super::camera::PickRay;

/// Shared tolerance for degenerate-geometry tests
pub const EPSILON: f32 = 1e-5;

/// Failure taxonomy for the geometry core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeomError {
    /// A view/projection or frame transform could not be inverted
    #[error("transform is singular and cannot be inverted")]
    SingularTransform,
    /// A plane was given with a zero or non-finite normal
    #[error("plane normal is degenerate")]
    InvalidPlane,
    /// The ray runs (near-)parallel to the target plane, or lies within it
    #[error("ray is parallel to the target plane")]
    ParallelRay,
    /// The two lines of a closest-point query are (near-)parallel
    #[error("lines are parallel, no unique closest point")]
    ParallelLines,
    /// A closed-form denominator vanished
    #[error("degenerate denominator in closed-form solution")]
    DegenerateDenominator,
    /// A supposedly on-plane point has a non-zero local z component
    #[error("point does not lie on the plane")]
    OffPlane,
}

/// Relation between two planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneRelation {
    /// Parallel and disjoint
    Parallel,
    /// The same plane within tolerance
    Coincident,
    /// Proper intersection in a line
    Line { point: Vec3, direction: Vec3 },
}

/// Intersect a ray with a plane given by its unit-ish normal and a point on it.
///
/// A ray that lies within the plane is rejected the same way as a parallel
/// ray: neither has a single well-defined intersection point.
pub fn ray_plane(normal: Vec3, point_on_plane: Vec3, ray: &PickRay) -> Result<Vec3, GeomError> {
    let n_len = normal.length();
    if !n_len.is_finite() || n_len < EPSILON {
        return Err(GeomError::InvalidPlane);
    }
    let n = normal / n_len;

    let span = ray.far - ray.near;
    let span_len = span.length();
    if span_len < EPSILON {
        return Err(GeomError::DegenerateDenominator);
    }
    let dir = span / span_len;

    let denom = dir.dot(n);
    if denom.abs() < EPSILON {
        return Err(GeomError::ParallelRay);
    }

    let t = (point_on_plane - ray.near).dot(n) / denom;
    Ok(ray.near + dir * t)
}

/// Point on the line `(line_point, line_dir)` closest to the pick ray.
///
/// This is what makes dragging along a canvas normal well-defined even when
/// the view is nearly perpendicular to it; a plane query would be ambiguous
/// there.
pub fn line_closest_point(
    line_point: Vec3,
    line_dir: Vec3,
    ray: &PickRay,
) -> Result<Vec3, GeomError> {
    let d1 = line_dir;
    let d2 = ray.far - ray.near;
    if d1.length() < EPSILON || d2.length() < EPSILON {
        return Err(GeomError::DegenerateDenominator);
    }

    if d1.normalize().cross(d2.normalize()).length() < EPSILON {
        return Err(GeomError::ParallelLines);
    }

    let w0 = line_point - ray.near;
    let a = d1.dot(d1);
    let b = d1.dot(d2);
    let c = d2.dot(d2);
    let d = d1.dot(w0);
    let e = d2.dot(w0);

    let denom = a * c - b * b;
    if denom.abs() < EPSILON {
        return Err(GeomError::DegenerateDenominator);
    }

    let s = (b * e - c * d) / denom;
    Ok(line_point + d1 * s)
}

/// Minimum distance between two lines, each given as point + direction.
///
/// Parallel lines have no meaningful skew distance; `None` is the sentinel
/// for that case (never zero).
pub fn skew_line_distance(p1: Vec3, d1: Vec3, p2: Vec3, d2: Vec3) -> Option<f32> {
    let cross = d1.cross(d2);
    let cross_len = cross.length();
    if cross_len < EPSILON {
        return None;
    }
    Some(((p2 - p1).dot(cross) / cross_len).abs())
}

/// Classify the intersection of two planes, each given as normal + point.
///
/// When the planes properly intersect, the returned point is found by
/// zeroing the coordinate axis with the largest-magnitude cross-product
/// component and solving the two plane equations for the remaining axes,
/// which keeps the division well-conditioned.
pub fn plane_plane(n1: Vec3, p1: Vec3, n2: Vec3, p2: Vec3) -> Result<PlaneRelation, GeomError> {
    let l1 = n1.length();
    let l2 = n2.length();
    if !l1.is_finite() || l1 < EPSILON || !l2.is_finite() || l2 < EPSILON {
        return Err(GeomError::InvalidPlane);
    }
    let n1 = n1 / l1;
    let n2 = n2 / l2;

    let dir = n1.cross(n2);
    if dir.length() < EPSILON {
        let separation = (p2 - p1).dot(n1);
        return Ok(if separation.abs() < EPSILON {
            PlaneRelation::Coincident
        } else {
            PlaneRelation::Parallel
        });
    }

    let d1 = n1.dot(p1);
    let d2 = n2.dot(p2);
    let abs = dir.abs();

    let point = if abs.x >= abs.y && abs.x >= abs.z {
        // x = 0, solve for y and z
        let det = dir.x;
        Vec3::new(
            0.0,
            (d1 * n2.z - n1.z * d2) / det,
            (n1.y * d2 - d1 * n2.y) / det,
        )
    } else if abs.y >= abs.x && abs.y >= abs.z {
        // y = 0, solve for x and z
        let det = n1.x * n2.z - n1.z * n2.x;
        Vec3::new(
            (d1 * n2.z - n1.z * d2) / det,
            0.0,
            (n1.x * d2 - d1 * n2.x) / det,
        )
    } else {
        // z = 0, solve for x and y
        let det = dir.z;
        Vec3::new(
            (d1 * n2.y - n1.y * d2) / det,
            (n1.x * d2 - d1 * n2.x) / det,
            0.0,
        )
    };

    Ok(PlaneRelation::Line {
        point,
        direction: dir.normalize(),
    })
}
