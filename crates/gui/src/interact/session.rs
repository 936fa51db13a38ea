//! The transient state of one in-flight gesture.

use glam::Vec3;
use shared::{Canvas, CanvasId, EntityRef, Point2D};

use crate::command::EditCommand;

/// One edit gesture between PRESSED and RELEASED/abort.
///
/// At most one session exists at a time. `preview` is the visual-only
/// mutation currently applied to the scene; it is reverted and replaced on
/// every drag step, reverted and committed once on release, or reverted and
/// dropped on abort, so no partial delta can leak into committed state.
pub struct EditSession {
    /// Canvas the gesture is editing
    pub canvas: CanvasId,
    pub kind: SessionKind,
    /// Currently applied visual-only preview, if any
    pub preview: Option<EditCommand>,
}

/// Per-mode gesture bookkeeping, seeded on PRESSED.
///
/// Drag geometry (lines, centers, axes) is frozen at press time so that the
/// preview mutation cannot feed back into the queries that drive it.
pub enum SessionKind {
    /// Canvas-offset drag along the pre-gesture normal line
    Offset {
        line_point: Vec3,
        line_dir: Vec3,
        start: Vec3,
    },
    /// Canvas rotation about a fixed axis through the pre-gesture center
    RotateCanvas {
        center: Vec3,
        axis: Vec3,
        start_dir: Vec3,
    },
    /// Clone drag: `template` is the unoffset deep copy of the source
    CloneCanvas {
        line_point: Vec3,
        line_dir: Vec3,
        start: Vec3,
        template: Canvas,
    },
    /// Separate drag: `template` already holds the moved entities
    SeparateCanvas {
        line_point: Vec3,
        line_dir: Vec3,
        start: Vec3,
        refs: Vec<EntityRef>,
        template: Canvas,
    },
    /// In-plane translation of the selection
    MoveSelection {
        refs: Vec<EntityRef>,
        start: [f64; 2],
    },
    /// Scaling of the selection about its cached center
    ScaleSelection {
        refs: Vec<EntityRef>,
        center: [f64; 2],
        start_dist: f64,
    },
    /// In-plane rotation of the selection about its reference center
    RotateSelection {
        refs: Vec<EntityRef>,
        center: [f64; 2],
        start_angle: f64,
    },
    /// Freeform point sequence accumulated by sketch mode
    Stroke { points: Vec<Point2D> },
    /// Calibration point/wire drag (one or two point indices)
    Calibration {
        indices: Vec<usize>,
        start: [f64; 2],
    },
}
