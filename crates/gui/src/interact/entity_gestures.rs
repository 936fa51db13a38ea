//! PRESSED handlers for the selection gestures: move, scale, rotate within
//! the canvas plane.

use shared::{CanvasId, EntityRef};

use crate::state::scene::SceneState;
use crate::viewport::query::CanvasQuery;

use super::session::{EditSession, SessionKind};
use super::InteractionController;

impl InteractionController {
    /// Start translating the selection
    pub(super) fn move_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, refs)) = self.selected_refs() else {
            tracing::debug!("entity-move press with nothing selected");
            return;
        };
        let Some(start) = self.pressed_uv(scene, &id, query, pos) else {
            return;
        };
        self.session = Some(EditSession {
            canvas: id,
            kind: SessionKind::MoveSelection { refs, start },
            preview: None,
        });
    }

    /// Start scaling the selection about its cached center
    pub(super) fn scale_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, refs)) = self.selected_refs() else {
            tracing::debug!("entity-scale press with nothing selected");
            return;
        };
        self.refresh_selection_bounds(scene, &id);
        let Some(center) = self.selection.center() else {
            tracing::debug!("entity-scale press with no selection bounds");
            return;
        };
        let Some(start) = self.pressed_uv(scene, &id, query, pos) else {
            return;
        };
        let start_dist = ((start[0] - center[0]).powi(2) + (start[1] - center[1]).powi(2)).sqrt();
        if start_dist < 1e-9 {
            // A press exactly on the center gives no reference length.
            tracing::debug!("entity-scale press on the selection center, ignored");
            return;
        }
        self.session = Some(EditSession {
            canvas: id,
            kind: SessionKind::ScaleSelection {
                refs,
                center,
                start_dist,
            },
            preview: None,
        });
    }

    /// Start rotating the selection about its reference center
    pub(super) fn spin_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, refs)) = self.selected_refs() else {
            tracing::debug!("entity-rotate press with nothing selected");
            return;
        };
        self.refresh_selection_bounds(scene, &id);
        let Some(center) = self.selection.rotation_center() else {
            tracing::debug!("entity-rotate press with no selection bounds");
            return;
        };
        let Some(start) = self.pressed_uv(scene, &id, query, pos) else {
            return;
        };
        let dx = start[0] - center[0];
        let dy = start[1] - center[1];
        if dx.hypot(dy) < 1e-9 {
            tracing::debug!("entity-rotate press on the rotation center, ignored");
            return;
        }
        self.session = Some(EditSession {
            canvas: id,
            kind: SessionKind::RotateSelection {
                refs,
                center,
                start_angle: dy.atan2(dx),
            },
            preview: None,
        });
    }

    /// Selection refs, provided the selection belongs to the current canvas
    fn selected_refs(&self) -> Option<(CanvasId, Vec<EntityRef>)> {
        let current = self.current_canvas()?.clone();
        if self.selection.canvas() != Some(&current) || self.selection.is_empty() {
            return None;
        }
        Some((current, self.selection.entities().to_vec()))
    }

    fn refresh_selection_bounds(&mut self, scene: &SceneState, id: &str) {
        if let Some(canvas) = scene.get_canvas(id) {
            self.selection.recompute_bounds(canvas);
        }
    }

    fn pressed_uv(
        &self,
        scene: &SceneState,
        id: &str,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) -> Option<[f64; 2]> {
        match self.session_local_hit(scene, id, query, pos) {
            Some(uv) => Some(uv),
            None => {
                tracing::debug!("selection gesture press ignored, degenerate geometry");
                None
            }
        }
    }
}
