//! Single-view-metrology sub-modes: dragging calibration control points and
//! wires in canvas-local coordinates.

use crate::state::scene::SceneState;
use crate::state::settings::AppSettings;
use crate::viewport::picking;
use crate::viewport::query::CanvasQuery;

use super::session::{EditSession, SessionKind};
use super::InteractionController;

impl InteractionController {
    /// Grab the calibration point (or wire) under the cursor
    pub(super) fn calibration_pressed(
        &mut self,
        scene: &mut SceneState,
        settings: &AppSettings,
        query: &CanvasQuery,
        pos: egui::Pos2,
        wire: bool,
    ) {
        let Some((id, frame)) = self.current_frame(scene) else {
            tracing::debug!("calibration press with no current canvas");
            return;
        };
        let uv = match query.local_hit(&frame, pos) {
            Ok(uv) => uv,
            Err(err) => {
                tracing::debug!(%err, "calibration press ignored");
                return;
            }
        };
        let Some(rig) = scene.get_canvas(&id).and_then(|c| c.calibration.as_ref()) else {
            tracing::debug!("calibration press on a canvas without a rig");
            return;
        };

        let tolerance = settings.pick.calibration_tolerance;
        let indices = if wire {
            match picking::pick_calibration_wire(rig, uv, tolerance) {
                Some(pair) => pair.to_vec(),
                None => return,
            }
        } else {
            match picking::pick_calibration_point(rig, uv, tolerance) {
                Some(i) => vec![i],
                None => return,
            }
        };

        self.session = Some(EditSession {
            canvas: id,
            kind: SessionKind::Calibration { indices, start: uv },
            preview: None,
        });
    }
}
