//! Per-canvas selection group.
//!
//! A selection always belongs to at most one canvas (the current one); it is
//! emptied whenever that canvas loses current status. Membership is unique.

use shared::{Canvas, CanvasId, EntityRef};

use crate::helpers;

/// Selected entities of the current canvas plus cached frame geometry
#[derive(Debug, Default)]
pub struct SelectionState {
    canvas: Option<CanvasId>,
    entities: Vec<EntityRef>,
    /// Cached 2D bounds of the selection, in canvas-local coordinates
    bounds: Option<([f64; 2], [f64; 2])>,
    /// Center used as the reference for rotation gestures
    rotation_center: Option<[f64; 2]>,
}

impl SelectionState {
    /// Canvas owning the selection, if any
    pub fn canvas(&self) -> Option<&CanvasId> {
        self.canvas.as_ref()
    }

    /// All selected entities
    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_selected(&self, entity: EntityRef) -> bool {
        self.entities.contains(&entity)
    }

    /// Cached selection bounds, if any entity contributes points
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        self.bounds
    }

    /// Center of the cached bounds, the default rotation reference
    pub fn center(&self) -> Option<[f64; 2]> {
        self.bounds
            .map(|(min, max)| [(min[0] + max[0]) * 0.5, (min[1] + max[1]) * 0.5])
    }

    /// Rotation reference point; falls back to the bounds center
    pub fn rotation_center(&self) -> Option<[f64; 2]> {
        self.rotation_center.or_else(|| self.center())
    }

    pub fn set_rotation_center(&mut self, center: [f64; 2]) {
        self.rotation_center = Some(center);
    }

    /// Select a single entity on `canvas`, replacing any previous selection
    pub fn select(&mut self, canvas: CanvasId, entity: EntityRef) {
        self.canvas = Some(canvas);
        self.entities.clear();
        self.entities.push(entity);
        self.invalidate_cache();
    }

    /// Toggle an entity in the selection (membership stays unique). A toggle
    /// on a different canvas replaces the selection.
    pub fn toggle(&mut self, canvas: CanvasId, entity: EntityRef) {
        if self.canvas.as_ref() != Some(&canvas) {
            self.select(canvas, entity);
            return;
        }
        if let Some(pos) = self.entities.iter().position(|e| *e == entity) {
            self.entities.remove(pos);
        } else {
            self.entities.push(entity);
        }
        self.invalidate_cache();
    }

    /// Empty the selection, keeping no canvas association
    pub fn clear(&mut self) {
        self.canvas = None;
        self.entities.clear();
        self.invalidate_cache();
    }

    /// Refresh the cached bounds from the owning canvas's current geometry
    pub fn recompute_bounds(&mut self, canvas: &Canvas) {
        if self.canvas.as_deref() != Some(canvas.id.as_str()) {
            return;
        }
        self.bounds = helpers::entity_bounds(canvas, &self.entities);
    }

    fn invalidate_cache(&mut self) {
        self.bounds = None;
        self.rotation_center = None;
    }
}
