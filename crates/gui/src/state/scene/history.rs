//! Undo/redo over the command log

use super::SceneState;

impl SceneState {
    /// Reverse the most recent committed edit
    pub fn undo(&mut self) -> bool {
        if let Some(cmd) = self.log.pop_undo() {
            if !cmd.revert(&mut self.scene) {
                tracing::warn!(?cmd, "undo target vanished");
            }
            self.log.stash_redo(cmd);
            self.version += 1;
            true
        } else {
            false
        }
    }

    /// Re-apply the most recently undone edit
    pub fn redo(&mut self) -> bool {
        if let Some(cmd) = self.log.pop_redo() {
            if !cmd.apply(&mut self.scene) {
                tracing::warn!(?cmd, "redo target vanished");
            }
            self.log.stash_undo(cmd);
            self.version += 1;
            true
        } else {
            false
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_cycle() {
        let mut s = SceneState::default();
        s.create_canvas("A");
        s.create_canvas("B");
        assert_eq!(s.scene.canvases.len(), 2);

        assert!(s.undo());
        assert_eq!(s.scene.canvases.len(), 1);
        assert!(s.undo());
        assert!(s.scene.canvases.is_empty());
        assert!(!s.undo());

        assert!(s.redo());
        assert!(s.redo());
        assert_eq!(s.scene.canvases.len(), 2);
        assert!(!s.redo());
    }
}
