pub mod scene;
pub mod selection;
pub mod settings;

pub use scene::{OrthoAxis, SceneState};
pub use selection::SelectionState;
pub use settings::AppSettings;

use crate::interact::InteractionController;

/// Combined application state
#[derive(Default)]
pub struct AppState {
    pub scene: SceneState,
    pub interact: InteractionController,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            scene: SceneState::default(),
            interact: InteractionController::default(),
            settings: AppSettings::load(),
        }
    }
}
