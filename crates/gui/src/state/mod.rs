pub mod assistant;
pub mod scene;
pub mod settings;

pub use assistant::{AssistantState, ChatMessage, ChatRole};
pub use scene::{shape_icon, short_id, SceneEvent, SceneState};
pub use settings::AppSettings;

use crate::viewport::gizmo::TransformController;

/// Panel visibility flags
pub struct PanelVisibility {
    pub scene_tree: bool,
    pub properties: bool,
    pub assistant: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            scene_tree: true,
            properties: true,
            assistant: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub scene: SceneState,
    pub controller: TransformController,
    pub assistant: AssistantState,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
}

impl AppState {
    /// State with explicit settings (tests and headless use)
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            scene: SceneState::default(),
            controller: TransformController::default(),
            assistant: AssistantState::default(),
            panels: PanelVisibility::default(),
            settings,
            show_settings_window: false,
        }
    }

    /// Delete the selected shape, if any
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.scene.selected_id().map(str::to_string) else {
            return false;
        };
        if self.controller.is_dragging() {
            self.controller.cancel();
        }
        self.scene.remove(&id)
    }

    /// Duplicate the selected shape, if any
    pub fn duplicate_selected(&mut self) -> Option<shared::ShapeId> {
        let id = self.scene.selected_id()?.to_string();
        self.scene.duplicate(&id)
    }

    /// Escape: abort a drag first, otherwise drop the selection
    pub fn escape(&mut self) {
        if self.controller.is_dragging() {
            self.controller.cancel();
        } else {
            self.scene.select(None);
        }
    }

    /// Drain a finished AI request into the scene. The selection is left
    /// alone.
    pub fn poll_assistant(&mut self) -> Option<Vec<shared::ShapeId>> {
        self.assistant.poll(&mut self.scene)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AppSettings::load())
    }
}
