//! Keyboard shortcut handling

use eframe::egui;
use shared::TransformMode;

use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(
    ctx: &egui::Context,
    state: &mut AppState,
    viewport: &mut ViewportPanel,
) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // W / E / R: manipulator mode
        if !i.modifiers.command {
            if i.key_pressed(egui::Key::W) {
                state.controller.set_mode(TransformMode::Translate);
            }
            if i.key_pressed(egui::Key::E) {
                state.controller.set_mode(TransformMode::Rotate);
            }
            if i.key_pressed(egui::Key::R) {
                state.controller.set_mode(TransformMode::Scale);
            }
        }
        // Escape: abort drag, otherwise deselect
        if i.key_pressed(egui::Key::Escape) {
            state.escape();
        }
        // Delete: remove selected shape
        if i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace) {
            state.delete_selected();
        }
        // Ctrl+D: duplicate
        if i.modifiers.command && i.key_pressed(egui::Key::D) {
            state.duplicate_selected();
        }
        // F: focus camera on selected object
        if i.key_pressed(egui::Key::F) && !i.modifiers.command {
            if let Some(id) = state.scene.selected_id() {
                if let Some(center) = viewport.aabb_center(id) {
                    viewport.focus_on(center);
                }
            }
        }
    });
}
