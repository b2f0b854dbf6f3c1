use egui::Ui;
use shared::TransformMode;

use crate::app::styles::INDIGO_400;
use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState, triangle_count: usize) {
    ui.horizontal(|ui| {
        ui.weak(format!("{}: {}", t("status.objects"), state.scene.len()));
        ui.separator();
        ui.weak(format!("{}: {triangle_count}", t("status.triangles")));
        ui.separator();

        match state.scene.selected() {
            Some(shape) => ui.label(format!("{}: {}", t("status.selected"), shape.name)),
            None => ui.weak(format!("{}: {}", t("status.selected"), t("status.none"))),
        };
        ui.separator();

        let mode = match state.controller.mode() {
            TransformMode::Translate => t("mode.translate"),
            TransformMode::Rotate => t("mode.rotate"),
            TransformMode::Scale => t("mode.scale"),
        };
        ui.label(format!("{}: {mode}", t("status.mode")));

        if state.assistant.is_loading() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 200, 100), t("status.ai_busy"));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.colored_label(INDIGO_400, concat!("Maker3D v", env!("CARGO_PKG_VERSION")));
        });
    });
}
