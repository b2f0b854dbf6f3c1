//! Header strip, block palette and manipulation mode switch

use chrono::Utc;
use egui::Ui;
use shared::{ShapeType, TransformMode};

use crate::app::styles::{INDIGO_400, SLATE_400};
use crate::export;
use crate::i18n::{shape_label, t};
use crate::state::AppState;

const PALETTE_COLUMNS: usize = 4;

// ── Public actions (callable from menus too) ─────────────────

/// Ask for a destination and write the scene as binary STL
pub fn action_export_stl(state: &mut AppState) {
    if state.scene.is_empty() {
        tracing::warn!("Export STL: scene is empty");
        return;
    }
    let file_name = export::export_file_name(Utc::now());
    let Some(path) = rfd::FileDialog::new()
        .set_title(t("menu.export_title"))
        .add_filter("STL", &["stl"])
        .set_file_name(&file_name)
        .save_file()
    else {
        return;
    };
    if let Err(e) = export::export_to_path(state.scene.objects(), &path) {
        tracing::error!("{e}");
    }
}

pub fn action_set_mode(state: &mut AppState, mode: TransformMode) {
    state.controller.set_mode(mode);
}

// ── Panels ───────────────────────────────────────────────────

/// Title, subtitle and the export button
pub fn show_header(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(t("app.title"))
                .strong()
                .size(18.0)
                .color(INDIGO_400),
        );
        ui.label(egui::RichText::new(t("app.subtitle")).small().color(SLATE_400));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let enabled = !state.scene.is_empty();
            let response = ui
                .add_enabled(enabled, egui::Button::new(t("tb.export")))
                .on_disabled_hover_text(t("tb.export_empty"));
            if response.clicked() {
                action_export_stl(state);
            }
        });
    });
}

/// Block stock grid followed by the mode buttons
pub fn show_palette(ui: &mut Ui, state: &mut AppState) {
    ui.label(egui::RichText::new(t("tb.blocks")).strong().color(SLATE_400));
    ui.add_space(2.0);
    egui::Grid::new("block_palette")
        .num_columns(PALETTE_COLUMNS)
        .spacing([4.0, 4.0])
        .show(ui, |ui| {
            for (i, kind) in ShapeType::ALL.into_iter().enumerate() {
                let button = egui::Button::new(shape_label(kind)).min_size(egui::vec2(52.0, 22.0));
                if ui.add(button).clicked() {
                    state.scene.add_from_palette(kind);
                }
                if (i + 1) % PALETTE_COLUMNS == 0 {
                    ui.end_row();
                }
            }
        });

    ui.add_space(8.0);
    ui.label(egui::RichText::new(t("tb.manipulation")).strong().color(SLATE_400));
    ui.horizontal(|ui| {
        let current = state.controller.mode();
        for (mode, label, tip) in [
            (TransformMode::Translate, t("mode.translate"), t("tb.translate")),
            (TransformMode::Rotate, t("mode.rotate"), t("tb.rotate")),
            (TransformMode::Scale, t("mode.scale"), t("tb.scale")),
        ] {
            if ui
                .selectable_label(current == mode, label)
                .on_hover_text(tip)
                .clicked()
            {
                action_set_mode(state, mode);
            }
        }
    });
}
