//! Viewport overlays: axis labels, navigation hint and the name editor

use egui::Painter;
use shared::ShapePatch;

use super::camera::ArcBallCamera;
use crate::app::styles::{SLATE_400, SLATE_800};
use crate::i18n::t;
use crate::state::AppState;

/// Draw axis labels at the tips of the world axes
pub fn draw_axis_labels(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera, length: f32) {
    let tip = length + 0.1;
    let labels = [
        ([tip, 0.0, 0.0], "X", egui::Color32::from_rgb(220, 70, 70)),
        ([0.0, tip, 0.0], "Y", egui::Color32::from_rgb(70, 200, 70)),
        ([0.0, 0.0, tip], "Z", egui::Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in &labels {
        if let Some(screen) = camera.project(*pos, rect) {
            if rect.contains(screen) {
                painter.text(
                    screen,
                    egui::Align2::LEFT_BOTTOM,
                    *label,
                    egui::FontId::monospace(12.0),
                    *color,
                );
            }
        }
    }
}

/// Mouse controls reminder along the bottom edge
pub fn draw_nav_hint(painter: &Painter, rect: egui::Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 12.0),
        egui::Align2::CENTER_BOTTOM,
        t("status.nav_hint"),
        egui::FontId::proportional(11.0),
        SLATE_400,
    );
}

/// Floating name field in the top-left corner while a shape is selected
pub fn name_editor(ui: &mut egui::Ui, rect: egui::Rect, state: &mut AppState) {
    let Some(shape) = state.scene.selected() else {
        return;
    };
    let id = shape.id.clone();
    let mut name = shape.name.clone();

    let changed = egui::Area::new(egui::Id::new("viewport_name_editor"))
        .fixed_pos(rect.min + egui::vec2(12.0, 12.0))
        .order(egui::Order::Foreground)
        .show(ui.ctx(), |ui| {
            egui::Frame::NONE
                .fill(SLATE_800)
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::same(6))
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut name)
                            .hint_text(t("viewport.name_hint"))
                            .desired_width(180.0),
                    )
                    .changed()
                })
                .inner
        })
        .inner;

    if changed {
        state.scene.update(&id, &ShapePatch::name(name));
    }
}
