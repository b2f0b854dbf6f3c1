//! Scene explorer: one row per shape in document order

use egui::Ui;
use shared::{parse_hex_color, ShapeId};

use crate::app::styles::{ERROR_RED, INDIGO_600, SLATE_400, SLATE_800};
use crate::i18n::t;
use crate::state::{shape_icon, AppState};

/// Deferred row action, applied after the list is drawn
enum RowAction {
    Select(ShapeId),
    Delete(ShapeId),
    Duplicate(ShapeId),
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.label(
        egui::RichText::new(format!("{} ({})", t("tree.title"), state.scene.len()))
            .strong()
            .color(SLATE_400),
    );
    ui.separator();

    if state.scene.is_empty() {
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("tree.empty"));
        });
        return;
    }

    let selected = state.scene.selected_id().map(str::to_string);
    let mut action = None;

    egui::ScrollArea::vertical()
        .id_salt("scene_tree_scroll")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for shape in state.scene.objects() {
                let is_selected = selected.as_deref() == Some(shape.id.as_str());
                let frame = if is_selected {
                    egui::Frame::NONE
                        .fill(INDIGO_600)
                        .corner_radius(egui::CornerRadius::same(3))
                } else {
                    egui::Frame::NONE.fill(SLATE_800)
                };

                let row = frame
                    .inner_margin(egui::Margin::symmetric(4, 2))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            swatch(ui, &shape.color);
                            let label = ui.add(
                                egui::Label::new(format!("{} {}", shape_icon(shape.kind), shape.name))
                                    .truncate()
                                    .sense(egui::Sense::click()),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let delete = ui
                                    .small_button(egui::RichText::new("x").color(ERROR_RED))
                                    .on_hover_text(t("tree.delete"));
                                if delete.clicked() {
                                    action = Some(RowAction::Delete(shape.id.clone()));
                                }
                            });
                            label
                        })
                        .inner
                    })
                    .inner;

                // The delete button sets its own action first
                if row.clicked() && action.is_none() {
                    action = Some(RowAction::Select(shape.id.clone()));
                }

                row.context_menu(|ui| {
                    if ui.button(t("tree.duplicate")).clicked() {
                        action = Some(RowAction::Duplicate(shape.id.clone()));
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .button(egui::RichText::new(t("tree.delete")).color(ERROR_RED))
                        .clicked()
                    {
                        action = Some(RowAction::Delete(shape.id.clone()));
                        ui.close_menu();
                    }
                });
            }
        });

    match action {
        Some(RowAction::Select(id)) => {
            state.scene.select(Some(&id));
        }
        Some(RowAction::Delete(id)) => {
            if state.controller.active().is_some_and(|d| d.id == id) {
                state.controller.cancel();
            }
            state.scene.remove(&id);
        }
        Some(RowAction::Duplicate(id)) => {
            state.scene.duplicate(&id);
        }
        None => {}
    }
}

/// Small filled square in the shape's color
fn swatch(ui: &mut Ui, hex: &str) {
    let [r, g, b] = parse_hex_color(hex).unwrap_or([128, 128, 128]);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::same(2), egui::Color32::from_rgb(r, g, b));
}
