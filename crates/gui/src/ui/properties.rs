//! Properties panel for the selected shape

use egui::Ui;
use shared::{format_hex_color, parse_hex_color, ShapePatch};

use crate::app::styles::SLATE_400;
use crate::geometry::Pose;
use crate::i18n::{shape_label, t};
use crate::state::{short_id, AppState};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.label(egui::RichText::new(t("props.title")).strong().color(SLATE_400));
    ui.separator();

    let Some(shape) = state.scene.selected().cloned() else {
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("props.no_selection"));
        });
        return;
    };

    // A drag in progress shows its live pose and locks the fields
    let live = state
        .controller
        .live_pose()
        .filter(|l| l.id == shape.id)
        .map(|l| l.pose);
    let dragging = live.is_some();
    let mut pose = live.unwrap_or_else(|| Pose::of(&shape));
    let mut patch = ShapePatch::default();

    egui::Grid::new("shape_props")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(format!("{}:", t("props.id")));
            ui.monospace(short_id(&shape.id)).on_hover_text(&shape.id);
            ui.end_row();

            ui.label(format!("{}:", t("props.type")));
            ui.label(shape_label(shape.kind));
            ui.end_row();

            ui.label(format!("{}:", t("props.name")));
            let mut name = shape.name.clone();
            if ui.text_edit_singleline(&mut name).changed() {
                patch.name = Some(name);
            }
            ui.end_row();

            ui.label(format!("{}:", t("props.color")));
            ui.horizontal(|ui| {
                let rgb = parse_hex_color(&shape.color).unwrap_or([128, 128, 128]);
                let mut color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
                if ui.color_edit_button_srgba(&mut color).changed() {
                    patch.color = Some(format_hex_color([color.r(), color.g(), color.b()]));
                }
                ui.monospace(&shape.color);
            });
            ui.end_row();
        });

    ui.add_space(6.0);
    egui::CollapsingHeader::new(t("props.transform"))
        .id_salt("shape_transform")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_enabled_ui(!dragging, |ui| {
                egui::Grid::new("shape_transform_grid")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(t("props.position"));
                        if vec3_edit(ui, &mut pose.position, 0.05, 1.0) {
                            patch.position = Some(pose.position);
                        }
                        ui.end_row();

                        ui.label(t("props.rotation"));
                        if vec3_edit(ui, &mut pose.rotation, 1.0, 180.0 / std::f64::consts::PI) {
                            patch.rotation = Some(pose.rotation);
                        }
                        ui.end_row();

                        ui.label(t("props.scale"));
                        if vec3_edit(ui, &mut pose.scale, 0.01, 1.0) {
                            patch.scale = Some(pose.scale);
                        }
                        ui.end_row();
                    });
            });
        });

    if !patch.is_empty() {
        state.scene.update(&shape.id, &patch);
    }
}

/// Three drag values for x/y/z; `factor` converts stored units to shown
/// units. Returns true when any component changed.
fn vec3_edit(ui: &mut Ui, values: &mut [f64; 3], speed: f64, factor: f64) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        for value in values.iter_mut() {
            let mut shown = *value * factor;
            if ui
                .add(egui::DragValue::new(&mut shown).speed(speed).max_decimals(3))
                .changed()
            {
                *value = shown / factor;
                changed = true;
            }
        }
    });
    changed
}
