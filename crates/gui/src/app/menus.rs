//! Application menu bar and settings window

use eframe::egui;
use shared::ShapeType;

use crate::i18n::{lang, set_lang, shape_label, t, Lang};
use crate::state::settings::AppSettings;
use crate::state::AppState;
use crate::ui::toolbar;
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.new")).clicked() {
            state.controller.cancel();
            state.scene.clear();
            state.assistant.clear();
            ui.close_menu();
        }
        ui.separator();
        if ui
            .add_enabled(!state.scene.is_empty(), egui::Button::new(t("menu.export_stl")))
            .clicked()
        {
            ui.close_menu();
            toolbar::action_export_stl(state);
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.edit"), |ui| {
        let has_selection = state.scene.selected_id().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.duplicate")))
            .clicked()
        {
            state.duplicate_selected();
            ui.close_menu();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.delete")))
            .clicked()
        {
            state.delete_selected();
            ui.close_menu();
        }
        ui.separator();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.deselect")))
            .clicked()
        {
            state.scene.select(None);
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.scene_tree, t("menu.scene_tree"));
        ui.checkbox(&mut state.panels.properties, t("menu.properties"));
        ui.checkbox(&mut state.panels.assistant, t("menu.assistant"));
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        let focus_target = state
            .scene
            .selected_id()
            .and_then(|id| viewport.aabb_center(id));
        if ui
            .add_enabled(focus_target.is_some(), egui::Button::new(t("menu.focus")))
            .clicked()
        {
            if let Some(center) = focus_target {
                viewport.focus_on(center);
            }
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, label) in [(Lang::Fr, "Français"), (Lang::En, "English")] {
                if ui.selectable_label(lang() == l, label).clicked() {
                    set_lang(l);
                    state.settings.ui.language = l;
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the create menu
pub fn create_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.create"), |ui| {
        for kind in ShapeType::ALL {
            if ui.button(shape_label(kind)).clicked() {
                state.scene.add_from_palette(kind);
                ui.close_menu();
            }
        }
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    if ui.button(t("menu.settings")).clicked() {
        state.show_settings_window = true;
    }
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let was_open = state.show_settings_window;
    let mut open = was_open;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(400.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_grid_settings(ui, &mut state.settings);
                show_axes_settings(ui, &mut state.settings);
                show_viewport_settings(ui, &mut state.settings);
                show_ui_settings(ui, &mut state.settings);
                show_ai_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    // Closing with the title-bar button keeps the edits
    if was_open && !open {
        state.settings.save();
    }
    state.show_settings_window = open && state.show_settings_window;
}

fn show_grid_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.grid"));
    ui.checkbox(&mut settings.grid.visible, t("settings.grid_visible"));

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_size"));
        ui.add(
            egui::DragValue::new(&mut settings.grid.size)
                .speed(0.1)
                .range(0.1..=10.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_range"));
        ui.add(
            egui::DragValue::new(&mut settings.grid.range)
                .speed(1)
                .range(1..=50),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_opacity"));
        ui.add(egui::Slider::new(&mut settings.grid.opacity, 0.0..=1.0));
    });
    ui.add_space(10.0);
}

fn show_axes_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.axes"));
    ui.checkbox(&mut settings.axes.visible, t("settings.axes_visible"));
    ui.checkbox(&mut settings.axes.show_labels, t("settings.axes_labels"));

    ui.horizontal(|ui| {
        ui.label(t("settings.axes_length"));
        ui.add(
            egui::DragValue::new(&mut settings.axes.length)
                .speed(0.1)
                .range(0.1..=10.0),
        );
    });
    ui.add_space(10.0);
}

fn show_viewport_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bg_color"));
        let [r, g, b] = settings.viewport.background_color;
        let mut color = egui::Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            settings.viewport.background_color = [color.r(), color.g(), color.b()];
        }
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.gizmo_size"));
        ui.add(
            egui::DragValue::new(&mut settings.viewport.gizmo_size)
                .speed(0.05)
                .range(0.3..=5.0),
        );
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_ai_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ai"));
    let before = state.settings.ai.clone();
    egui::Grid::new("ai_settings_grid").num_columns(2).show(ui, |ui| {
        ui.label(t("settings.ai_model"));
        ui.text_edit_singleline(&mut state.settings.ai.model);
        ui.end_row();
        ui.label(t("settings.ai_endpoint"));
        ui.text_edit_singleline(&mut state.settings.ai.endpoint);
        ui.end_row();
    });
    ui.small(t("settings.ai_key_hint"));
    if state.settings.ai != before {
        // Next request rebuilds the backend from the new values
        state.assistant.reset_backend();
    }
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = AppSettings::default();
            set_lang(state.settings.ui.language);
            state.assistant.reset_backend();
        }
        if ui.button(t("settings.close")).clicked() {
            state.settings.save();
            state.show_settings_window = false;
        }
    });
}
