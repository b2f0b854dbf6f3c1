//! Main application module

mod keyboard;
mod menus;
pub mod styles;

use eframe::egui;
use shared::ShapeObject;

use crate::i18n::set_lang;
use crate::state::AppState;
use crate::ui::{assistant_panel, properties, scene_tree, status_bar, toolbar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct Maker3dApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl Maker3dApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_shapes: Option<Vec<ShapeObject>>) -> Self {
        let mut state = AppState::default();
        set_lang(state.settings.ui.language);

        if let Some(shapes) = initial_shapes {
            state.scene.add_many(shapes);
        }

        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
        }
    }
}

impl eframe::App for Maker3dApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        if let Some(ids) = self.state.poll_assistant() {
            tracing::info!("Assistant added {} shape(s)", ids.len());
        }

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::edit_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
                menus::create_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Header ────────────────────────────────────────────
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(10, 6))
                    .fill(styles::SLATE_900),
            )
            .show(ctx, |ui| {
                toolbar::show_header(ui, &mut self.state);
            });

        // ── Status bar ───────────────────────────────────────
        let triangle_count = self.viewport.triangle_count();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, triangle_count);
            });

        // ── Left panel: palette + explorer ───────────────────
        egui::SidePanel::left("sidebar")
            .default_width(260.0)
            .width_range(220.0..=420.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)))
            .show(ctx, |ui| {
                toolbar::show_palette(ui, &mut self.state);
                if self.state.panels.scene_tree {
                    ui.add_space(8.0);
                    scene_tree::show(ui, &mut self.state);
                }
            });

        // ── Right panel: Properties + Assistant ──────────────
        self.show_right_panel(ctx);

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        self.state.settings.save();
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}

impl Maker3dApp {
    fn show_right_panel(&mut self, ctx: &egui::Context) {
        let show_props = self.state.panels.properties;
        let show_assistant = self.state.panels.assistant;
        if !show_props && !show_assistant {
            return;
        }

        egui::SidePanel::right("right_panel")
            .default_width(300.0)
            .width_range(220.0..=500.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)))
            .show(ctx, |ui| {
                if show_assistant {
                    assistant_panel::show(ui, &mut self.state);
                }
                if show_props && show_assistant {
                    ui.add_space(4.0);
                    ui.separator();
                    ui.add_space(4.0);
                }
                if show_props {
                    egui::ScrollArea::vertical()
                        .id_salt("props_scroll")
                        .show(ui, |ui| {
                            properties::show(ui, &mut self.state);
                        });
                }
            });
    }
}
