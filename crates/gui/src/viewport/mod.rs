//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
mod overlays;
mod renderer;

pub use maker3d_gui_lib::viewport::{camera, gizmo, mesh, picking};

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::geometry::{to_vec3, MeshCache, Pose};
use crate::state::AppState;
use camera::ArcBallCamera;
use gizmo::{build_gizmo_lines, compute_drag_delta, drag_amount, gizmo_hit_test};
use gl_renderer::GlRenderer;
use mesh::{LineMeshData, MeshData};

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    cache: MeshCache,
    /// Meshes handed to the paint callback, shared until the cache rebuilds
    snapshot: Arc<Vec<MeshData>>,
    snapshot_version: Option<u64>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            gl_renderer: None,
            cache: MeshCache::new(),
            snapshot: Arc::new(Vec::new()),
            snapshot_version: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer unavailable, using wireframe fallback: {e}"),
        }
    }

    /// Release GPU resources
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    /// Focus camera on a specific point
    pub fn focus_on(&mut self, target: glam::Vec3) {
        self.camera.focus(target);
    }

    /// Get the AABB center of a cached object (if available)
    pub fn aabb_center(&self, id: &str) -> Option<glam::Vec3> {
        self.cache.aabbs().get(id).map(|aabb| aabb.center())
    }

    /// Triangles currently on screen
    pub fn triangle_count(&self) -> usize {
        self.cache.triangle_count()
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Gizmo and camera controls ─────────────────────────────
        self.handle_gizmo_and_camera(&response, ui, rect, state);

        // ── Scroll zoom ─────────────────────────────
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.01);
            }
        }

        // ── Meshes BEFORE selection so picking sees the current frame ────
        self.refresh_meshes(state);

        // ── Object selection via click ──────────────────────────
        self.handle_selection(&response, ui, rect, state);

        if !ui.is_rect_visible(rect) {
            return;
        }

        let gizmo_lines = self.build_gizmo_lines(state);
        self.render(ui, rect, state, gizmo_lines);
        self.draw_overlays(ui, rect, state);
    }

    fn handle_gizmo_and_camera(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        state: &mut AppState,
    ) {
        let alt = ui.input(|i| i.modifiers.alt);

        // ── Gizmo drag handling ─────────────────────────────────
        if let Some(drag) = state.controller.active() {
            let (axis, mode, center) = (drag.axis, drag.mode, to_vec3(drag.live.position));
            if response.dragged_by(egui::PointerButton::Primary) {
                let world_delta =
                    compute_drag_delta(&self.camera, center, axis, response.drag_delta(), rect);
                state.controller.drag(drag_amount(mode, world_delta));
            }
            // One document write per drag, on release
            if response.drag_stopped() || !response.dragged_by(egui::PointerButton::Primary) {
                if let Some((id, patch)) = state.controller.release() {
                    state.scene.update(&id, &patch);
                }
            }
            return;
        }

        // ── Camera controls (only when not dragging gizmo) ──
        if response.dragged_by(egui::PointerButton::Secondary)
            || (response.dragged_by(egui::PointerButton::Primary) && alt)
        {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            self.camera.pan(delta.x * 0.01, delta.y * 0.01);
        }

        // ── Gizmo drag start on LMB drag ───────────────────
        if response.drag_started_by(egui::PointerButton::Primary) && !alt {
            let pointer_pos = response.interact_pointer_pos().or_else(|| response.hover_pos());
            if let (Some(pos), Some(shape)) = (pointer_pos, state.scene.selected()) {
                let ray = self.camera.screen_ray(pos, rect);
                let length = state.settings.viewport.gizmo_size;
                if let Some(axis) = gizmo_hit_test(&ray, to_vec3(shape.position), length) {
                    let (id, pose) = (shape.id.clone(), Pose::of(shape));
                    state.controller.begin_drag(id, axis, pose);
                }
            }
        } else if let (Some(pos), Some(shape)) = (response.hover_pos(), state.scene.selected()) {
            let ray = self.camera.screen_ray(pos, rect);
            let length = state.settings.viewport.gizmo_size;
            if gizmo_hit_test(&ray, to_vec3(shape.position), length).is_some() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
        }
    }

    fn handle_selection(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        state: &mut AppState,
    ) {
        if !response.clicked() || ui.input(|i| i.modifiers.alt) || state.controller.is_dragging() {
            return;
        }

        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };

        let ray = self.camera.screen_ray(pos, rect);

        // Clicking a gizmo handle never changes the selection
        if let Some(shape) = state.scene.selected() {
            let length = state.settings.viewport.gizmo_size;
            if gizmo_hit_test(&ray, to_vec3(shape.position), length).is_some() {
                return;
            }
        }

        // A click on empty space deselects
        let hit = self.cache.pick(&ray);
        state.scene.select(hit.as_deref());
    }

    fn refresh_meshes(&mut self, state: &AppState) {
        let live = state.controller.live_pose();
        self.cache.ensure(
            state.scene.objects(),
            state.scene.selected_id(),
            live.as_ref(),
            state.scene.version(),
        );

        let version = self.cache.rebuild_count();
        if self.snapshot_version != Some(version) {
            self.snapshot = Arc::new(self.cache.ordered_meshes());
            self.snapshot_version = Some(version);
        }
    }

    fn build_gizmo_lines(&self, state: &AppState) -> Option<LineMeshData> {
        let shape = state.scene.selected()?;
        let drag = state.controller.active().filter(|d| d.id == shape.id);
        let center = to_vec3(drag.map_or(shape.position, |d| d.live.position));
        let mode = drag.map_or(state.controller.mode(), |d| d.mode);
        Some(build_gizmo_lines(
            center,
            state.settings.viewport.gizmo_size,
            mode,
            drag.map(|d| d.axis),
        ))
    }

    fn render(
        &self,
        ui: &mut Ui,
        rect: egui::Rect,
        state: &AppState,
        gizmo_lines: Option<LineMeshData>,
    ) {
        let Some(gl_renderer) = &self.gl_renderer else {
            // Fallback: software wireframe rendering
            renderer::paint_viewport(ui, rect, &self.camera, state, &self.cache, gizmo_lines.as_ref());
            return;
        };

        let renderer = gl_renderer.clone();
        let camera = self.camera;
        let meshes = self.snapshot.clone();
        let version = self.snapshot_version.unwrap_or_default();

        let grid_settings = state.settings.grid.clone();
        let axes_settings = state.settings.axes.clone();
        let bg_color = state.settings.viewport.background_color;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer.lock() {
                    r.update_grid(gl, &grid_settings);
                    r.update_axes(gl, &axes_settings);
                    r.sync_meshes(gl, &meshes, version);
                    r.sync_gizmo(gl, gizmo_lines.as_ref());

                    let render_params = gl_renderer::RenderParams {
                        viewport,
                        grid_visible: grid_settings.visible,
                        axes_visible: axes_settings.visible,
                        bg_color,
                    };
                    r.paint(gl, &camera, &render_params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &mut AppState) {
        let painter = ui.painter_at(rect);

        let axes = &state.settings.axes;
        if axes.visible && axes.show_labels {
            overlays::draw_axis_labels(&painter, rect, &self.camera, axes.length);
        }
        overlays::draw_nav_hint(&painter, rect);
        overlays::name_editor(ui, rect, state);
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}
