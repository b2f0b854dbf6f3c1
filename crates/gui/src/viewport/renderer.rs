//! Wireframe rendering for the viewport when no GL context is available

use egui::{Color32, Rect, Stroke, Ui};

use super::camera::ArcBallCamera;
use super::mesh::{LineMeshData, MeshData};
use crate::geometry::MeshCache;
use crate::state::settings::{AxisSettings, GridSettings};
use crate::state::AppState;

/// Paint the 3D viewport using egui's painter (wireframe rendering)
pub fn paint_viewport(
    ui: &Ui,
    rect: Rect,
    camera: &ArcBallCamera,
    state: &AppState,
    cache: &MeshCache,
    gizmo: Option<&LineMeshData>,
) {
    let painter = ui.painter_at(rect);

    let bg = &state.settings.viewport.background_color;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

    if state.settings.grid.visible {
        draw_grid(&painter, rect, camera, &state.settings.grid);
    }
    if state.settings.axes.visible {
        draw_axes(&painter, rect, camera, &state.settings.axes);
    }

    for (_, mesh) in cache.ordered() {
        draw_mesh_edges(&painter, rect, camera, mesh);
    }

    if let Some(lines) = gizmo {
        draw_lines(&painter, rect, camera, lines, 2.0);
    }
}

fn draw_grid(painter: &egui::Painter, rect: Rect, camera: &ArcBallCamera, settings: &GridSettings) {
    let alpha = (settings.opacity * 255.0) as u8;
    let stroke = Stroke::new(0.5, Color32::from_rgba_unmultiplied(90, 90, 100, alpha));

    let range = settings.range;
    let step = settings.size;
    let extent = range as f32 * step;

    for i in -range..=range {
        let f = i as f32 * step;
        draw_line_3d(painter, rect, camera, [f, 0.0, -extent], [f, 0.0, extent], stroke);
        draw_line_3d(painter, rect, camera, [-extent, 0.0, f], [extent, 0.0, f], stroke);
    }
}

fn draw_axes(painter: &egui::Painter, rect: Rect, camera: &ArcBallCamera, settings: &AxisSettings) {
    let len = settings.length;
    let axes = [
        ([len, 0.0, 0.0], Color32::from_rgb(220, 50, 50)),
        ([0.0, len, 0.0], Color32::from_rgb(50, 200, 50)),
        ([0.0, 0.0, len], Color32::from_rgb(50, 100, 220)),
    ];
    for (end, color) in axes {
        draw_line_3d(painter, rect, camera, [0.0; 3], end, Stroke::new(2.0, color));
    }
}

/// Triangle edges tinted with the first vertex color
fn draw_mesh_edges(painter: &egui::Painter, rect: Rect, camera: &ArcBallCamera, mesh: &MeshData) {
    let color = match mesh.vertices.get(6..9) {
        Some(&[r, g, b]) => Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8),
        _ => Color32::LIGHT_GRAY,
    };
    let stroke = Stroke::new(1.0, color);
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a.to_array(), b.to_array(), c.to_array());
        draw_line_3d(painter, rect, camera, a, b, stroke);
        draw_line_3d(painter, rect, camera, b, c, stroke);
        draw_line_3d(painter, rect, camera, c, a, stroke);
    }
}

fn draw_lines(painter: &egui::Painter, rect: Rect, camera: &ArcBallCamera, lines: &LineMeshData, width: f32) {
    for segment in lines.vertices.chunks_exact(14) {
        let c = &segment[3..7];
        let color = Color32::from_rgba_unmultiplied(
            (c[0] * 255.0) as u8,
            (c[1] * 255.0) as u8,
            (c[2] * 255.0) as u8,
            (c[3] * 255.0) as u8,
        );
        let a = [segment[0], segment[1], segment[2]];
        let b = [segment[7], segment[8], segment[9]];
        draw_line_3d(painter, rect, camera, a, b, Stroke::new(width, color));
    }
}

fn draw_line_3d(
    painter: &egui::Painter,
    rect: Rect,
    camera: &ArcBallCamera,
    a: [f32; 3],
    b: [f32; 3],
    stroke: Stroke,
) {
    if let (Some(a), Some(b)) = (camera.project(a, rect), camera.project(b, rect)) {
        if rect.contains(a) || rect.contains(b) {
            painter.line_segment([a, b], stroke);
        }
    }
}
