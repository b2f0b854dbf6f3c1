//! Transform gizmo: axis handles, hit testing and the drag state machine
//!
//! While a handle is dragged only the controller's live pose changes; the
//! document receives a single patch when the drag is released.

use glam::Vec3;
use shared::{ShapeId, ShapePatch, TransformMode};

use super::camera::ArcBallCamera;
use super::mesh::LineMeshData;
use super::picking::Ray;
use crate::geometry::cache::LivePose;
use crate::geometry::Pose;

/// Smallest scale a drag can produce on any axis
pub const MIN_SCALE: f64 = 0.01;

/// Radians per world unit of pointer travel along a rotate handle
pub const ROTATE_PER_UNIT: f64 = 1.0;

/// Relative scale change per world unit of pointer travel
pub const SCALE_PER_UNIT: f64 = 0.5;

/// Which axis a gizmo handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn index(self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }

    pub fn direction(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }

    fn color(self) -> [f32; 4] {
        match self {
            GizmoAxis::X => [0.9, 0.2, 0.2, 1.0],
            GizmoAxis::Y => [0.2, 0.8, 0.2, 1.0],
            GizmoAxis::Z => [0.2, 0.3, 0.9, 1.0],
        }
    }
}

/// A drag in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub id: ShapeId,
    pub axis: GizmoAxis,
    /// Mode captured when the drag began
    pub mode: TransformMode,
    pub start: Pose,
    pub live: Pose,
    /// Total axis delta since the drag began
    accumulated: f64,
}

/// Manipulator state: the current mode and at most one active drag
#[derive(Debug, Default)]
pub struct TransformController {
    mode: TransformMode,
    drag: Option<ActiveDrag>,
}

impl TransformController {
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Switch the manipulation kind. Poses are not touched; an active drag
    /// keeps the mode it started with.
    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.drag.as_ref()
    }

    pub fn begin_drag(&mut self, id: impl Into<ShapeId>, axis: GizmoAxis, start: Pose) {
        self.drag = Some(ActiveDrag {
            id: id.into(),
            axis,
            mode: self.mode,
            start,
            live: start,
            accumulated: 0.0,
        });
    }

    /// Feed a movement along the dragged axis (world units for translate,
    /// radians for rotate, relative factor for scale)
    pub fn drag(&mut self, axis_delta: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.accumulated += axis_delta;
        drag.live = apply_axis_delta(&drag.start, drag.mode, drag.axis, drag.accumulated);
    }

    /// End the drag. Returns the patch to write into the document, or
    /// `None` when nothing moved.
    pub fn release(&mut self) -> Option<(ShapeId, ShapePatch)> {
        let drag = self.drag.take()?;
        if drag.live == drag.start {
            return None;
        }
        let pose = drag.live;
        Some((drag.id, ShapePatch::pose(pose.position, pose.rotation, pose.scale)))
    }

    /// Drop the live pose; the document keeps its stored values
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// Override for the renderer while dragging
    pub fn live_pose(&self) -> Option<LivePose> {
        self.drag.as_ref().map(|d| LivePose {
            id: d.id.clone(),
            pose: d.live,
        })
    }
}

/// Pose after moving `delta` along `axis` in the given mode
pub fn apply_axis_delta(start: &Pose, mode: TransformMode, axis: GizmoAxis, delta: f64) -> Pose {
    let mut pose = *start;
    let i = axis.index();
    match mode {
        TransformMode::Translate => pose.position[i] += delta,
        TransformMode::Rotate => pose.rotation[i] += delta,
        TransformMode::Scale => pose.scale[i] = scale_axis(start.scale[i], delta),
    }
    pose
}

/// Grow or shrink one scale component by `1 + delta`. The magnitude never
/// drops below [`MIN_SCALE`] and a mirrored axis stays mirrored.
fn scale_axis(start: f64, delta: f64) -> f64 {
    let scaled = start * (1.0 + delta).max(0.0);
    if scaled.abs() < MIN_SCALE {
        MIN_SCALE.copysign(start)
    } else {
        scaled
    }
}

/// Convert pointer travel along an axis (world units) into the amount
/// [`TransformController::drag`] expects for `mode`
pub fn drag_amount(mode: TransformMode, world_delta: f32) -> f64 {
    let delta = world_delta as f64;
    match mode {
        TransformMode::Translate => delta,
        TransformMode::Rotate => delta * ROTATE_PER_UNIT,
        TransformMode::Scale => delta * SCALE_PER_UNIT,
    }
}

/// Test if a ray hits one of the gizmo axes.
/// Returns the axis if the ray passes within `threshold` distance of an axis line.
pub fn gizmo_hit_test(ray: &Ray, center: Vec3, axis_length: f32) -> Option<GizmoAxis> {
    let threshold = 0.15 * axis_length.max(1.0);
    let mut best: Option<(GizmoAxis, f32)> = None;

    for axis in GizmoAxis::ALL {
        let line_start = center;
        let line_end = center + axis.direction() * axis_length;

        let dist = ray_line_distance(ray, line_start, line_end);

        if dist < threshold && best.as_ref().is_none_or(|(_, d)| dist < *d) {
            best = Some((axis, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// Signed movement along `axis` for a screen-space drag, in world units.
/// Projects the screen-space drag delta along the axis direction in screen space.
pub fn compute_drag_delta(
    camera: &ArcBallCamera,
    center: Vec3,
    axis: GizmoAxis,
    screen_delta: egui::Vec2,
    rect: egui::Rect,
) -> f32 {
    let axis_dir = axis.direction();

    // Project axis direction to screen space
    let p0 = camera.project(center.to_array(), rect);
    let p1 = camera.project((center + axis_dir).to_array(), rect);

    let (Some(screen_p0), Some(screen_p1)) = (p0, p1) else {
        return 0.0;
    };

    let screen_axis = egui::vec2(screen_p1.x - screen_p0.x, screen_p1.y - screen_p0.y);
    let screen_axis_len = screen_axis.length();

    if screen_axis_len < 1.0 {
        return 0.0;
    }

    let screen_axis_norm = screen_axis / screen_axis_len;

    // Dot product of screen drag delta with screen axis direction
    let projected = screen_delta.dot(screen_axis_norm);

    // Convert back to world units: 1 world unit = screen_axis_len pixels
    projected / screen_axis_len
}

/// Gizmo lines at `center`: one handle per axis, tipped with an arrow
/// (translate), a ring (rotate) or a box (scale). The dragged axis is drawn
/// in yellow.
pub fn build_gizmo_lines(
    center: Vec3,
    length: f32,
    mode: TransformMode,
    active: Option<GizmoAxis>,
) -> LineMeshData {
    let mut lines = LineMeshData::default();
    let tip_size = length * 0.15;

    for axis in GizmoAxis::ALL {
        let color = if active == Some(axis) {
            [1.0, 0.85, 0.2, 1.0]
        } else {
            axis.color()
        };
        let dir = axis.direction();
        let tip = center + dir * length;
        // Two unit vectors perpendicular to the axis
        let (u, v) = match axis {
            GizmoAxis::X => (Vec3::Y, Vec3::Z),
            GizmoAxis::Y => (Vec3::X, Vec3::Z),
            GizmoAxis::Z => (Vec3::X, Vec3::Y),
        };

        lines.push_segment(center, tip, color);

        match mode {
            TransformMode::Translate => {
                let back = tip - dir * tip_size;
                lines.push_segment(tip, back + u * tip_size * 0.5, color);
                lines.push_segment(tip, back - u * tip_size * 0.5, color);
                lines.push_segment(tip, back + v * tip_size * 0.5, color);
                lines.push_segment(tip, back - v * tip_size * 0.5, color);
            }
            TransformMode::Rotate => {
                const SEGMENTS: usize = 24;
                let ring = |i: usize| {
                    let a = (i % SEGMENTS) as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                    tip + (u * a.cos() + v * a.sin()) * tip_size
                };
                for i in 0..SEGMENTS {
                    lines.push_segment(ring(i), ring(i + 1), color);
                }
            }
            TransformMode::Scale => {
                let h = tip_size * 0.5;
                let corners = [
                    tip + (u + v) * h,
                    tip + (u - v) * h,
                    tip + (-u - v) * h,
                    tip + (-u + v) * h,
                ];
                for i in 0..4 {
                    let a = corners[i];
                    let b = corners[(i + 1) % 4];
                    lines.push_segment(a, b, color);
                    lines.push_segment(a - dir * tip_size, b - dir * tip_size, color);
                    lines.push_segment(a, a - dir * tip_size, color);
                }
            }
        }
    }

    lines
}

/// Minimum distance between a ray and a line segment.
pub fn ray_line_distance(ray: &Ray, line_start: Vec3, line_end: Vec3) -> f32 {
    let u = ray.direction;
    let v = line_end - line_start;
    let w = ray.origin - line_start;

    let a = u.dot(u); // always >= 0
    let b = u.dot(v);
    let c = v.dot(v); // always >= 0
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;

    let (sc, tc);

    if denom < 1e-7 {
        // Nearly parallel
        sc = 0.0;
        tc = if b > c { d / b } else { e / c };
    } else {
        sc = (b * e - c * d) / denom;
        tc = (a * e - b * d) / denom;
    }

    // Clamp tc to [0,1] (line segment)
    let tc = tc.clamp(0.0, 1.0);
    // Only consider positive ray parameter
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_line = line_start + v * tc;

    (closest_ray - closest_line).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{UNIT_SCALE, ZERO_ROTATION};

    fn start() -> Pose {
        Pose {
            position: [1.0, 0.5, 0.0],
            rotation: ZERO_ROTATION,
            scale: UNIT_SCALE,
        }
    }

    #[test]
    fn test_translate_drag_then_release() {
        let mut controller = TransformController::default();
        controller.begin_drag("a", GizmoAxis::X, start());
        controller.drag(0.5);
        controller.drag(0.25);

        let live = controller.live_pose().unwrap();
        assert_eq!(live.id, "a");
        assert_eq!(live.pose.position, [1.75, 0.5, 0.0]);

        let (id, patch) = controller.release().unwrap();
        assert_eq!(id, "a");
        assert_eq!(patch.position, Some([1.75, 0.5, 0.0]));
        assert_eq!(patch.rotation, Some(ZERO_ROTATION));
        assert_eq!(patch.scale, Some(UNIT_SCALE));
        assert!(!controller.is_dragging());
        assert!(controller.live_pose().is_none());
    }

    #[test]
    fn test_rotate_adds_radians() {
        let mut controller = TransformController::default();
        controller.set_mode(TransformMode::Rotate);
        controller.begin_drag("a", GizmoAxis::Y, start());
        controller.drag(std::f64::consts::FRAC_PI_2);
        let pose = controller.live_pose().unwrap().pose;
        assert_eq!(pose.rotation, [0.0, std::f64::consts::FRAC_PI_2, 0.0]);
        assert_eq!(pose.position, start().position);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut controller = TransformController::default();
        controller.set_mode(TransformMode::Scale);
        controller.begin_drag("a", GizmoAxis::Z, start());
        controller.drag(1.0);
        assert_eq!(controller.live_pose().unwrap().pose.scale, [1.0, 1.0, 2.0]);
        controller.drag(-5.0);
        assert_eq!(controller.live_pose().unwrap().pose.scale, [1.0, 1.0, MIN_SCALE]);
    }

    #[test]
    fn test_scale_keeps_mirrored_sign() {
        let mirrored = Pose {
            scale: [-1.0, 1.0, 1.0],
            ..start()
        };
        let mut controller = TransformController::default();
        controller.set_mode(TransformMode::Scale);
        controller.begin_drag("a", GizmoAxis::X, mirrored);
        controller.drag(0.1);
        let scale = controller.live_pose().unwrap().pose.scale;
        assert!((scale[0] + 1.1).abs() < 1e-12, "got {scale:?}");

        controller.drag(-3.0);
        assert_eq!(controller.live_pose().unwrap().pose.scale[0], -MIN_SCALE);

        let (_, patch) = controller.release().unwrap();
        assert_eq!(patch.scale, Some([-MIN_SCALE, 1.0, 1.0]));
    }

    #[test]
    fn test_cancel_and_no_move_release() {
        let mut controller = TransformController::default();
        controller.begin_drag("a", GizmoAxis::X, start());
        assert!(controller.release().is_none());

        controller.begin_drag("a", GizmoAxis::X, start());
        controller.drag(2.0);
        controller.cancel();
        assert!(controller.release().is_none());
    }

    #[test]
    fn test_mode_change_mid_drag_keeps_drag_mode() {
        let mut controller = TransformController::default();
        controller.begin_drag("a", GizmoAxis::X, start());
        controller.set_mode(TransformMode::Scale);
        controller.drag(1.0);
        let pose = controller.live_pose().unwrap().pose;
        assert_eq!(pose.position[0], 2.0);
        assert_eq!(pose.scale, UNIT_SCALE);
        assert_eq!(controller.mode(), TransformMode::Scale);
    }

    #[test]
    fn test_hit_test_picks_axis() {
        let ray = Ray {
            origin: Vec3::new(0.8, 0.05, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(gizmo_hit_test(&ray, Vec3::ZERO, 1.2), Some(GizmoAxis::X));

        let miss = Ray {
            origin: Vec3::new(3.0, 3.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(gizmo_hit_test(&miss, Vec3::ZERO, 1.2), None);
    }

    #[test]
    fn test_drag_delta_follows_screen_axis() {
        let camera = ArcBallCamera::new();
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        // Y points up on screen, so dragging the mouse up moves along +Y
        let up = compute_drag_delta(&camera, Vec3::ZERO, GizmoAxis::Y, egui::vec2(0.0, -50.0), rect);
        let down = compute_drag_delta(&camera, Vec3::ZERO, GizmoAxis::Y, egui::vec2(0.0, 50.0), rect);
        assert!(up > 0.0);
        assert!((up + down).abs() < 1e-5);
    }

    #[test]
    fn test_gizmo_lines_per_mode() {
        let translate = build_gizmo_lines(Vec3::ZERO, 1.0, TransformMode::Translate, None);
        let rotate = build_gizmo_lines(Vec3::ZERO, 1.0, TransformMode::Rotate, None);
        let scale = build_gizmo_lines(Vec3::ZERO, 1.0, TransformMode::Scale, Some(GizmoAxis::X));
        assert_eq!(translate.vertex_count(), 3 * 5 * 2);
        assert_eq!(rotate.vertex_count(), 3 * 25 * 2);
        assert_eq!(scale.vertex_count(), 3 * 13 * 2);
        // Active axis highlighted
        assert_eq!(scale.vertices[3..7], [1.0_f32, 0.85, 0.2, 1.0]);
    }

    #[test]
    fn test_drag_amount_per_mode() {
        assert_eq!(drag_amount(TransformMode::Translate, 2.0), 2.0);
        assert_eq!(drag_amount(TransformMode::Rotate, 0.5), 0.5 * ROTATE_PER_UNIT);
        assert_eq!(drag_amount(TransformMode::Scale, 1.0), SCALE_PER_UNIT);
    }
}
