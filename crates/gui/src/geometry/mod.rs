//! Shape geometry shared by the viewport and the STL exporter
//!
//! Both consumers go through [`build_local_mesh`] and [`pose_matrix`], so
//! what is printed is exactly what is on screen.

pub mod cache;
pub mod primitives;

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{parse_hex_color, ShapeObject, ShapeType, DEFAULT_COLOR};

pub use cache::MeshCache;
pub use primitives::PrimitiveSpec;

use crate::viewport::mesh::MeshData;

/// Position, Euler rotation (radians, XYZ order) and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Pose {
    pub fn of(shape: &ShapeObject) -> Self {
        Self {
            position: shape.position,
            rotation: shape.rotation,
            scale: shape.scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        pose_matrix(self.position, self.rotation, self.scale)
    }
}

/// Local→world matrix: scale, then rotate (Euler XYZ), then translate
pub fn pose_matrix(position: [f64; 3], rotation: [f64; 3], scale: [f64; 3]) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        rotation[0] as f32,
        rotation[1] as f32,
        rotation[2] as f32,
    );
    Mat4::from_scale_rotation_translation(to_vec3(scale), rotation, to_vec3(position))
}

pub fn to_vec3(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32)
}

/// Local-space mesh of a kind, centered on the origin
pub fn build_local_mesh(kind: ShapeType, color: [f32; 3]) -> MeshData {
    PrimitiveSpec::for_type(kind).build(color)
}

/// World-space mesh of a shape at its stored pose
pub fn build_world_mesh(shape: &ShapeObject) -> MeshData {
    build_local_mesh(shape.kind, color_to_rgb(&shape.color)).transformed(&Pose::of(shape).matrix())
}

/// Hex color to linear-ish RGB floats. Unparseable strings render in the
/// default color.
pub fn color_to_rgb(hex: &str) -> [f32; 3] {
    let rgb = parse_hex_color(hex)
        .or_else(|| parse_hex_color(DEFAULT_COLOR))
        .unwrap_or([0x63, 0x66, 0xf1]);
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

/// Selection highlight: the shape's own color pushed toward white,
/// the way an emissive term lifts a lit surface
pub fn highlight(color: [f32; 3]) -> [f32; 3] {
    color.map(|c| (c * 1.5 + 0.15).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_pose_matrix_order() {
        // Scale X by 2, rotate 90° about Z, move up 1: local +X ends at (0, 3, 0)
        let m = pose_matrix([0.0, 1.0, 0.0], [0.0, 0.0, FRAC_PI_2], [2.0, 1.0, 1.0]);
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-5, "{p}");
    }

    #[test]
    fn test_euler_xyz_order() {
        // XYZ order composes as Rx * Ry * Rz
        let m = pose_matrix([0.0; 3], [FRAC_PI_2, FRAC_PI_2, 0.0], [1.0; 3]);
        let expected = glam::Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2)
            * glam::Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let p = m.transform_point3(Vec3::X);
        let q = expected.transform_point3(Vec3::X);
        assert!((p - q).length() < 1e-5, "{p} vs {q}");
    }

    #[test]
    fn test_world_mesh_uses_pose() {
        let shape = ShapeObject {
            id: "a".into(),
            kind: ShapeType::Box,
            position: [5.0, 0.5, 0.0],
            rotation: [0.0; 3],
            scale: [2.0, 1.0, 1.0],
            color: "#ff0000".into(),
            name: "Box #1".into(),
        };
        let mesh = build_world_mesh(&shape);
        let aabb = crate::viewport::picking::Aabb::from_mesh(&mesh);
        assert!((aabb.min - Vec3::new(4.0, 0.0, -0.5)).length() < 1e-5);
        assert!((aabb.max - Vec3::new(6.0, 1.0, 0.5)).length() < 1e-5);
        assert_eq!(&mesh.vertices[6..9], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bad_color_falls_back() {
        assert_eq!(color_to_rgb("not a color"), color_to_rgb(DEFAULT_COLOR));
    }

    #[test]
    fn test_highlight_is_brighter() {
        let base = color_to_rgb(DEFAULT_COLOR);
        let lit = highlight(base);
        for i in 0..3 {
            assert!(lit[i] >= base[i]);
        }
        assert_eq!(highlight([1.0, 1.0, 1.0]), [1.0, 1.0, 1.0]);
    }
}
