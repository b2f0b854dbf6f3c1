//! Mesh validation utilities.
//!
//! `MeshValidator` checks mesh data integrity: stride, in-range indices,
//! normalized normals, AABB dimensions, and the properties a printable
//! mesh needs (closed surface, outward winding, no degenerate triangles).

use std::collections::HashMap;

use glam::Vec3;

use crate::viewport::mesh::{MeshData, MESH_STRIDE};
use crate::viewport::picking::Aabb;

/// Positions closer than this are treated as the same vertex when
/// matching edges
const WELD_EPSILON: f32 = 1e-4;

type PointKey = (i64, i64, i64);

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Check that the vertex buffer length is a multiple of 9 (the stride).
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % MESH_STRIDE == 0
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    pub fn are_values_finite(&self) -> bool {
        self.mesh.vertices.iter().all(|v| v.is_finite())
    }

    /// Check that all vertex normals have unit length (within epsilon).
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.mesh.vertices.chunks_exact(MESH_STRIDE).all(|v| {
            let len = Vec3::new(v[3], v[4], v[5]).length();
            (len - 1.0).abs() <= epsilon
        })
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (dims[0] - expected[0]).abs() < tolerance
            && (dims[1] - expected[1]).abs() < tolerance
            && (dims[2] - expected[2]).abs() < tolerance
    }

    /// Check whether the first vertex carries the given color.
    pub fn has_color(&self, rgb: [f32; 3]) -> bool {
        if self.vertex_count() == 0 {
            return false;
        }
        let c = &self.mesh.vertices[6..9];
        (c[0] - rgb[0]).abs() < 0.01 && (c[1] - rgb[1]).abs() < 0.01 && (c[2] - rgb[2]).abs() < 0.01
    }

    /// Triangles whose area is (numerically) zero
    pub fn degenerate_triangle_count(&self) -> usize {
        self.mesh
            .triangles()
            .filter(|[a, b, c]| (*b - *a).cross(*c - *a).length() < 1e-10)
            .count()
    }

    /// Directed edges without a matching opposite edge.
    ///
    /// In a closed, consistently wound surface every edge a→b is paired
    /// with exactly one b→a from the neighbouring triangle.
    pub fn open_edge_count(&self) -> usize {
        let mut edges: HashMap<(PointKey, PointKey), i32> = HashMap::new();
        for [a, b, c] in self.mesh.triangles() {
            let (ka, kb, kc) = (point_key(a), point_key(b), point_key(c));
            for (from, to) in [(ka, kb), (kb, kc), (kc, ka)] {
                if from == to {
                    continue;
                }
                *edges.entry((from, to)).or_default() += 1;
            }
        }

        edges
            .iter()
            .filter(|((from, to), count)| edges.get(&(*to, *from)).copied().unwrap_or(0) != **count)
            .count()
    }

    pub fn is_closed(&self) -> bool {
        self.open_edge_count() == 0
    }

    /// Enclosed volume from the divergence theorem; positive when the
    /// triangles are wound outward.
    pub fn signed_volume(&self) -> f32 {
        self.mesh
            .triangles()
            .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
            .sum()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of 9",
                self.mesh.vertices.len()
            ));
            // Everything below assumes whole vertices
            return errors;
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
            return errors;
        }

        if !self.are_values_finite() {
            errors.push("Vertex buffer contains NaN or infinite values".to_string());
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        let degenerate = self.degenerate_triangle_count();
        if degenerate > 0 {
            errors.push(format!("{degenerate} degenerate triangles"));
        }

        errors
    }
}

fn point_key(p: Vec3) -> PointKey {
    (
        (p.x / WELD_EPSILON).round() as i64,
        (p.y / WELD_EPSILON).round() as i64,
        (p.z / WELD_EPSILON).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_triangle() -> MeshData {
        MeshData {
            vertices: vec![
                // vertex 0: pos(0,0,0) normal(0,0,1) color(0.5,0.5,0.5)
                0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
                // vertex 1: pos(1,0,0) normal(0,0,1) color(0.5,0.5,0.5)
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
                // vertex 2: pos(0,1,0) normal(0,0,1) color(0.5,0.5,0.5)
                0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_counts() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.vertex_count(), 3);
        assert_eq!(v.triangle_count(), 1);
    }

    #[test]
    fn test_stride_invalid() {
        let bad = MeshData {
            vertices: vec![0.0; 10], // not multiple of 9
            indices: vec![],
        };
        let v = MeshValidator::new(&bad);
        assert!(!v.is_stride_valid());
        assert!(v.validate_all().iter().any(|e| e.contains("multiple of 9")));
    }

    #[test]
    fn test_indices_out_of_range() {
        let bad = MeshData {
            vertices: vec![0.0; 9], // 1 vertex
            indices: vec![0, 5, 2],
        };
        let v = MeshValidator::new(&bad);
        assert!(!v.are_indices_in_range());
        assert!(v.validate_all().iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_normals_not_normalized() {
        let bad = MeshData {
            vertices: vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.5, 0.5, 0.5, // normal length = 5
            ],
            indices: vec![],
        };
        let v = MeshValidator::new(&bad);
        assert!(!v.are_normals_normalized(0.01));
    }

    #[test]
    fn test_dimensions() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert!(v.assert_dimensions_approx([1.0, 1.0, 0.0], 0.01));
        assert!(!v.assert_dimensions_approx([2.0, 1.0, 0.0], 0.01));
    }

    #[test]
    fn test_has_color() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert!(v.has_color([0.5, 0.5, 0.5]));
        assert!(!v.has_color([0.3, 0.7, 0.9]));
    }

    #[test]
    fn test_single_triangle_is_open() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.open_edge_count(), 3);
        assert!(!v.is_closed());
        assert!(v.validate_all().is_empty());
    }

    #[test]
    fn test_degenerate_triangle_detected() {
        let mut mesh = simple_triangle();
        // Collapse vertex 2 onto vertex 1
        mesh.vertices[18] = 1.0;
        mesh.vertices[19] = 0.0;
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.degenerate_triangle_count(), 1);
        assert!(v.validate_all().iter().any(|e| e.contains("degenerate")));
    }
}
