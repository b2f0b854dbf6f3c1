use glam::{Mat3, Mat4, Vec3};

use super::picking::Aabb;

/// Floats per mesh vertex: position(3) + normal(3) + color(3)
pub const MESH_STRIDE: usize = 9;

/// Floats per line vertex: position(3) + color(4)
pub const LINE_STRIDE: usize = 7;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let o = index * MESH_STRIDE;
        Vec3::new(self.vertices[o], self.vertices[o + 1], self.vertices[o + 2])
    }

    /// Corner positions of every triangle, in index order
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.position(tri[0] as usize),
                self.position(tri[1] as usize),
                self.position(tri[2] as usize),
            ]
        })
    }

    /// Overwrite the color of every vertex
    pub fn recolor(&mut self, color: [f32; 3]) {
        for v in self.vertices.chunks_exact_mut(MESH_STRIDE) {
            v[6..9].copy_from_slice(&color);
        }
    }

    /// Bake a world matrix into a copy of the mesh.
    ///
    /// Normals go through the inverse-transpose; a mirroring matrix
    /// (negative determinant) flips the winding so faces stay outward.
    pub fn transformed(&self, matrix: &Mat4) -> MeshData {
        let linear = Mat3::from_mat4(*matrix);
        let det = linear.determinant();
        let normal_matrix = if det.abs() > 1e-12 {
            linear.inverse().transpose()
        } else {
            linear
        };

        let mut vertices = Vec::with_capacity(self.vertices.len());
        for v in self.vertices.chunks_exact(MESH_STRIDE) {
            let p = matrix.transform_point3(Vec3::new(v[0], v[1], v[2]));
            let n = (normal_matrix * Vec3::new(v[3], v[4], v[5])).normalize_or_zero();
            vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, v[6], v[7], v[8]]);
        }

        let mut indices = self.indices.clone();
        if det < 0.0 {
            for tri in indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }

        MeshData { vertices, indices }
    }

    /// Append another mesh, re-basing its indices
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / LINE_STRIDE
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        push_line_vert(&mut self.vertices, a.x, a.y, a.z, color);
        push_line_vert(&mut self.vertices, b.x, b.y, b.z, color);
    }

    pub fn extend(&mut self, other: &LineMeshData) {
        self.vertices.extend_from_slice(&other.vertices);
    }
}

// ── Grid and axes ────────────────────────────────────────────

pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let origin_color_x = [0.5_f32, 0.2, 0.2, opacity * 0.7];
    let origin_color_z = [0.2_f32, 0.2, 0.5, opacity * 0.7];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 {
            origin_color_z
        } else {
            grid_color
        };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.0, -extent, color);
        push_line_vert(&mut vertices, f, 0.0, extent, color);

        let color = if i == 0 {
            origin_color_x
        } else {
            grid_color
        };
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.0, f, color);
        push_line_vert(&mut vertices, extent, 0.0, f, color);
    }

    LineMeshData { vertices }
}

pub fn axes(length: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];

    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, r);
    push_line_vert(&mut vertices, length, 0.0, 0.0, r);
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, g);
    push_line_vert(&mut vertices, 0.0, length, 0.0, g);
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, b);
    push_line_vert(&mut vertices, 0.0, 0.0, length, b);

    LineMeshData { vertices }
}

// ── Contact shadows ──────────────────────────────────────────

/// Height above the table where the shadow footprint fades out completely
pub const SHADOW_FADE_HEIGHT: f32 = 4.0;
const SHADOW_OPACITY: f32 = 0.45;
const SHADOW_SEGMENTS: usize = 24;
/// Lifted off the grid plane to avoid z-fighting
const SHADOW_Y: f32 = 0.002;

/// Soft dark footprints on the table under each mesh, as a triangle list
/// in the line vertex layout. Shapes further above the table cast fainter
/// shadows; shapes lifted past [`SHADOW_FADE_HEIGHT`] cast none.
pub fn contact_shadows(meshes: &[MeshData]) -> LineMeshData {
    let mut vertices = Vec::new();
    for mesh in meshes {
        if mesh.vertex_count() == 0 {
            continue;
        }
        let aabb = Aabb::from_mesh(mesh);
        let lift = aabb.min.y.max(0.0) / SHADOW_FADE_HEIGHT;
        let alpha = SHADOW_OPACITY * (1.0 - lift);
        if alpha <= 0.0 {
            continue;
        }

        let center = aabb.center();
        let radius_x = aabb.size().x * 0.55;
        let radius_z = aabb.size().z * 0.55;
        let inner = [0.0, 0.0, 0.0, alpha];
        let rim = [0.0, 0.0, 0.0, 0.0];
        for i in 0..SHADOW_SEGMENTS {
            let a0 = i as f32 / SHADOW_SEGMENTS as f32 * std::f32::consts::TAU;
            let a1 = (i + 1) as f32 / SHADOW_SEGMENTS as f32 * std::f32::consts::TAU;
            push_line_vert(&mut vertices, center.x, SHADOW_Y, center.z, inner);
            push_line_vert(
                &mut vertices,
                center.x + radius_x * a1.cos(),
                SHADOW_Y,
                center.z + radius_z * a1.sin(),
                rim,
            );
            push_line_vert(
                &mut vertices,
                center.x + radius_x * a0.cos(),
                SHADOW_Y,
                center.z + radius_z * a0.sin(),
                rim,
            );
        }
    }
    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

pub(crate) fn push_vert(v: &mut Vec<f32>, p: Vec3, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

pub(crate) fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}
