use std::collections::HashMap;

use glam::Vec3;

use super::mesh::MeshData;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for i in 0..data.vertex_count() {
            let p = data.position(i);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the nearest object whose AABB is intersected by the ray.
pub fn pick_nearest(ray: &Ray, aabbs: &HashMap<String, Aabb>) -> Option<String> {
    let mut best: Option<(String, f32)> = None;

    for (id, aabb) in aabbs {
        if let Some(dist) = ray_aabb(ray, aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((id.clone(), dist));
            }
        }
    }

    best.map(|(id, _)| id)
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Result of picking a triangle in a mesh
#[derive(Clone, Debug)]
pub struct TriangleHit {
    /// Index of the triangle (into mesh.indices / 3)
    pub triangle_index: usize,
    /// Distance from ray origin to hit point
    pub distance: f32,
}

/// Find the nearest triangle in a mesh intersected by the ray.
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<TriangleHit> {
    let mut best: Option<TriangleHit> = None;

    for (triangle_index, [v0, v1, v2]) in mesh.triangles().enumerate() {
        if let Some(distance) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(TriangleHit {
                    triangle_index,
                    distance,
                });
            }
        }
    }

    best
}

/// Pick the object whose surface is hit first.
///
/// AABBs reject most objects cheaply; surviving candidates are refined
/// with an exact ray/triangle test so a box corner does not steal clicks
/// aimed at a sphere behind it.
pub fn pick_object(
    ray: &Ray,
    meshes: &HashMap<String, MeshData>,
    aabbs: &HashMap<String, Aabb>,
) -> Option<(String, f32)> {
    let mut candidates: Vec<(&String, f32)> = aabbs
        .iter()
        .filter_map(|(id, aabb)| ray_aabb(ray, aabb).map(|d| (id, d)))
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut best: Option<(String, f32)> = None;
    for (id, _) in candidates {
        let Some(mesh) = meshes.get(id) else {
            continue;
        };
        if let Some(hit) = pick_triangle(ray, mesh) {
            if best.as_ref().is_none_or(|(_, d)| hit.distance < *d) {
                best = Some((id.clone(), hit.distance));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::build_local_mesh;
    use shared::ShapeType;

    fn ray_down_z(x: f32, y: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, y, 10.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb {
            min: Vec3::splat(-0.5),
            max: Vec3::splat(0.5),
        };
        let d = ray_aabb(&ray_down_z(0.0, 0.0), &aabb).unwrap();
        assert!((d - 9.5).abs() < 1e-5);
        assert!(ray_aabb(&ray_down_z(2.0, 0.0), &aabb).is_none());
    }

    #[test]
    fn test_pick_triangle_on_box() {
        let mesh = build_local_mesh(ShapeType::Box, [1.0; 3]);
        let hit = pick_triangle(&ray_down_z(0.1, 0.2), &mesh).unwrap();
        assert!((hit.distance - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_pick_object_prefers_surface_over_aabb() {
        // The sphere's AABB corner is closer than the box surface, but the
        // ray passes outside the sphere itself.
        let sphere = build_local_mesh(ShapeType::Sphere, [1.0; 3])
            .transformed(&glam::Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0)));
        let cube = build_local_mesh(ShapeType::Box, [1.0; 3]);

        let mut meshes = HashMap::new();
        meshes.insert("sphere".to_string(), sphere);
        meshes.insert("box".to_string(), cube);
        let aabbs = meshes
            .iter()
            .map(|(id, m)| (id.clone(), Aabb::from_mesh(m)))
            .collect();

        let ray = ray_down_z(0.45, 0.4);
        assert_eq!(pick_nearest(&ray, &aabbs).as_deref(), Some("sphere"));
        let (id, _) = pick_object(&ray, &meshes, &aabbs).unwrap();
        assert_eq!(id, "box");
    }

    #[test]
    fn test_pick_object_miss() {
        let mut meshes = HashMap::new();
        meshes.insert("box".to_string(), build_local_mesh(ShapeType::Box, [1.0; 3]));
        let aabbs = meshes
            .iter()
            .map(|(id, m)| (id.clone(), Aabb::from_mesh(m)))
            .collect();
        assert!(pick_object(&ray_down_z(3.0, 3.0), &meshes, &aabbs).is_none());
    }
}
