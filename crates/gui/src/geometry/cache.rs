//! World-space mesh cache management

use std::collections::HashMap;

use shared::{ShapeId, ShapeObject, ShapeType};

use super::{build_local_mesh, color_to_rgb, highlight, Pose};
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::{pick_object, Aabb, Ray};

/// A pose that overrides the stored one while a drag is in progress
#[derive(Debug, Clone, PartialEq)]
pub struct LivePose {
    pub id: ShapeId,
    pub pose: Pose,
}

/// Cached world meshes, rebuilt when the scene, selection or live drag changes
pub struct MeshCache {
    /// Local meshes per kind, white; recolored on use
    templates: HashMap<ShapeType, MeshData>,
    meshes: HashMap<ShapeId, MeshData>,
    aabbs: HashMap<ShapeId, Aabb>,
    /// Draw order (document order)
    order: Vec<ShapeId>,
    version: u64,
    rebuild_count: u64,
    /// World meshes built so far, across full and partial refreshes
    mesh_builds: u64,
    selected_snapshot: Option<ShapeId>,
    live_snapshot: Option<LivePose>,
}

impl Default for MeshCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshCache {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            meshes: HashMap::new(),
            aabbs: HashMap::new(),
            order: Vec::new(),
            version: u64::MAX, // force first rebuild
            rebuild_count: 0,
            mesh_builds: 0,
            selected_snapshot: None,
            live_snapshot: None,
        }
    }

    /// Check if cache is still valid
    pub fn is_valid(&self, scene_version: u64, selected: Option<&str>, live: Option<&LivePose>) -> bool {
        self.version == scene_version
            && self.selected_snapshot.as_deref() == selected
            && self.live_snapshot.as_ref() == live
    }

    /// Rebuild cached meshes from the document
    pub fn rebuild(
        &mut self,
        objects: &[ShapeObject],
        selected: Option<&str>,
        live: Option<&LivePose>,
        version: u64,
    ) {
        let mut meshes = HashMap::with_capacity(objects.len());
        for shape in objects {
            meshes.insert(shape.id.clone(), self.world_mesh(shape, selected, live));
        }

        self.aabbs = meshes
            .iter()
            .map(|(id, mesh)| (id.clone(), Aabb::from_mesh(mesh)))
            .collect();
        self.meshes = meshes;
        self.order = objects.iter().map(|s| s.id.clone()).collect();
        self.version = version;
        self.rebuild_count += 1;
        self.selected_snapshot = selected.map(str::to_string);
        self.live_snapshot = live.cloned();

        tracing::debug!(
            "Mesh cache rebuilt: {} objects (rebuild #{})",
            self.order.len(),
            self.rebuild_count
        );
    }

    /// Rebuild only when something the meshes depend on changed. A change
    /// of the live drag pose alone refreshes just the shapes it touches.
    pub fn ensure(
        &mut self,
        objects: &[ShapeObject],
        selected: Option<&str>,
        live: Option<&LivePose>,
        version: u64,
    ) {
        if self.is_valid(version, selected, live) {
            return;
        }
        if self.version == version && self.selected_snapshot.as_deref() == selected {
            self.refresh_live(objects, selected, live);
        } else {
            self.rebuild(objects, selected, live, version);
        }
    }

    /// Re-pose the previously and currently dragged shapes
    fn refresh_live(&mut self, objects: &[ShapeObject], selected: Option<&str>, live: Option<&LivePose>) {
        let previous = self.live_snapshot.take().map(|l| l.id);
        let current = live.map(|l| l.id.clone());
        let mut touched: Vec<ShapeId> = previous.into_iter().chain(current).collect();
        touched.dedup();

        for id in &touched {
            let Some(shape) = objects.iter().find(|s| &s.id == id) else {
                continue;
            };
            let mesh = self.world_mesh(shape, selected, live);
            self.aabbs.insert(id.clone(), Aabb::from_mesh(&mesh));
            self.meshes.insert(id.clone(), mesh);
        }
        self.live_snapshot = live.cloned();
        self.rebuild_count += 1;
    }

    fn world_mesh(&mut self, shape: &ShapeObject, selected: Option<&str>, live: Option<&LivePose>) -> MeshData {
        let pose = match live {
            Some(l) if l.id == shape.id => l.pose,
            _ => Pose::of(shape),
        };
        let mut color = color_to_rgb(&shape.color);
        if selected == Some(shape.id.as_str()) {
            color = highlight(color);
        }

        let template = self
            .templates
            .entry(shape.kind)
            .or_insert_with(|| build_local_mesh(shape.kind, [1.0, 1.0, 1.0]));
        let mut mesh = template.transformed(&pose.matrix());
        mesh.recolor(color);
        self.mesh_builds += 1;
        mesh
    }

    pub fn mesh(&self, id: &str) -> Option<&MeshData> {
        self.meshes.get(id)
    }

    /// Meshes in document order
    pub fn ordered(&self) -> impl Iterator<Item = (&ShapeId, &MeshData)> {
        self.order
            .iter()
            .filter_map(|id| self.meshes.get(id).map(|m| (id, m)))
    }

    /// Owned copy of the meshes in draw order (for passing into PaintCallback)
    pub fn ordered_meshes(&self) -> Vec<MeshData> {
        self.ordered().map(|(_, m)| m.clone()).collect()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn mesh_build_count(&self) -> u64 {
        self.mesh_builds
    }

    pub fn aabbs(&self) -> &HashMap<String, Aabb> {
        &self.aabbs
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.values().map(MeshData::triangle_count).sum()
    }

    /// Object hit first by the ray, if any
    pub fn pick(&self, ray: &Ray) -> Option<ShapeId> {
        pick_object(ray, &self.meshes, &self.aabbs).map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MeshValidator;
    use glam::Vec3;
    use shared::{DEFAULT_COLOR, UNIT_SCALE, ZERO_ROTATION};

    fn shape(id: &str, kind: ShapeType, x: f64) -> ShapeObject {
        ShapeObject {
            id: id.into(),
            kind,
            position: [x, 0.5, 0.0],
            rotation: ZERO_ROTATION,
            scale: UNIT_SCALE,
            color: DEFAULT_COLOR.into(),
            name: id.into(),
        }
    }

    #[test]
    fn test_rebuild_only_when_inputs_change() {
        let objects = vec![shape("a", ShapeType::Box, 0.0)];
        let mut cache = MeshCache::new();

        cache.ensure(&objects, None, None, 1);
        cache.ensure(&objects, None, None, 1);
        assert_eq!(cache.rebuild_count(), 1);

        cache.ensure(&objects, Some("a"), None, 1);
        assert_eq!(cache.rebuild_count(), 2);

        cache.ensure(&objects, Some("a"), None, 2);
        assert_eq!(cache.rebuild_count(), 3);
    }

    #[test]
    fn test_selected_shape_is_tinted() {
        let objects = vec![shape("a", ShapeType::Box, 0.0), shape("b", ShapeType::Box, 2.0)];
        let mut cache = MeshCache::new();
        cache.rebuild(&objects, Some("a"), None, 0);

        let base = color_to_rgb(DEFAULT_COLOR);
        assert!(MeshValidator::new(cache.mesh("a").unwrap()).has_color(highlight(base)));
        assert!(MeshValidator::new(cache.mesh("b").unwrap()).has_color(base));
    }

    #[test]
    fn test_live_pose_overrides_stored_pose() {
        let objects = vec![shape("a", ShapeType::Box, 0.0)];
        let mut cache = MeshCache::new();
        let live = LivePose {
            id: "a".into(),
            pose: Pose {
                position: [3.0, 0.5, 0.0],
                rotation: ZERO_ROTATION,
                scale: UNIT_SCALE,
            },
        };
        cache.rebuild(&objects, None, Some(&live), 0);
        let center = cache.aabbs()["a"].center();
        assert!((center - Vec3::new(3.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_drag_frames_rebuild_only_dragged_shape() {
        let objects = vec![
            shape("a", ShapeType::Box, 0.0),
            shape("b", ShapeType::TorusKnot, 2.0),
            shape("c", ShapeType::Sphere, 4.0),
        ];
        let mut cache = MeshCache::new();
        cache.ensure(&objects, Some("a"), None, 1);
        assert_eq!(cache.mesh_build_count(), 3);
        let knot_before = cache.aabbs()["b"];

        let mut live = LivePose {
            id: "a".into(),
            pose: Pose::of(&objects[0]),
        };
        for step in 1..=4 {
            live.pose.position[0] = step as f64;
            cache.ensure(&objects, Some("a"), Some(&live), 1);
        }
        assert_eq!(cache.mesh_build_count(), 3 + 4);
        assert!((cache.aabbs()["a"].center().x - 4.0).abs() < 1e-5);
        assert_eq!(cache.aabbs()["b"], knot_before);

        // Cancelled drag falls back to the stored pose
        cache.ensure(&objects, Some("a"), None, 1);
        assert_eq!(cache.mesh_build_count(), 3 + 5);
        assert!(cache.aabbs()["a"].center().x.abs() < 1e-5);
        assert!(MeshValidator::new(cache.mesh("a").unwrap())
            .has_color(highlight(color_to_rgb(DEFAULT_COLOR))));
    }

    #[test]
    fn test_order_and_pick() {
        let objects = vec![shape("a", ShapeType::Sphere, -2.0), shape("b", ShapeType::Box, 2.0)];
        let mut cache = MeshCache::new();
        cache.rebuild(&objects, None, None, 0);

        let ids: Vec<_> = cache.ordered().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let ray = Ray {
            origin: Vec3::new(2.1, 0.6, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(cache.pick(&ray).as_deref(), Some("b"));

        let miss = Ray {
            origin: Vec3::new(0.0, 0.5, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(cache.pick(&miss), None);
    }
}
