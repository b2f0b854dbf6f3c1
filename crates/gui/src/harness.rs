//! Headless test harness for programmatic scene manipulation.
//!
//! Drives the document, the transform controller and the mesh cache the
//! same way the GUI does, without a window or GL context.

use shared::{ShapeId, ShapeObject, ShapePatch, ShapeType, TransformMode};

use crate::export::{self, ExportError};
use crate::geometry::{MeshCache, Pose};
use crate::state::scene::SceneState;
use crate::validation::MeshValidator;
use crate::viewport::gizmo::{GizmoAxis, TransformController};
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Ray;

/// Headless test harness: manages scene, transform controller and mesh cache
pub struct TestHarness {
    pub scene: SceneState,
    pub controller: TransformController,
    cache: MeshCache,
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            scene: SceneState::new(),
            controller: TransformController::default(),
            cache: MeshCache::new(),
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add a shape the way the palette does (selected afterwards)
    pub fn add(&mut self, kind: ShapeType) -> ShapeId {
        self.scene.add_from_palette(kind)
    }

    /// Add a shape at an explicit position and scale
    pub fn add_at(&mut self, kind: ShapeType, position: [f64; 3], scale: [f64; 3]) -> ShapeId {
        let id = self.scene.add_from_palette(kind);
        self.scene.update(
            &id,
            &ShapePatch {
                position: Some(position),
                scale: Some(scale),
                ..Default::default()
            },
        );
        id
    }

    /// Replace the document with a JSON array of shapes
    pub fn load_scene_json(&mut self, json: &str) -> Result<Vec<ShapeId>, String> {
        let shapes: Vec<ShapeObject> =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.controller.cancel();
        self.scene.clear();
        Ok(self.scene.add_many(shapes))
    }

    /// Export the current document as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(self.scene.objects()).unwrap_or_default()
    }

    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.scene.select(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.scene.remove(id)
    }

    /// Clear the entire scene
    pub fn clear(&mut self) {
        self.controller.cancel();
        self.scene.clear();
    }

    // ── Manipulation ──────────────────────────────────────────

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.controller.set_mode(mode);
    }

    /// Start dragging a handle of the selected shape
    pub fn begin_drag(&mut self, axis: GizmoAxis) -> bool {
        let Some(shape) = self.scene.selected() else {
            return false;
        };
        let (id, pose) = (shape.id.clone(), Pose::of(shape));
        self.controller.begin_drag(id, axis, pose);
        true
    }

    pub fn drag(&mut self, axis_delta: f64) {
        self.controller.drag(axis_delta);
    }

    /// Finish the drag and commit the pose to the document
    pub fn release(&mut self) -> bool {
        match self.controller.release() {
            Some((id, patch)) => self.scene.update(&id, &patch),
            None => false,
        }
    }

    // ── Build + inspection ────────────────────────────────────

    /// Bring the mesh cache up to date with the document and live drag
    pub fn build(&mut self) {
        let live = self.controller.live_pose();
        self.cache.ensure(
            self.scene.objects(),
            self.scene.selected_id(),
            live.as_ref(),
            self.scene.version(),
        );
    }

    /// Number of shapes in the document
    pub fn object_count(&self) -> usize {
        self.scene.len()
    }

    /// Number of cache rebuilds so far
    pub fn rebuild_count(&self) -> u64 {
        self.cache.rebuild_count()
    }

    /// Individual shape meshes built so far
    pub fn mesh_build_count(&self) -> u64 {
        self.cache.mesh_build_count()
    }

    /// World mesh of a shape after the last build
    pub fn mesh_of(&self, id: &str) -> Option<&MeshData> {
        self.cache.mesh(id)
    }

    /// Create a validator for a shape's mesh
    pub fn validate_mesh(&self, id: &str) -> Option<MeshValidator<'_>> {
        self.cache.mesh(id).map(MeshValidator::new)
    }

    /// Shape hit first by the ray, against the last build
    pub fn pick(&self, ray: &Ray) -> Option<ShapeId> {
        self.cache.pick(ray)
    }

    pub fn export_stl(&self) -> Result<Vec<u8>, ExportError> {
        export::export_stl(self.scene.objects())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
