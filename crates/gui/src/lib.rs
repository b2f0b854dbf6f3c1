// Library crate: exposes testable modules for integration tests and headless use.
// GUI-specific modules (app, ui, viewport rendering) remain in the binary crate.

pub mod ai;
pub mod export;
pub mod geometry;
pub mod harness;
pub mod i18n;
pub mod state;
pub mod validation;

/// Viewport math shared by the document, the exporter and the GUI
/// (meshes, picking, camera, gizmo). GL rendering stays in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod gizmo;
    pub mod mesh;
    pub mod picking;
}
