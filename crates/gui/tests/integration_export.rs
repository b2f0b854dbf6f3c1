//! Integration tests for STL export: byte layout, read-back and disk output.

use std::io::Cursor;

use maker3d_gui_lib::export::{self, ExportError, EMPTY_STL_LEN};
use maker3d_gui_lib::geometry::build_local_mesh;
use maker3d_gui_lib::harness::TestHarness;
use maker3d_gui_lib::viewport::gizmo::GizmoAxis;
use shared::ShapeType;

fn read_back(bytes: &[u8]) -> stl_io::IndexedMesh {
    let mut cursor = Cursor::new(bytes);
    stl_io::read_stl(&mut cursor).expect("exported STL should parse")
}

#[test]
fn test_export_box_has_twelve_faces() {
    let mut h = TestHarness::new();
    h.add(ShapeType::Box);
    let bytes = h.export_stl().unwrap();
    assert_eq!(bytes.len(), EMPTY_STL_LEN + 12 * 50);

    let mesh = read_back(&bytes);
    assert_eq!(mesh.faces.len(), 12);
    // The box sits on the bed: y in [0, 1]
    for v in &mesh.vertices {
        assert!(v[1] >= -1e-5 && v[1] <= 1.0 + 1e-5);
    }
}

#[test]
fn test_export_counts_sum_over_shapes() {
    let mut h = TestHarness::new();
    let kinds = [ShapeType::Sphere, ShapeType::Tube, ShapeType::Star];
    for kind in kinds {
        h.add(kind);
    }
    let expected: usize = kinds
        .iter()
        .map(|&k| build_local_mesh(k, [1.0; 3]).triangle_count())
        .sum();

    let bytes = h.export_stl().unwrap();
    assert_eq!(read_back(&bytes).faces.len(), expected);
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
    assert_eq!(count as usize, expected);
}

#[test]
fn test_export_ignores_live_drag() {
    let mut h = TestHarness::new();
    h.add(ShapeType::Box);
    let before = h.export_stl().unwrap();

    assert!(h.begin_drag(GizmoAxis::X));
    h.drag(4.0);
    h.build();
    let during = h.export_stl().unwrap();
    assert_eq!(before, during, "only stored poses are exported");

    assert!(h.release());
    let after = h.export_stl().unwrap();
    assert_ne!(before, after);
}

#[test]
fn test_export_applies_scale_and_position() {
    let mut h = TestHarness::new();
    h.add_at(ShapeType::Box, [10.0, 2.0, -3.0], [2.0, 4.0, 1.0]);
    let mesh = read_back(&h.export_stl().unwrap());

    let (mut min, mut max) = ([f32::MAX; 3], [f32::MIN; 3]);
    for v in &mesh.vertices {
        for axis in 0..3 {
            min[axis] = min[axis].min(v[axis]);
            max[axis] = max[axis].max(v[axis]);
        }
    }
    let expected_min = [9.0, 0.0, -3.5];
    let expected_max = [11.0, 4.0, -2.5];
    for axis in 0..3 {
        assert!((min[axis] - expected_min[axis]).abs() < 1e-4, "min {min:?}");
        assert!((max[axis] - expected_max[axis]).abs() < 1e-4, "max {max:?}");
    }
}

#[test]
fn test_export_empty_scene_is_valid() {
    let h = TestHarness::new();
    let bytes = h.export_stl().unwrap();
    assert_eq!(bytes.len(), EMPTY_STL_LEN);
    assert!(bytes[80..].iter().all(|&b| b == 0));
}

#[test]
fn test_export_to_path_writes_file() {
    let mut h = TestHarness::new();
    h.add(ShapeType::Octahedron);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.stl");

    let written = export::export_to_path(h.scene.objects(), &path).unwrap();
    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(written, on_disk.len());
    assert_eq!(read_back(&on_disk).faces.len(), 8);
}

#[test]
fn test_export_to_missing_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("scene.stl");
    let err = export::export_to_path(&[], &path).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(err.to_string().contains("scene.stl"));
}
