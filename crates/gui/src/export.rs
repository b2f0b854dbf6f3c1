//! Binary STL export of the whole scene
//!
//! Every shape is rebuilt from its stored pose at export time, so an
//! in-progress drag never leaks into the file.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glam::Vec3;
use shared::{ShapeObject, ShapeType};
use thiserror::Error;

use crate::geometry::{build_local_mesh, Pose};
use crate::viewport::mesh::MeshData;

/// Size of a binary STL with no triangles: 80-byte header + u32 count
pub const EMPTY_STL_LEN: usize = 84;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode STL: {0}")]
    Encode(#[source] io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// World-space triangles of all shapes, in document order, with facet
/// normals computed from the baked vertices
pub fn build_export_triangles(objects: &[ShapeObject]) -> Vec<stl_io::Triangle> {
    let mut templates: HashMap<ShapeType, MeshData> = HashMap::new();
    let mut triangles = Vec::new();

    for object in objects {
        let local = templates
            .entry(object.kind)
            .or_insert_with(|| build_local_mesh(object.kind, [1.0; 3]));
        // `transformed` restores outward winding for mirrored scales
        let world = local.transformed(&Pose::of(object).matrix());
        triangles.extend(world.triangles().map(|[a, b, c]| stl_io::Triangle {
            normal: stl_io::Normal::new(facet_normal(a, b, c).to_array()),
            vertices: [
                stl_io::Vertex::new(a.to_array()),
                stl_io::Vertex::new(b.to_array()),
                stl_io::Vertex::new(c.to_array()),
            ],
        }));
    }

    triangles
}

/// Encode the scene as a binary STL. An empty scene gives a valid file
/// with zero triangles.
pub fn export_stl(objects: &[ShapeObject]) -> Result<Vec<u8>, ExportError> {
    let triangles = build_export_triangles(objects);
    let mut buffer = Vec::with_capacity(EMPTY_STL_LEN + triangles.len() * 50);
    stl_io::write_stl(&mut buffer, triangles.iter()).map_err(ExportError::Encode)?;
    tracing::info!(
        "Exported {} object(s), {} triangle(s)",
        objects.len(),
        triangles.len()
    );
    Ok(buffer)
}

/// Encode and write to `path`; returns the number of bytes written
pub fn export_to_path(objects: &[ShapeObject], path: &Path) -> Result<usize, ExportError> {
    let buffer = export_stl(objects)?;
    std::fs::write(path, &buffer).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("STL written to {}", path.display());
    Ok(buffer.len())
}

/// `MAKER3D_<timestamp>.stl` with the ISO-8601 time made filename safe
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("MAKER3D_{}.stl", now.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

fn facet_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
