//! Display helper functions for shapes

use shared::ShapeType;

/// Get icon for a shape kind
pub fn shape_icon(kind: ShapeType) -> &'static str {
    match kind {
        ShapeType::Box => "[B]",
        ShapeType::Sphere => "[S]",
        ShapeType::Cylinder => "[Y]",
        ShapeType::Cone => "[K]",
        ShapeType::Torus => "[O]",
        ShapeType::TorusKnot => "[&]",
        ShapeType::Dodecahedron => "[12]",
        ShapeType::Octahedron => "[8]",
        ShapeType::Capsule => "[C]",
        ShapeType::Tetrahedron => "[4]",
        ShapeType::Icosahedron => "[20]",
        ShapeType::Tube => "[T]",
        ShapeType::Pyramid => "[P]",
        ShapeType::Star => "[*]",
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
