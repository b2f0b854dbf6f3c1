//! Parametric primitive meshes
//!
//! Every mesh is centered on the origin in local space, wound
//! counter-clockwise when seen from outside, and closed so it can be
//! exported for printing without repair.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use shared::ShapeType;

use crate::viewport::mesh::{push_vert, MeshData};

/// Platonic solids available in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    Tetrahedron,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

/// Fixed geometry parameters of a shape kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveSpec {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    /// Cone with a pointed apex; 4 segments give a pyramid
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
    Polyhedron {
        solid: Solid,
        radius: f32,
    },
    Capsule {
        radius: f32,
        length: f32,
        cap_segments: u32,
        radial_segments: u32,
    },
    /// Hollow cylinder with closed annular ends
    Tube {
        outer_radius: f32,
        inner_radius: f32,
        height: f32,
        radial_segments: u32,
    },
    /// Star outline extruded along Y
    Star {
        points: u32,
        outer_radius: f32,
        inner_radius: f32,
        depth: f32,
    },
}

impl PrimitiveSpec {
    /// Parameter table, one entry per kind
    pub fn for_type(kind: ShapeType) -> PrimitiveSpec {
        match kind {
            ShapeType::Box => PrimitiveSpec::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            ShapeType::Sphere => PrimitiveSpec::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            },
            ShapeType::Cylinder => PrimitiveSpec::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.0,
                radial_segments: 32,
            },
            ShapeType::Cone => PrimitiveSpec::Cone {
                radius: 0.5,
                height: 1.0,
                radial_segments: 32,
            },
            ShapeType::Torus => PrimitiveSpec::Torus {
                radius: 0.4,
                tube: 0.1,
                radial_segments: 16,
                tubular_segments: 100,
            },
            ShapeType::TorusKnot => PrimitiveSpec::TorusKnot {
                radius: 0.4,
                tube: 0.1,
                tubular_segments: 128,
                radial_segments: 32,
                p: 2,
                q: 3,
            },
            ShapeType::Dodecahedron => PrimitiveSpec::Polyhedron {
                solid: Solid::Dodecahedron,
                radius: 0.5,
            },
            ShapeType::Octahedron => PrimitiveSpec::Polyhedron {
                solid: Solid::Octahedron,
                radius: 0.5,
            },
            ShapeType::Tetrahedron => PrimitiveSpec::Polyhedron {
                solid: Solid::Tetrahedron,
                radius: 0.5,
            },
            ShapeType::Icosahedron => PrimitiveSpec::Polyhedron {
                solid: Solid::Icosahedron,
                radius: 0.5,
            },
            ShapeType::Capsule => PrimitiveSpec::Capsule {
                radius: 0.3,
                length: 0.4,
                cap_segments: 4,
                radial_segments: 16,
            },
            ShapeType::Tube => PrimitiveSpec::Tube {
                outer_radius: 0.5,
                inner_radius: 0.4,
                height: 1.0,
                radial_segments: 32,
            },
            ShapeType::Pyramid => PrimitiveSpec::Cone {
                radius: 0.5,
                height: 1.0,
                radial_segments: 4,
            },
            ShapeType::Star => PrimitiveSpec::Star {
                points: 5,
                outer_radius: 0.5,
                inner_radius: 0.2,
                depth: 0.25,
            },
        }
    }

    /// Generate the local-space mesh with a uniform vertex color
    pub fn build(&self, color: [f32; 3]) -> MeshData {
        let mut b = Builder::new(color);
        match *self {
            PrimitiveSpec::Box {
                width,
                height,
                depth,
            } => cuboid(&mut b, width, height, depth),
            PrimitiveSpec::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                let profile: Vec<ProfilePoint> = (0..=height_segments)
                    .map(|i| {
                        let phi = PI * i as f32 / height_segments as f32;
                        ProfilePoint::on_circle(radius, 0.0, phi)
                    })
                    .collect();
                lathe(&mut b, &profile, width_segments);
            }
            PrimitiveSpec::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => frustum(&mut b, radius_top, radius_bottom, height, radial_segments),
            PrimitiveSpec::Cone {
                radius,
                height,
                radial_segments,
            } => frustum(&mut b, 0.0, radius, height, radial_segments),
            PrimitiveSpec::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(&mut b, radius, tube, radial_segments, tubular_segments),
            PrimitiveSpec::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => torus_knot(&mut b, radius, tube, tubular_segments, radial_segments, p, q),
            PrimitiveSpec::Polyhedron { solid, radius } => polyhedron(&mut b, solid, radius),
            PrimitiveSpec::Capsule {
                radius,
                length,
                cap_segments,
                radial_segments,
            } => {
                let half = length * 0.5;
                let mut profile = Vec::with_capacity(2 * cap_segments as usize + 2);
                for i in 0..=cap_segments {
                    let phi = FRAC_PI_2 * i as f32 / cap_segments as f32;
                    profile.push(ProfilePoint::on_circle(radius, half, phi));
                }
                for i in 0..=cap_segments {
                    let phi = FRAC_PI_2 + FRAC_PI_2 * i as f32 / cap_segments as f32;
                    profile.push(ProfilePoint::on_circle(radius, -half, phi));
                }
                lathe(&mut b, &profile, radial_segments);
            }
            PrimitiveSpec::Tube {
                outer_radius,
                inner_radius,
                height,
                radial_segments,
            } => tube(&mut b, outer_radius, inner_radius, height, radial_segments),
            PrimitiveSpec::Star {
                points,
                outer_radius,
                inner_radius,
                depth,
            } => star(&mut b, points, outer_radius, inner_radius, depth),
        }
        b.mesh
    }
}

// ── Builder ──────────────────────────────────────────────────

struct Builder {
    mesh: MeshData,
    color: [f32; 3],
}

impl Builder {
    fn new(color: [f32; 3]) -> Self {
        Self {
            mesh: MeshData::default(),
            color,
        }
    }

    fn vertex(&mut self, p: Vec3, n: Vec3) -> u32 {
        let index = self.mesh.vertex_count() as u32;
        push_vert(&mut self.mesh.vertices, p, n, self.color);
        index
    }

    fn tri(&mut self, a: u32, b: u32, c: u32) {
        self.mesh.indices.extend_from_slice(&[a, b, c]);
    }

    /// Triangle with its own vertices and a face normal taken from the winding
    fn flat_tri(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let n = (b - a).cross(c - a).normalize_or_zero();
        let i = self.vertex(a, n);
        self.vertex(b, n);
        self.vertex(c, n);
        self.tri(i, i + 1, i + 2);
    }

    fn flat_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.flat_tri(a, b, c);
        self.flat_tri(a, c, d);
    }
}

/// Point on a circle around Y; angle 0 faces +Z, increasing toward +X
fn ring(radius: f32, y: f32, theta: f32) -> Vec3 {
    Vec3::new(radius * theta.sin(), y, radius * theta.cos())
}

/// Angle of step `i`; wraps so the closing step lands exactly on step 0
fn angle(i: u32, segments: u32) -> f32 {
    TAU * (i % segments) as f32 / segments as f32
}

// ── Generators ───────────────────────────────────────────────

fn cuboid(b: &mut Builder, w: f32, h: f32, d: f32) {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [[Vec3; 4]; 6] = [
        // Front (+Z)
        [Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)],
        // Back (-Z)
        [Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)],
        // Right (+X)
        [Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)],
        // Left (-X)
        [Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)],
        // Top (+Y)
        [Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)],
        // Bottom (-Y)
        [Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)],
    ];

    for [p0, p1, p2, p3] in faces {
        b.flat_quad(p0, p1, p2, p3);
    }
}

/// Cylinder or cone along Y. A zero top radius collapses the side into
/// triangles meeting at the apex. Few segments (pyramid) get flat shading.
fn frustum(b: &mut Builder, radius_top: f32, radius_bottom: f32, height: f32, segments: u32) {
    let hh = height * 0.5;
    let smooth = segments > 8;
    let side_normal = |theta: f32| {
        Vec3::new(theta.sin() * height, radius_bottom - radius_top, theta.cos() * height).normalize()
    };

    for i in 0..segments {
        let t0 = angle(i, segments);
        let t1 = angle(i + 1, segments);
        let b0 = ring(radius_bottom, -hh, t0);
        let b1 = ring(radius_bottom, -hh, t1);

        if radius_top > 0.0 {
            let top0 = ring(radius_top, hh, t0);
            let top1 = ring(radius_top, hh, t1);
            if smooth {
                let (n0, n1) = (side_normal(t0), side_normal(t1));
                let i0 = b.vertex(b0, n0);
                let i1 = b.vertex(b1, n1);
                let i2 = b.vertex(top1, n1);
                let i3 = b.vertex(top0, n0);
                b.tri(i0, i1, i2);
                b.tri(i0, i2, i3);
            } else {
                b.flat_quad(b0, b1, top1, top0);
            }
        } else {
            let apex = Vec3::new(0.0, hh, 0.0);
            if smooth {
                let i0 = b.vertex(b0, side_normal(t0));
                let i1 = b.vertex(b1, side_normal(t1));
                let i2 = b.vertex(apex, side_normal((t0 + t1) * 0.5));
                b.tri(i0, i1, i2);
            } else {
                b.flat_tri(b0, b1, apex);
            }
        }
    }

    if radius_top > 0.0 {
        disc(b, radius_top, hh, segments, true);
    }
    if radius_bottom > 0.0 {
        disc(b, radius_bottom, -hh, segments, false);
    }
}

/// Triangle fan cap facing +Y (`up`) or -Y
fn disc(b: &mut Builder, radius: f32, y: f32, segments: u32, up: bool) {
    let normal = if up { Vec3::Y } else { Vec3::NEG_Y };
    let center = b.vertex(Vec3::new(0.0, y, 0.0), normal);
    for i in 0..segments {
        b.vertex(ring(radius, y, angle(i, segments)), normal);
    }
    for i in 0..segments {
        let cur = center + 1 + i;
        let next = center + 1 + (i + 1) % segments;
        if up {
            b.tri(center, cur, next);
        } else {
            b.tri(center, next, cur);
        }
    }
}

/// One row of a surface of revolution: radius from the axis, height,
/// and the outward normal in the (radial, y) plane.
#[derive(Clone, Copy)]
struct ProfilePoint {
    rho: f32,
    y: f32,
    n_rho: f32,
    n_y: f32,
}

impl ProfilePoint {
    /// Point at polar angle `phi` (0 = top pole) on a circle of `radius`
    /// centered at height `center_y`
    fn on_circle(radius: f32, center_y: f32, phi: f32) -> Self {
        Self {
            rho: radius * phi.sin(),
            y: center_y + radius * phi.cos(),
            n_rho: phi.sin(),
            n_y: phi.cos(),
        }
    }
}

/// Revolve a top-to-bottom profile around Y. Rows on the axis are poles:
/// their degenerate triangles are skipped so the mesh stays clean.
fn lathe(b: &mut Builder, profile: &[ProfilePoint], segments: u32) {
    const POLE: f32 = 1e-6;
    let base = b.mesh.vertex_count() as u32;

    for row in profile {
        for ix in 0..segments {
            let theta = angle(ix, segments);
            let p = ring(row.rho, row.y, theta);
            let n = Vec3::new(row.n_rho * theta.sin(), row.n_y, row.n_rho * theta.cos());
            b.vertex(p, n.normalize_or_zero());
        }
    }

    for iy in 0..profile.len().saturating_sub(1) {
        let upper_pole = profile[iy].rho.abs() < POLE;
        let lower_pole = profile[iy + 1].rho.abs() < POLE;
        let row = base + iy as u32 * segments;
        for ix in 0..segments {
            let a = row + ix;
            let bb = row + (ix + 1) % segments;
            let c = a + segments;
            let d = bb + segments;
            if !lower_pole {
                b.tri(a, c, d);
            }
            if !upper_pole {
                b.tri(a, d, bb);
            }
        }
    }
}

/// Torus in the XY plane, hole along Z
fn torus(b: &mut Builder, radius: f32, tube: f32, radial: u32, tubular: u32) {
    let base = b.mesh.vertex_count() as u32;
    for j in 0..radial {
        for i in 0..tubular {
            let u = angle(i, tubular);
            let v = angle(j, radial);
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            b.vertex(p, (p - center).normalize_or_zero());
        }
    }

    let idx = |j: u32, i: u32| base + tubular * (j % radial) + i % tubular;
    for j in 0..radial {
        for i in 0..tubular {
            let a = idx(j + 1, i);
            let bb = idx(j, i);
            let c = idx(j, i + 1);
            let d = idx(j + 1, i + 1);
            b.tri(a, bb, d);
            b.tri(bb, c, d);
        }
    }
}

fn torus_knot(b: &mut Builder, radius: f32, tube: f32, tubular: u32, radial: u32, p: u32, q: u32) {
    let curve = |u: f32| {
        let quo_over_p = q as f32 / p as f32 * u;
        let cs = quo_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * quo_over_p.sin() * 0.5,
        )
    };

    let base = b.mesh.vertex_count() as u32;
    for i in 0..tubular {
        let u = i as f32 / tubular as f32 * p as f32 * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame along the curve
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize_or_zero();
        normal = binormal.cross(tangent).normalize_or_zero();

        for j in 0..radial {
            let v = angle(j, radial);
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let pos = p1 + normal * cx + binormal * cy;
            b.vertex(pos, (pos - p1).normalize_or_zero());
        }
    }

    // Rings and their sides wrap around by index
    let idx = |j: u32, i: u32| base + radial * (j % tubular) + i % radial;
    for j in 0..tubular {
        for i in 0..radial {
            let a = idx(j, i);
            let bb = idx(j + 1, i);
            let c = idx(j + 1, i + 1);
            let d = idx(j, i + 1);
            b.tri(a, bb, d);
            b.tri(bb, c, d);
        }
    }
}

fn polyhedron(b: &mut Builder, solid: Solid, radius: f32) {
    let (vertices, faces) = solid_data(solid);
    let project = |i: usize| Vec3::from_array(vertices[i]).normalize() * radius;

    for face in faces.chunks_exact(3) {
        let (p0, p1, p2) = (project(face[0]), project(face[1]), project(face[2]));
        let centroid = (p0 + p1 + p2) / 3.0;
        let n = (p1 - p0).cross(p2 - p0);
        if n.dot(centroid) >= 0.0 {
            b.flat_tri(p0, p1, p2);
        } else {
            b.flat_tri(p0, p2, p1);
        }
    }
}

fn tube(b: &mut Builder, outer: f32, inner: f32, height: f32, segments: u32) {
    let hh = height * 0.5;
    for i in 0..segments {
        let (t0, t1) = (angle(i, segments), angle(i + 1, segments));
        let ob0 = ring(outer, -hh, t0);
        let ob1 = ring(outer, -hh, t1);
        let ot0 = ring(outer, hh, t0);
        let ot1 = ring(outer, hh, t1);
        let ib0 = ring(inner, -hh, t0);
        let ib1 = ring(inner, -hh, t1);
        let it0 = ring(inner, hh, t0);
        let it1 = ring(inner, hh, t1);

        // Outer wall
        let (n0, n1) = (ring(1.0, 0.0, t0), ring(1.0, 0.0, t1));
        let i0 = b.vertex(ob0, n0);
        let i1 = b.vertex(ob1, n1);
        let i2 = b.vertex(ot1, n1);
        let i3 = b.vertex(ot0, n0);
        b.tri(i0, i1, i2);
        b.tri(i0, i2, i3);

        // Inner wall faces the axis
        let i0 = b.vertex(ib0, -n0);
        let i1 = b.vertex(ib1, -n1);
        let i2 = b.vertex(it1, -n1);
        let i3 = b.vertex(it0, -n0);
        b.tri(i0, i2, i1);
        b.tri(i0, i3, i2);

        // Annular ends
        b.flat_tri(ot0, ot1, it0);
        b.flat_tri(it0, ot1, it1);
        b.flat_tri(ob0, ib0, ob1);
        b.flat_tri(ib0, ib1, ob1);
    }
}

fn star(b: &mut Builder, points: u32, outer: f32, inner: f32, depth: f32) {
    let hd = depth * 0.5;
    let count = points * 2;
    let rim = |i: u32, y: f32| {
        let r = if i % 2 == 0 { outer } else { inner };
        ring(r, y, angle(i % count, count))
    };

    let top = Vec3::new(0.0, hd, 0.0);
    let bottom = Vec3::new(0.0, -hd, 0.0);
    for i in 0..count {
        b.flat_tri(top, rim(i, hd), rim(i + 1, hd));
        b.flat_tri(bottom, rim(i + 1, -hd), rim(i, -hd));
        b.flat_quad(rim(i, -hd), rim(i + 1, -hd), rim(i + 1, hd), rim(i, hd));
    }
}

/// Unit vertices and triangle indices of each solid
fn solid_data(solid: Solid) -> (Vec<[f32; 3]>, &'static [usize]) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    match solid {
        Solid::Tetrahedron => (
            vec![[1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
            &[2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1],
        ),
        Solid::Octahedron => (
            vec![
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ],
            &[0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, 1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2],
        ),
        Solid::Icosahedron => (
            vec![
                [-1.0, t, 0.0],
                [1.0, t, 0.0],
                [-1.0, -t, 0.0],
                [1.0, -t, 0.0],
                [0.0, -1.0, t],
                [0.0, 1.0, t],
                [0.0, -1.0, -t],
                [0.0, 1.0, -t],
                [t, 0.0, -1.0],
                [t, 0.0, 1.0],
                [-t, 0.0, -1.0],
                [-t, 0.0, 1.0],
            ],
            &[
                0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7,
                6, 7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10,
                8, 6, 7, 9, 8, 1,
            ],
        ),
        Solid::Dodecahedron => {
            let r = 1.0 / t;
            (
                vec![
                    [-1.0, -1.0, -1.0],
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                    [-1.0, 1.0, 1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, -1.0, 1.0],
                    [1.0, 1.0, -1.0],
                    [1.0, 1.0, 1.0],
                    [0.0, -r, -t],
                    [0.0, -r, t],
                    [0.0, r, -t],
                    [0.0, r, t],
                    [-r, -t, 0.0],
                    [-r, t, 0.0],
                    [r, -t, 0.0],
                    [r, t, 0.0],
                    [-t, 0.0, -r],
                    [t, 0.0, -r],
                    [-t, 0.0, r],
                    [t, 0.0, r],
                ],
                &[
                    3, 11, 7, 3, 7, 15, 3, 15, 13, 7, 19, 17, 7, 17, 6, 7, 6, 15, 17, 4, 8, 17, 8, 10,
                    17, 10, 6, 8, 0, 16, 8, 16, 2, 8, 2, 10, 0, 12, 1, 0, 1, 18, 0, 18, 16, 6, 10, 2,
                    6, 2, 13, 6, 13, 15, 2, 16, 18, 2, 18, 3, 2, 3, 13, 18, 1, 9, 18, 9, 11, 18, 11,
                    3, 4, 14, 12, 4, 12, 0, 4, 0, 8, 11, 9, 5, 11, 5, 19, 11, 19, 7, 19, 5, 14, 19,
                    14, 4, 19, 4, 17, 1, 12, 14, 1, 14, 5, 1, 5, 9,
                ],
            )
        }
    }
}
