//! Procedural mesh primitives.
//!
//! Each generator produces positions + smooth normals + triangle indices.
//! All shapes are centered on their local origin; placement happens in the
//! scene graph.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// CPU-side mesh data ready for upload to a vertex/index buffer.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// UV sphere with `segments` longitudinal and `rings` latitudinal divisions.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for i in 0..=rings {
        // Latitude from the north pole down
        let theta = FRAC_PI_2 - PI * i as f32 / rings as f32;
        let y = theta.sin();
        let ring_r = theta.cos();

        for j in 0..=segments {
            let phi = TAU * j as f32 / segments as f32;
            let n = Vec3::new(ring_r * phi.cos(), y, ring_r * phi.sin());
            positions.push(n * radius);
            normals.push(n);
        }
    }

    let indices = grid_indices(rings, segments);
    MeshData {
        positions,
        normals,
        indices,
    }
}

/// Capsule: a cylinder of `length` capped with hemispheres of `radius`.
/// Matches the (radius, length) parameterization of the scene description,
/// where `length` is the cylindrical section only.
pub fn capsule(radius: f32, length: f32, segments: u32, cap_rings: u32) -> MeshData {
    let half = length / 2.0;
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    // Top hemisphere: latitude from pole to equator, shifted up. The last
    // ring sits exactly at y = +half; the bottom hemisphere starts with a
    // duplicate ring at y = -half, and the quad strip between the two forms
    // the cylinder wall.
    for i in 0..=cap_rings {
        let theta = FRAC_PI_2 * (1.0 - i as f32 / cap_rings as f32);
        push_ring(&mut positions, &mut normals, radius, theta, half, segments);
    }
    for i in 0..=cap_rings {
        let theta = -FRAC_PI_2 * i as f32 / cap_rings as f32;
        push_ring(&mut positions, &mut normals, radius, theta, -half, segments);
    }

    let rows = 2 * cap_rings + 1;
    let indices = grid_indices(rows, segments);
    MeshData {
        positions,
        normals,
        indices,
    }
}

fn push_ring(
    positions: &mut Vec<Vec3>,
    normals: &mut Vec<Vec3>,
    radius: f32,
    theta: f32,
    y_offset: f32,
    segments: u32,
) {
    let y = theta.sin();
    let ring_r = theta.cos();
    for j in 0..=segments {
        let phi = TAU * j as f32 / segments as f32;
        let n = Vec3::new(ring_r * phi.cos(), y, ring_r * phi.sin());
        positions.push(Vec3::new(n.x * radius, n.y * radius + y_offset, n.z * radius));
        normals.push(n);
    }
}

/// Torus in the XY plane, optionally truncated to an `arc` sweep (radians).
/// A full torus has `arc = TAU`; the smile mouth uses `arc = PI`.
pub fn torus(
    major_radius: f32,
    minor_radius: f32,
    tube_segments: u32,
    ring_segments: u32,
    arc: f32,
) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for i in 0..=ring_segments {
        let u = arc * i as f32 / ring_segments as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=tube_segments {
            let v = TAU * j as f32 / tube_segments as f32;
            let (sin_v, cos_v) = v.sin_cos();

            positions.push(Vec3::new(
                (major_radius + minor_radius * cos_v) * cos_u,
                (major_radius + minor_radius * cos_v) * sin_u,
                minor_radius * sin_v,
            ));
            normals.push(Vec3::new(cos_v * cos_u, cos_v * sin_u, sin_v));
        }
    }

    let indices = grid_indices(ring_segments, tube_segments);
    MeshData {
        positions,
        normals,
        indices,
    }
}

/// Axis-aligned box with the given full extents and flat per-face normals.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);

    // (normal, four corners CCW viewed from outside)
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::X,
            [
                Vec3::new(hx, -hy, -hz),
                Vec3::new(hx, hy, -hz),
                Vec3::new(hx, hy, hz),
                Vec3::new(hx, -hy, hz),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(-hx, -hy, hz),
                Vec3::new(-hx, hy, hz),
                Vec3::new(-hx, hy, -hz),
                Vec3::new(-hx, -hy, -hz),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(-hx, hy, -hz),
                Vec3::new(-hx, hy, hz),
                Vec3::new(hx, hy, hz),
                Vec3::new(hx, hy, -hz),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-hx, -hy, hz),
                Vec3::new(-hx, -hy, -hz),
                Vec3::new(hx, -hy, -hz),
                Vec3::new(hx, -hy, hz),
            ],
        ),
        (
            Vec3::Z,
            [
                Vec3::new(-hx, -hy, hz),
                Vec3::new(hx, -hy, hz),
                Vec3::new(hx, hy, hz),
                Vec3::new(-hx, hy, hz),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(hx, -hy, -hz),
                Vec3::new(-hx, -hy, -hz),
                Vec3::new(-hx, hy, -hz),
                Vec3::new(hx, hy, -hz),
            ],
        ),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, corners) in faces {
        let base = positions.len() as u32;
        for corner in corners {
            positions.push(corner);
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData {
        positions,
        normals,
        indices,
    }
}

/// Flat disc in the XZ plane facing +Y. Used for the ground-contact shadow.
pub fn disc(radius: f32, segments: u32) -> MeshData {
    let mut positions = vec![Vec3::ZERO];
    let mut normals = vec![Vec3::Y];
    let mut indices = Vec::with_capacity(segments as usize * 3);

    for j in 0..=segments {
        let phi = TAU * j as f32 / segments as f32;
        positions.push(Vec3::new(phi.cos() * radius, 0.0, phi.sin() * radius));
        normals.push(Vec3::Y);
    }

    for j in 0..segments {
        indices.extend_from_slice(&[0, j + 2, j + 1]);
    }

    MeshData {
        positions,
        normals,
        indices,
    }
}

/// Triangle indices for a (rows x cols) quad grid with `cols + 1` vertices
/// per row (seam column duplicated).
fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let stride = cols + 1;
    let mut indices = Vec::with_capacity((rows * cols * 6) as usize);

    for i in 0..rows {
        for j in 0..cols {
            let a = i * stride + j;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mesh_well_formed(mesh: &MeshData, label: &str) {
        assert_eq!(
            mesh.positions.len(),
            mesh.normals.len(),
            "{}: positions/normals mismatch",
            label
        );
        assert_eq!(mesh.indices.len() % 3, 0, "{}: indices not triangles", label);

        let n = mesh.positions.len() as u32;
        for &idx in &mesh.indices {
            assert!(idx < n, "{}: index {} out of range ({})", label, idx, n);
        }
        for (i, normal) in mesh.normals.iter().enumerate() {
            assert!(
                (normal.length() - 1.0).abs() < 1e-4,
                "{}: normal {} not unit length: {}",
                label,
                i,
                normal.length()
            );
        }
    }

    #[test]
    fn test_sphere_well_formed() {
        let mesh = uv_sphere(1.0, 32, 32);
        assert_mesh_well_formed(&mesh, "sphere");
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2);
    }

    #[test]
    fn test_sphere_points_on_surface() {
        let mesh = uv_sphere(0.35, 16, 16);
        for p in &mesh.positions {
            assert!((p.length() - 0.35).abs() < 1e-5);
        }
    }

    #[test]
    fn test_capsule_well_formed() {
        let mesh = capsule(0.9, 1.8, 16, 4);
        assert_mesh_well_formed(&mesh, "capsule");

        // Full height is length + 2 * radius
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((max_y - 1.8).abs() < 1e-5, "top at {}", max_y);
        assert!((min_y + 1.8).abs() < 1e-5, "bottom at {}", min_y);
    }

    #[test]
    fn test_full_torus_well_formed() {
        let mesh = torus(0.7, 0.25, 16, 32, TAU);
        assert_mesh_well_formed(&mesh, "torus");
        assert_eq!(mesh.triangle_count(), 32 * 16 * 2);
    }

    #[test]
    fn test_torus_arc_spans_half_circle() {
        let mesh = torus(0.1, 0.02, 8, 16, PI);
        assert_mesh_well_formed(&mesh, "torus_arc");

        // A half-arc in the XY plane stays in the upper half (y >= -minor)
        for p in &mesh.positions {
            assert!(p.y >= -0.02 - 1e-5, "arc vertex below sweep: {:?}", p);
        }
    }

    #[test]
    fn test_cuboid_well_formed() {
        let mesh = cuboid(0.3, 0.8, 0.1);
        assert_mesh_well_formed(&mesh, "cuboid");
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_disc_well_formed() {
        let mesh = disc(2.5, 48);
        assert_mesh_well_formed(&mesh, "disc");
        assert_eq!(mesh.triangle_count(), 48);
        for p in &mesh.positions {
            assert_eq!(p.y, 0.0, "disc must be flat");
        }
    }
}
