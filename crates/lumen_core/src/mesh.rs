//! Triangle mesh geometry for ray hit testing.
//!
//! Meshes here are proxies: low-resolution shapes that stand in for the
//! visible geometry when the beam is traced. Triangles wind counter-clockwise
//! when seen from outside, so the face normal `(v1 - v0) × (v2 - v0)` points
//! outwards.

use std::f32::consts::TAU;

use lumen_math::{Aabb, Vec3};

/// Vertex positions plus triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box in local space
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    ///
    /// A trailing partial triangle is ignored.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        if indices.len() % 3 != 0 {
            log::warn!(
                "Mesh index count {} is not a multiple of 3, ignoring the remainder",
                indices.len()
            );
        }
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Axis-aligned box centred on the origin, like a unit `BoxGeometry`
    /// when `size` is `Vec3::ONE`.
    pub fn cuboid(size: Vec3) -> Self {
        let half = size * 0.5;
        // (normal, u, v) with u × v = normal
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];

        let mut builder = MeshBuilder::default();
        for (n, u, v) in faces {
            let center = n * half;
            let (u, v) = (u * half, v * half);
            builder.quad(center - u - v, center + u - v, center + u + v, center - u + v);
        }
        builder.build()
    }

    /// Capped cylinder along the Y axis, centred on the origin.
    ///
    /// Three radial segments give the triangular prism used for the prism
    /// and triangle props. Segment `i` sits at angle `i / segments * TAU`
    /// measured from +Z towards +X.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half = height * 0.5;
        let ring = |radius: f32, y: f32, i: u32| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec3::new(radius * theta.sin(), y, radius * theta.cos())
        };

        let mut builder = MeshBuilder::default();
        let top_center = Vec3::new(0.0, half, 0.0);
        let bottom_center = Vec3::new(0.0, -half, 0.0);

        for i in 0..segments {
            let b0 = ring(radius_bottom, -half, i);
            let b1 = ring(radius_bottom, -half, i + 1);
            let t0 = ring(radius_top, half, i);
            let t1 = ring(radius_top, half, i + 1);

            builder.quad(b0, b1, t1, t0);
            if radius_top > 0.0 {
                builder.triangle(top_center, t0, t1);
            }
            if radius_bottom > 0.0 {
                builder.triangle(bottom_center, b1, b0);
            }
        }
        builder.build()
    }

    /// Single-sided rectangle in the XY plane facing +Z.
    pub fn quad(width: f32, height: f32) -> Self {
        let (w, h) = (width * 0.5, height * 0.5);
        let mut builder = MeshBuilder::default();
        builder.quad(
            Vec3::new(-w, -h, 0.0),
            Vec3::new(w, -h, 0.0),
            Vec3::new(w, h, 0.0),
            Vec3::new(-w, h, 0.0),
        );
        builder.build()
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::empty();
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }

    /// Get triangle count.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex count.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Corner positions of triangle `index`, or `None` if an index is out of range.
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let face = self.indices.get(index * 3..index * 3 + 3)?;
        Some([
            *self.positions.get(face[0] as usize)?,
            *self.positions.get(face[1] as usize)?,
            *self.positions.get(face[2] as usize)?,
        ])
    }

    /// Iterate over all well-formed triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).filter_map(|i| self.triangle(i))
    }

    /// Outward unit normal of a triangle; zero for degenerate triangles.
    pub fn face_normal([v0, v1, v2]: [Vec3; 3]) -> Vec3 {
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }
}

/// Accumulates unshared-vertex triangles.
#[derive(Default)]
struct MeshBuilder {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend([a, b, c]);
        self.indices.extend([base, base + 1, base + 2]);
    }

    /// Counter-clockwise quad `a b c d`.
    fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend([a, b, c, d]);
        self.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn build(self) -> Mesh {
        Mesh::new(self.positions, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face normal should point away from the mesh centre.
    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.triangles() {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let n = Mesh::face_normal(tri);
            assert!(n.dot(centroid) > 0.0, "inward normal {n} at {centroid}");
        }
    }

    #[test]
    fn test_cuboid() {
        let mesh = Mesh::cuboid(Vec3::ONE);

        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
        assert!((mesh.bounds.min() - Vec3::splat(-0.5)).length() < 1e-6);
        assert!((mesh.bounds.max() - Vec3::splat(0.5)).length() < 1e-6);
        assert_outward(&mesh);
    }

    #[test]
    fn test_triangular_prism() {
        let mesh = Mesh::cylinder(1.0, 1.0, 1.0, 3);

        // 3 side quads + 3 top + 3 bottom cap triangles
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward(&mesh);
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let mesh = Mesh::cylinder(0.0, 1.0, 2.0, 8);
        assert_eq!(mesh.triangle_count(), 8 * 2 + 8);
    }

    #[test]
    fn test_quad_faces_positive_z() {
        let mesh = Mesh::quad(2.0, 1.0);

        assert_eq!(mesh.triangle_count(), 2);
        for tri in mesh.triangles() {
            assert_eq!(Mesh::face_normal(tri), Vec3::Z);
        }
    }

    #[test]
    fn test_triangle_out_of_range() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 5]);
        assert_eq!(mesh.triangle(0), None);
        assert_eq!(mesh.triangle(1), None);
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn test_degenerate_face_normal() {
        assert_eq!(Mesh::face_normal([Vec3::ZERO, Vec3::X, Vec3::X * 2.0]), Vec3::ZERO);
    }
}
