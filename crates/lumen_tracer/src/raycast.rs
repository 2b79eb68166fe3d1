//! Nearest-hit ray queries against scene meshes.
//!
//! Triangles are tested in world space with the Möller-Trumbore algorithm.
//! Only front faces count as hits, so a ray leaving a surface after a
//! bounce cannot hit the face it just left.

use lumen_core::{Mesh, ObjectKey, Scene};
use lumen_math::{Interval, Mat4, Mat4Ext, Ray, Vec3};

/// Hits closer than this to the ray origin are ignored.
pub const HIT_EPSILON: f32 = 1e-4;

/// Result of a ray-object query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Object owning the hit triangle
    pub object: ObjectKey,
    /// World-space hit point
    pub point: Vec3,
    /// Distance along the (unit) ray direction
    pub distance: f32,
    /// Face normal brought into world space
    pub normal: Vec3,
    /// Index of the triangle within the object's mesh
    pub face: usize,
}

/// Casts rays against a list of scene objects.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    /// Valid distance range along the ray
    pub range: Interval,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            range: Interval::new(HIT_EPSILON, f32::INFINITY),
        }
    }
}

impl Raycaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nearest hit among `objects`.
    ///
    /// On equal distances the object listed first wins. Keys whose node no
    /// longer exists, or has no mesh, are skipped.
    pub fn intersect_objects(&self, scene: &Scene, objects: &[ObjectKey], ray: &Ray) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;
        let mut search = self.range;

        for &key in objects {
            if let Some(hit) = self.intersect_in(scene, key, ray, search) {
                search = search.with_max(hit.distance);
                if closest.map_or(true, |best| hit.distance < best.distance) {
                    closest = Some(hit);
                }
            }
        }

        closest
    }

    /// Nearest hit on a single object.
    pub fn intersect_object(&self, scene: &Scene, key: ObjectKey, ray: &Ray) -> Option<RayHit> {
        self.intersect_in(scene, key, ray, self.range)
    }

    fn intersect_in(&self, scene: &Scene, key: ObjectKey, ray: &Ray, range: Interval) -> Option<RayHit> {
        let node = scene.node(key)?;
        let mesh = node.mesh()?;
        intersect_mesh(mesh, &node.world_matrix(), ray, range).map(|(t, face, local_normal)| RayHit {
            object: key,
            point: ray.at(t),
            distance: t,
            normal: node.world_matrix().transform_normal(local_normal),
            face,
        })
    }
}

/// Closest front-facing triangle of `mesh` placed at `world`.
///
/// Returns the ray parameter, the triangle index and its local face normal.
fn intersect_mesh(mesh: &Mesh, world: &Mat4, ray: &Ray, range: Interval) -> Option<(f32, usize, Vec3)> {
    if !world.transform_aabb(&mesh.bounds).hit(ray, range) {
        return None;
    }

    let mut search = range;
    let mut closest = None;

    for face in 0..mesh.triangle_count() {
        let Some(local) = mesh.triangle(face) else {
            continue;
        };
        let tri = local.map(|v| world.transform_point3(v));
        if let Some(t) = intersect_triangle(ray, tri, search) {
            search = search.with_max(t);
            closest = Some((t, face, Mesh::face_normal(local)));
        }
    }

    closest
}

/// Möller-Trumbore ray-triangle intersection, front faces only.
///
/// A triangle is front-facing when its counter-clockwise winding faces the
/// ray, i.e. the determinant is positive.
pub fn intersect_triangle(ray: &Ray, [v0, v1, v2]: [Vec3; 3], ray_t: Interval) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Parallel, degenerate, or seen from behind
    if a < 1e-8 {
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
    ray_t.contains(t).then_some(t)
}
