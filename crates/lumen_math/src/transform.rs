// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3() and inverse(); these cover
// the direction and bounding-box cases the raycaster needs.

use glam::{Mat4, Vec3, Vec4};
use crate::Aabb;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a vector in 3D space (applies rotation and scale, but NOT translation).
    /// Vectors have an implicit w=0 component.
    fn transform_vector3(&self, vector: Vec3) -> Vec3;

    /// Bring a local face normal into world space.
    ///
    /// The linear part of the matrix is applied and the result normalized.
    /// A normal that collapses to zero stays zero.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_vector3(&self, vector: Vec3) -> Vec3 {
        let transformed = *self * Vec4::new(vector.x, vector.y, vector.z, 0.0);
        transformed.truncate()
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.transform_vector3(normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let mut corners = aabb.corners().into_iter().map(|c| self.transform_point3(c));
        let first = corners.next().unwrap_or(Vec3::ZERO);
        let (lo, hi) = corners.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));

        Aabb::from_points(lo, hi)
    }
}
