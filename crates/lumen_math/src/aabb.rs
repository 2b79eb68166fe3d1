use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used to reject objects before testing triangles.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// True if no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. Axes the ray runs parallel to only pass when the
    /// origin already lies inside that slab.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for (slab, origin, dir) in [
            (self.x, r.origin.x, r.direction.x),
            (self.y, r.origin.y, r.direction.y),
            (self.z, r.origin.z, r.direction.z),
        ] {
            if dir == 0.0 {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let adinv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (flat quads, planar prisms).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_flat_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(2.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(aabb.x.size() > 0.0);
        assert!(aabb.x.contains(2.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let range = Interval::new(0.0, 100.0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray, range));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        assert!(!aabb.hit(&ray, range));

        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.hit(&ray, range));
    }

    #[test]
    fn test_aabb_hit_respects_range() {
        let aabb = Aabb::from_points(Vec3::new(4.0, -1.0, -1.0), Vec3::new(5.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(aabb.hit(&ray, Interval::new(0.0, 10.0)));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_empty() {
        assert!(Aabb::empty().is_empty());
        assert!(!Aabb::from_points(Vec3::ZERO, Vec3::ONE).is_empty());
    }
}
