use crate::Vec3;

/// A half-line in world space.
///
/// The direction is expected to be unit length when produced by
/// [`Ray::through`]; rays built with [`Ray::new`] keep whatever
/// direction they were given.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray starting at `origin` and heading towards `target`.
    ///
    /// Coincident endpoints produce a zero direction instead of NaNs.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize_or_zero())
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_through_normalizes() {
        let ray = Ray::through(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 5.0, 0.0));
        assert_eq!(ray.origin, Vec3::new(1.0, 1.0, 0.0));
        assert!((ray.direction - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_ray_through_same_point() {
        let ray = Ray::through(Vec3::ONE, Vec3::ONE);
        assert_eq!(ray.direction, Vec3::ZERO);
        assert_eq!(ray.at(10.0), Vec3::ONE);
    }
}
