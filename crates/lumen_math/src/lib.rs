// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod ease;
mod interval;
mod ray;
pub mod refraction;
mod transform;

pub use aabb::Aabb;
pub use ease::{lerp, lerp_color, lerp_vec3, rgb_from_hex};
pub use interval::Interval;
pub use ray::Ray;
pub use refraction::refraction_angle;
pub use transform::Mat4Ext;

/// Reflect `direction` about the plane with unit normal `normal`.
///
/// Computes `d - 2(d·n)n`. A zero normal leaves the direction unchanged,
/// so degenerate surfaces let the ray pass straight through.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_head_on() {
        let d = reflect(Vec3::X, Vec3::NEG_X);
        assert_eq!(d, Vec3::NEG_X);
    }

    #[test]
    fn test_reflect_glancing() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let d = reflect(incoming, Vec3::Y);
        assert!((d - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_reflect_zero_normal_passes_through() {
        let incoming = Vec3::new(0.3, 0.4, 0.0);
        assert_eq!(reflect(incoming, Vec3::ZERO), incoming);
    }
}
