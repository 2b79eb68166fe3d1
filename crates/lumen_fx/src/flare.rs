//! Drifting dots of the lens flare.

use lumen_math::Vec3;

/// Scale of each flare dot. The last one sits behind the others.
pub const FLARE_DOT_SCALES: [f32; 5] = [0.5, 1.25, 0.75, 1.5, 2.0];

const BACK_DOT_DEPTH: f32 = -0.7;

/// Local offsets of the flare dots after `elapsed` seconds.
///
/// Large dots orbit on sin/cos, small ones swing on cos/atan, so the set
/// never settles into a regular pattern.
pub fn flare_offsets(elapsed: f32) -> [Vec3; 5] {
    let mut offsets = [Vec3::ZERO; 5];
    for (i, (offset, scale)) in offsets.iter_mut().zip(FLARE_DOT_SCALES).enumerate() {
        let t = elapsed * scale;
        let (x, y) = if scale > 1.0 {
            ((t / 2.0).sin(), t.cos())
        } else {
            ((t / 2.0).cos(), t.atan())
        };
        let z = if i == FLARE_DOT_SCALES.len() - 1 { BACK_DOT_DEPTH } else { 0.0 };
        *offset = Vec3::new(x * scale / 8.0, y * scale / 5.0, z);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_at_rest() {
        let offsets = flare_offsets(0.0);
        // cos(0) = 1, atan(0) = 0
        assert_eq!(offsets[0], Vec3::new(0.5 / 8.0, 0.0, 0.0));
        // sin(0) = 0, cos(0) = 1
        assert_eq!(offsets[1], Vec3::new(0.0, 1.25 / 5.0, 0.0));
        assert_eq!(offsets[4].z, -0.7);
    }

    #[test]
    fn test_offsets_stay_bounded() {
        for step in 0..100 {
            for (offset, scale) in flare_offsets(step as f32 * 0.37).iter().zip(FLARE_DOT_SCALES) {
                assert!(offset.x.abs() <= scale / 8.0 + 1e-6);
                assert!(offset.y.abs() <= scale / 5.0 * std::f32::consts::FRAC_PI_2 + 1e-6);
            }
        }
    }
}
