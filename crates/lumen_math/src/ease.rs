//! Frame-rate naive easing used by the visual consumers.

use crate::Vec3;

/// Move `value` a fraction `speed` of the way towards `goal`.
pub fn lerp(value: &mut f32, goal: f32, speed: f32) {
    *value += (goal - *value) * speed;
}

/// Component-wise [`lerp`] for points and directions.
pub fn lerp_vec3(value: &mut Vec3, goal: Vec3, speed: f32) {
    *value = value.lerp(goal, speed);
}

/// Ease an RGB colour towards a packed `0xRRGGBB` goal.
pub fn lerp_color(value: &mut Vec3, goal: u32, speed: f32) {
    lerp_vec3(value, rgb_from_hex(goal), speed);
}

/// Unpack `0xRRGGBB` into 0..1 channels.
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32;
    let g = ((hex >> 8) & 0xff) as f32;
    let b = (hex & 0xff) as f32;
    Vec3::new(r, g, b) / 255.0
}
