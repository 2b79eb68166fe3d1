//! Stylized Snell's-law helper used to steer the rainbow visuals.
//!
//! The angle is only ever used to rotate presentation elements, the traced
//! ray itself is never bent.

/// Index of refraction used for the prism glass.
pub const GLASS_IOR: f32 = 2.5;

/// Index of refraction of air.
pub const AIR_IOR: f32 = 1.000293;

/// Refracted angle for light passing from air into the prism glass.
pub fn refraction_angle(incident_angle: f32) -> f32 {
    refraction_angle_with(incident_angle, GLASS_IOR, AIR_IOR)
}

/// `asin(air_ior * sin(incident) / glass_ior)`.
///
/// Arguments outside `[-1, 1]` (total internal reflection) and NaN inputs
/// yield `0.0` so callers never see NaN.
pub fn refraction_angle_with(incident_angle: f32, glass_ior: f32, air_ior: f32) -> f32 {
    let theta = ((air_ior * incident_angle.sin()) / glass_ior).asin();
    if theta.is_nan() {
        0.0
    } else {
        theta
    }
}
