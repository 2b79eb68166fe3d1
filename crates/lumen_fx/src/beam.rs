//! Streak and glow instances along the traced beam.

use lumen_math::{Mat4, Quat, Vec3};
use lumen_tracer::Reflector;

use crate::instances::InstanceBatch;

/// Scale applied to glow sprites sitting on bounce points.
const GLOW_SCALE: f32 = 0.75;

/// How a beam segment is stretched into a streak sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamStyle {
    /// Streak length as a multiple of segment length
    pub stride: f32,
    /// Streak thickness
    pub width: f32,
}

impl Default for BeamStyle {
    fn default() -> Self {
        Self {
            stride: 4.0,
            width: 8.0,
        }
    }
}

/// Instance data for one beam: a streak per segment and a glow per bounce.
#[derive(Debug, Clone)]
pub struct Beam {
    style: BeamStyle,
    streaks: InstanceBatch,
    glows: InstanceBatch,
    points: Vec<Vec3>,
}

impl Beam {
    pub fn new(style: BeamStyle, capacity: usize) -> Self {
        Self {
            style,
            streaks: InstanceBatch::new(capacity),
            glows: InstanceBatch::new(capacity),
            points: Vec::with_capacity(capacity + 1),
        }
    }

    /// Size the batches to everything `reflector` can ever write.
    pub fn for_reflector(reflector: &Reflector, style: BeamStyle) -> Self {
        Self::new(style, reflector.capacity())
    }

    /// Lay out the beam from the reflector's latest tick.
    pub fn update(&mut self, reflector: &Reflector, tail: Option<Vec3>) -> usize {
        self.layout(reflector.vertices(), reflector.count(), tail)
    }

    /// Lay out the first `count` vertices, optionally followed by `tail`.
    ///
    /// Returns the number of points the beam passes through.
    pub fn layout(&mut self, vertices: &[[f32; 3]], count: usize, tail: Option<Vec3>) -> usize {
        self.points.clear();
        self.points.extend(
            vertices
                .iter()
                .take(count)
                .map(|v| Vec3::from_array(*v)),
        );
        self.points.extend(tail);

        let segments = self.points.len().saturating_sub(1);

        for (i, pair) in self.points.windows(2).enumerate() {
            let (start, end) = (pair[0], pair[1]);
            let span = end - start;
            let matrix = Mat4::from_scale_rotation_translation(
                Vec3::new(span.length() * self.style.stride, self.style.width, 1.0),
                Quat::from_rotation_z(span.y.atan2(span.x)),
                (start + end) * 0.5,
            );
            self.streaks.set(i, matrix);
        }
        self.streaks.set_count(segments);

        // The origin never glows; every later point up to the last segment
        // start is a bounce.
        for (i, point) in self.points.iter().take(segments).enumerate() {
            let scale = if i == 0 { 0.0 } else { GLOW_SCALE };
            self.glows
                .set(i, Mat4::from_scale_rotation_translation(Vec3::splat(scale), Quat::IDENTITY, *point));
        }
        self.glows.set_count(segments);

        self.points.len()
    }

    pub fn style(&self) -> BeamStyle {
        self.style
    }

    pub fn set_style(&mut self, style: BeamStyle) {
        self.style = style;
    }

    pub fn streaks(&self) -> &InstanceBatch {
        &self.streaks
    }

    pub fn glows(&self) -> &InstanceBatch {
        &self.glows
    }

    /// Points of the last layout, tail included.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}
