//! Rainbow steering for the prism scene.
//!
//! While the beam rests on the prism, the rainbow fan is rotated by the
//! refraction the incoming ray would undergo, a flare sits on the entry point
//! and a spot light target drifts towards where the rainbow points.

use std::cell::RefCell;
use std::rc::Rc;

use lumen_core::{RayEvent, RayHandlers};
use lumen_math::{lerp_vec3, refraction_angle, Vec3};

/// Multiplier that exaggerates the refraction into a visible fan rotation.
const REFRACTION_GAIN: f32 = 6.0;
const SPOT_SPEED: f32 = 0.05;
const FLARE_DEPTH: f32 = -0.5;
const HIT_SPEED: f32 = 1.0;
const HIT_INTENSITY: f32 = 20.0;

/// Presentation state written by the prism's ray handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct RainbowState {
    /// Whether the beam currently rests on the prism
    pub hit: bool,
    /// Z rotation of the rainbow fan, radians
    pub rotation: f32,
    pub speed: f32,
    pub emissive_intensity: f32,
    pub flare_position: Vec3,
    /// Z rotation of the flare sprite, radians
    pub flare_rotation: f32,
    pub spot_target: Vec3,
}

impl Default for RainbowState {
    fn default() -> Self {
        Self {
            hit: false,
            rotation: 0.0,
            speed: 0.0,
            emissive_intensity: 0.0,
            flare_position: Vec3::new(0.0, 0.0, FLARE_DEPTH),
            flare_rotation: 0.0,
            spot_target: Vec3::ZERO,
        }
    }
}

impl RainbowState {
    fn enter(&mut self) {
        self.hit = true;
        self.speed = HIT_SPEED;
        self.emissive_intensity = HIT_INTENSITY;
    }

    fn steer(&mut self, position: Vec3, direction: Vec3, normal: Vec3) {
        self.flare_position = Vec3::new(position.x, position.y, FLARE_DEPTH);
        self.flare_rotation = -direction.x.atan2(direction.y);

        let centre_angle = (-position.y).atan2(-position.x);
        let incident = centre_angle - normal.y.atan2(normal.x);
        self.rotation = centre_angle + refraction_angle(incident) * REFRACTION_GAIN;

        let goal = Vec3::new(self.rotation.cos(), self.rotation.sin(), 0.0);
        lerp_vec3(&mut self.spot_target, goal, SPOT_SPEED);
    }
}

/// Owner of the shared rainbow state and the factory for its handlers.
#[derive(Debug, Clone)]
pub struct PrismEffect {
    state: Rc<RefCell<RainbowState>>,
    centre: Vec3,
}

impl PrismEffect {
    /// `centre` is where the beam is extended to while it rests on the prism.
    pub fn new(centre: Vec3) -> Self {
        Self {
            state: Rc::new(RefCell::new(RainbowState::default())),
            centre,
        }
    }

    /// Handlers for the prism's hit proxy.
    ///
    /// Entering the prism stops propagation, so the beam ends on it.
    pub fn handlers(&self) -> RayHandlers {
        let (over, moved, out) = (self.state.clone(), self.state.clone(), self.state.clone());
        RayHandlers::new()
            .on_over(move |event: &mut RayEvent<'_>| {
                event.stop_propagation();
                over.borrow_mut().enter();
                log::debug!("Beam entered prism at {}", event.position);
            })
            .on_move(move |event: &mut RayEvent<'_>| {
                if event.normal == Vec3::ZERO {
                    return;
                }
                moved
                    .borrow_mut()
                    .steer(event.position, event.direction, event.normal);
            })
            .on_out(move |_| {
                out.borrow_mut().hit = false;
                log::debug!("Beam left prism");
            })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RainbowState {
        self.state.borrow().clone()
    }

    pub fn is_hit(&self) -> bool {
        self.state.borrow().hit
    }

    /// Extra beam vertex to draw after the entry point, if the prism is lit.
    pub fn tail(&self) -> Option<Vec3> {
        self.is_hit().then_some(self.centre)
    }
}
