//! Highlight state for objects lit by the beam.

use std::cell::Cell;
use std::rc::Rc;

use lumen_core::RayHandlers;
use lumen_math::{lerp_color, rgb_from_hex, Vec3};

const LIT_EMISSIVE: u32 = 0xffffff;
const IDLE_EMISSIVE: u32 = 0x454545;
const LIT_COLOR: u32 = 0xffa500;
const IDLE_COLOR: u32 = 0xffffff;
const EMISSIVE_SPEED: f32 = 0.1;

/// Tracks whether the beam is on an object and eases its glow accordingly.
///
/// The hovered flag is shared with the handlers returned by
/// [`Hover::handlers`], so it flips during `Reflector::update` and the
/// colour catches up on the following [`Hover::tick`] calls.
#[derive(Debug, Clone)]
pub struct Hover {
    hovered: Rc<Cell<bool>>,
    emissive: Vec3,
}

impl Default for Hover {
    fn default() -> Self {
        Self::new()
    }
}

impl Hover {
    pub fn new() -> Self {
        Self {
            hovered: Rc::new(Cell::new(false)),
            emissive: rgb_from_hex(IDLE_EMISSIVE),
        }
    }

    /// Enter and exit handlers that drive this hover state.
    pub fn handlers(&self) -> RayHandlers {
        let (over, out) = (self.hovered.clone(), self.hovered.clone());
        RayHandlers::new()
            .on_over(move |_| over.set(true))
            .on_out(move |_| out.set(false))
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered.get()
    }

    /// Ease the emissive colour one frame towards its goal.
    pub fn tick(&mut self) -> Vec3 {
        let goal = if self.is_hovered() { LIT_EMISSIVE } else { IDLE_EMISSIVE };
        lerp_color(&mut self.emissive, goal, EMISSIVE_SPEED);
        self.emissive
    }

    pub fn emissive(&self) -> Vec3 {
        self.emissive
    }

    /// Flat colour for unlit materials: orange while hovered, white otherwise.
    pub fn color(&self) -> Vec3 {
        rgb_from_hex(if self.is_hovered() { LIT_COLOR } else { IDLE_COLOR })
    }
}
