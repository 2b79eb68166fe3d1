//! Lumen FX - visual consumers of the reflector.
//!
//! Everything here turns engine output into presentation data: instance
//! matrices for streaks and glows, eased colours for lit objects, and the
//! rainbow/flare placement for the prism scene. No rendering happens here.

pub mod beam;
pub mod flare;
pub mod hover;
pub mod instances;
pub mod prism;

pub use beam::{Beam, BeamStyle};
pub use flare::{flare_offsets, FLARE_DOT_SCALES};
pub use hover::Hover;
pub use instances::{InstanceBatch, InstanceData};
pub use prism::{PrismEffect, RainbowState};
