//! Lumen Tracer - the ray-bounce engine.
//!
//! Traces a light ray through the interactive objects of a [`Scene`],
//! reflecting it off every surface it meets, and tells those objects when the
//! beam starts touching them, keeps touching them and leaves them.
//!
//! ```
//! use std::sync::Arc;
//! use lumen_core::{Mesh, Node, RayHandlers, Scene, Transform};
//! use lumen_math::Vec3;
//! use lumen_tracer::Reflector;
//!
//! let mut scene = Scene::new();
//! scene.add_node(
//!     None,
//!     Node::new("block")
//!         .with_mesh(Arc::new(Mesh::cuboid(Vec3::ONE)))
//!         .with_transform(Transform::from_translation(Vec3::new(3.0, 0.2, 0.1)))
//!         .with_handlers(RayHandlers::new().on_over(|e| e.stop_propagation())),
//! )?;
//!
//! let mut reflector = Reflector::new(10, 100.0);
//! reflector.set_ray(Vec3::ZERO, Vec3::X);
//! assert_eq!(reflector.update(&mut scene), 2);
//! # Ok::<(), lumen_core::SceneError>(())
//! ```
//!
//! [`Scene`]: lumen_core::Scene

mod config;
pub mod raycast;
mod reflect;
mod registry;

pub use config::{ConfigError, ReflectorConfig, MAX_BOUNCE};
pub use raycast::{RayHit, Raycaster};
pub use reflect::{HitRecord, Reflector, POSITION_PADDING};
pub use registry::ObjectRegistry;
