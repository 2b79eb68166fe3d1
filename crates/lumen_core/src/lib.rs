//! Lumen Core - scene graph and ray event types for the bounce demo.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `Node`, `Transform`, `Mesh`
//! - **Ray events**: `Contact`, `RayEvent`, `RayHandlers`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lumen_core::{Mesh, Node, RayHandlers, Scene, Transform};
//! use lumen_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let block = Node::new("block")
//!     .with_mesh(Arc::new(Mesh::cuboid(Vec3::ONE)))
//!     .with_transform(Transform::from_translation(Vec3::new(2.0, 0.0, 0.0)))
//!     .with_handlers(RayHandlers::new().on_over(|e| log::info!("lit at {}", e.position)));
//! let key = scene.add_node(None, block)?;
//! scene.update_world_matrices();
//! assert!(scene.world_matrix(key).is_some());
//! # Ok::<(), lumen_core::SceneError>(())
//! ```

pub mod error;
pub mod events;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use error::SceneError;
pub use events::{Contact, RayEvent, RayHandler, RayHandlers};
pub use mesh::Mesh;
pub use scene::{Node, ObjectKey, Scene, Transform};
