//! Errors raised by scene graph edits.

use thiserror::Error;

use crate::scene::ObjectKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(ObjectKey),

    #[error("Parent node not found: {0}")]
    ParentNotFound(ObjectKey),
}
