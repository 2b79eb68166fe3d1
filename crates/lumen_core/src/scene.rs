//! Scene graph types for Lumen.
//!
//! A small arena of nodes linked by parent/child keys. It stands in for the
//! host's scene layer: the bounce engine only needs to enumerate nodes, read
//! their hit handlers and resolve world transforms.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use lumen_math::{Mat4, Quat, Vec3};
use uuid::Uuid;

use crate::error::SceneError;
use crate::events::RayHandlers;
use crate::mesh::Mesh;

/// Stable identity of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(Uuid);

impl ObjectKey {
    /// Allocate a fresh random key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ObjectKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a new transform from a 4x4 matrix.
    ///
    /// Decomposes the matrix into translation, rotation, and scale.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Replace the rotation with XYZ Euler angles (radians).
    ///
    /// The X rotation is outermost, so the Z rotation is applied to the
    /// geometry first.
    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_rotation_x(x) * Quat::from_rotation_y(y) * Quat::from_rotation_z(z);
        self
    }

    /// Replace the scale with a uniform factor.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A scene node: a transform, optional hit geometry and optional ray handlers.
#[derive(Debug)]
pub struct Node {
    /// Display name, used in logs
    pub name: String,

    /// Render visibility. Hidden nodes still take part in hit testing, which
    /// is how invisible proxy meshes work.
    pub visible: bool,

    transform: Transform,
    mesh: Option<Arc<Mesh>>,
    handlers: RayHandlers,
    parent: Option<ObjectKey>,
    children: Vec<ObjectKey>,
    world: Mat4,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            transform: Transform::default(),
            mesh: None,
            handlers: RayHandlers::default(),
            parent: None,
            children: Vec::new(),
            world: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: Arc<Mesh>) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_handlers(mut self, handlers: RayHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    pub fn handlers(&self) -> &RayHandlers {
        &self.handlers
    }

    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectKey] {
        &self.children
    }

    /// World matrix as of the last [`Scene::update_world_matrices`] call.
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    /// A node takes part in ray hit testing when it has geometry and
    /// listens for at least one ray event.
    pub fn is_ray_target(&self) -> bool {
        self.mesh.is_some() && self.handlers.is_interactive()
    }
}

/// The node arena.
///
/// Structural edits (adding or removing nodes, swapping meshes or handlers)
/// bump [`Scene::generation`]; transform edits only mark world matrices stale.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<ObjectKey, Node>,
    roots: Vec<ObjectKey>,
    generation: u64,
    matrices_dirty: bool,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` under `parent` (or as a root) and return its key.
    pub fn add_node(&mut self, parent: Option<ObjectKey>, mut node: Node) -> Result<ObjectKey, SceneError> {
        let key = ObjectKey::new();
        match parent {
            Some(parent_key) => {
                let parent_node = self
                    .nodes
                    .get_mut(&parent_key)
                    .ok_or(SceneError::ParentNotFound(parent_key))?;
                parent_node.children.push(key);
            }
            None => self.roots.push(key),
        }

        node.parent = parent;
        node.children.clear();
        log::debug!("Added node '{}' ({})", node.name, key);
        self.nodes.insert(key, node);
        self.structure_changed();
        Ok(key)
    }

    /// Remove a node and its whole subtree. Returns the number of nodes removed.
    pub fn remove_node(&mut self, key: ObjectKey) -> Result<usize, SceneError> {
        let parent = self.nodes.get(&key).ok_or(SceneError::NodeNotFound(key))?.parent;
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|child| *child != key);
                }
            }
            None => self.roots.retain(|root| *root != key),
        }

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        log::debug!("Removed {} node(s) starting at {}", removed, key);
        self.structure_changed();
        Ok(removed)
    }

    pub fn node(&self, key: ObjectKey) -> Option<&Node> {
        self.nodes.get(&key)
    }

    /// Mutable access to name and visibility. Structural fields go through
    /// the dedicated setters so the generation stays accurate.
    pub fn node_mut(&mut self, key: ObjectKey) -> Option<&mut Node> {
        self.nodes.get_mut(&key)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn set_transform(&mut self, key: ObjectKey, transform: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&key).ok_or(SceneError::NodeNotFound(key))?;
        node.transform = transform;
        self.matrices_dirty = true;
        Ok(())
    }

    pub fn set_mesh(&mut self, key: ObjectKey, mesh: Option<Arc<Mesh>>) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&key).ok_or(SceneError::NodeNotFound(key))?;
        node.mesh = mesh;
        self.structure_changed();
        Ok(())
    }

    pub fn set_handlers(&mut self, key: ObjectKey, handlers: RayHandlers) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&key).ok_or(SceneError::NodeNotFound(key))?;
        node.handlers = handlers;
        self.structure_changed();
        Ok(())
    }

    /// Handlers of `key` for dispatch. Does not count as a structural change.
    pub fn handlers_mut(&mut self, key: ObjectKey) -> Option<&mut RayHandlers> {
        self.nodes.get_mut(&key).map(|node| &mut node.handlers)
    }

    /// Keys in depth-first pre-order, children in insertion order.
    pub fn traverse(&self) -> Vec<ObjectKey> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ObjectKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get(&key) {
                order.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Recompute every node's world matrix from its local transform.
    pub fn update_world_matrices(&mut self) {
        for key in self.traverse() {
            let parent_world = self
                .nodes
                .get(&key)
                .and_then(|node| node.parent)
                .and_then(|parent| self.nodes.get(&parent))
                .map_or(Mat4::IDENTITY, |parent| parent.world);

            if let Some(node) = self.nodes.get_mut(&key) {
                node.world = parent_world * node.transform.to_matrix();
            }
        }
        self.matrices_dirty = false;
    }

    /// Cached world matrix of `key`.
    pub fn world_matrix(&self, key: ObjectKey) -> Option<Mat4> {
        self.nodes.get(&key).map(|node| node.world)
    }

    /// True if a transform changed since the last world matrix update.
    pub fn matrices_dirty(&self) -> bool {
        self.matrices_dirty
    }

    /// Counter bumped on every structural change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get total node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn structure_changed(&mut self) {
        self.generation += 1;
        self.matrices_dirty = true;
    }
}
