//! Registry of scene objects that listen for ray events.

use lumen_core::{ObjectKey, Scene};

/// Keys of every node that has a mesh and at least one ray handler, in scene
/// traversal order.
///
/// The registry never owns nodes. A rescan only happens when the scene's
/// structural generation moves, so the per-tick cost stays flat.
#[derive(Debug, Default, Clone)]
pub struct ObjectRegistry {
    objects: Vec<ObjectKey>,
    generation: Option<u64>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan `scene` and resolve its world matrices.
    ///
    /// Returns the number of registered objects.
    pub fn refresh(&mut self, scene: &mut Scene) -> usize {
        self.objects.clear();
        self.objects.extend(
            scene
                .traverse()
                .into_iter()
                .filter(|key| scene.node(*key).is_some_and(|node| node.is_ray_target())),
        );
        self.generation = Some(scene.generation());

        // Hit tests must not run against unresolved transforms.
        scene.update_world_matrices();

        log::debug!(
            "Object registry refreshed: {} ray target(s) of {} node(s)",
            self.objects.len(),
            scene.node_count()
        );
        self.objects.len()
    }

    /// Rescan only if the scene structure changed since the last refresh.
    ///
    /// Returns true if a rescan happened.
    pub fn refresh_if_changed(&mut self, scene: &mut Scene) -> bool {
        if !self.is_stale(scene) {
            return false;
        }
        self.refresh(scene);
        true
    }

    /// True if the scene changed structurally since the last refresh.
    pub fn is_stale(&self, scene: &Scene) -> bool {
        self.generation != Some(scene.generation())
    }

    pub fn objects(&self) -> &[ObjectKey] {
        &self.objects
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
