//! The ray-bounce engine.
//!
//! Each tick the [`Reflector`] traces a ray from its origin towards its
//! target, mirroring it off every registered object it meets until either
//! nothing is hit or the bounce budget runs out. The resulting polyline is
//! written into a reusable flat position buffer. The contacts of the trace
//! are then diffed against the previous tick to fire enter/move/exit
//! handlers on the objects involved.

use indexmap::IndexMap;
use lumen_core::{Contact, ObjectKey, RayEvent, Scene};
use lumen_math::{reflect, Ray, Vec3};

use crate::config::{ReflectorConfig, MAX_BOUNCE};
use crate::raycast::Raycaster;
use crate::registry::ObjectRegistry;

/// Spare vertex slots allocated beyond the bounce limit.
pub const POSITION_PADDING: usize = 10;

/// Hit state of one object the ray is currently touching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub key: ObjectKey,
    /// Latest contact with the object
    pub contact: Contact,
    /// Set by `stop_propagation`; stays set until the ray leaves the object
    pub stopped: bool,
}

/// Traces a bouncing ray and keeps per-object hit state between ticks.
#[derive(Debug)]
pub struct Reflector {
    origin: Vec3,
    target: Vec3,
    bounce_limit: usize,
    far: f32,

    positions: Vec<f32>,
    written: usize,
    count: usize,

    registry: ObjectRegistry,
    raycaster: Raycaster,
    contacts: Vec<Contact>,
    hits: IndexMap<ObjectKey, HitRecord>,
    departed: Vec<ObjectKey>,
}

impl Default for Reflector {
    fn default() -> Self {
        Self::from_config(&ReflectorConfig::default())
    }
}

impl Reflector {
    /// Create a reflector allowing `bounce` reflections before the ray is
    /// sent `far` units into open space.
    pub fn new(bounce: u32, far: f32) -> Self {
        if bounce > MAX_BOUNCE {
            log::warn!("Bounce count {} exceeds {}, clamping", bounce, MAX_BOUNCE);
        }
        // One extra slot for the origin vertex.
        let bounce_limit = bounce.clamp(1, MAX_BOUNCE) as usize + 1;
        Self {
            origin: Vec3::ZERO,
            target: Vec3::ZERO,
            bounce_limit,
            far,
            positions: vec![0.0; (bounce_limit + POSITION_PADDING) * 3],
            written: 0,
            count: 0,
            registry: ObjectRegistry::new(),
            raycaster: Raycaster::new(),
            contacts: Vec::with_capacity(bounce_limit),
            hits: IndexMap::new(),
            departed: Vec::new(),
        }
    }

    pub fn from_config(config: &ReflectorConfig) -> Self {
        let mut reflector = Self::new(config.bounce, config.far);
        reflector.set_ray(config.start(), config.end());
        reflector
    }

    /// Set the ray for the next [`update`](Self::update). Last call wins.
    pub fn set_ray(&mut self, origin: Vec3, target: Vec3) {
        self.origin = origin;
        self.target = target;
    }

    /// Rescan `scene` for ray targets right away.
    pub fn refresh(&mut self, scene: &mut Scene) -> usize {
        self.registry.refresh(scene)
    }

    /// Run one tick and return the number of vertices consumers should use.
    ///
    /// The result is never below 2. The registry is rescanned first if the
    /// scene changed structurally since the last tick, and world matrices
    /// are resolved if any transform moved.
    pub fn update(&mut self, scene: &mut Scene) -> usize {
        self.registry.refresh_if_changed(scene);
        if scene.matrices_dirty() {
            scene.update_world_matrices();
        }
        self.trace(scene);
        self.count = self.dispatch(scene);

        log::trace!(
            "Reflector tick: {} vertices written, {} contacts, count {}",
            self.written,
            self.contacts.len(),
            self.count
        );
        self.count
    }

    /// Follow the ray through the registered objects, filling the position
    /// buffer and the contact list.
    fn trace(&mut self, scene: &Scene) {
        self.contacts.clear();
        self.written = 0;

        let mut ray = Ray::through(self.origin, self.target);
        self.push_vertex(ray.origin);

        loop {
            let hit = self
                .raycaster
                .intersect_objects(scene, self.registry.objects(), &ray);

            match hit {
                Some(hit) if self.written < self.bounce_limit => {
                    self.push_vertex(hit.point);
                    let reflected = reflect(ray.direction, hit.normal);
                    self.contacts.push(Contact {
                        object: hit.object,
                        point: hit.point,
                        distance: hit.distance,
                        normal: hit.normal,
                        direction: ray.direction,
                        reflect: reflected,
                    });
                    ray = Ray::new(hit.point, reflected);
                }
                _ => {
                    self.push_vertex(ray.at(self.far));
                    break;
                }
            }
        }
    }

    /// Fire exit, enter and move handlers and compute the vertex count.
    fn dispatch(&mut self, scene: &mut Scene) -> usize {
        // Exit pass
        let mut departed = std::mem::take(&mut self.departed);
        departed.clear();
        departed.extend(
            self.hits
                .keys()
                .filter(|key| !self.contacts.iter().any(|c| c.object == **key))
                .copied(),
        );

        for key in departed.drain(..) {
            let Some(mut hit) = self.hits.shift_remove(&key) else {
                continue;
            };
            log::debug!("Ray left {}", key);
            if let Some(out) = scene.handlers_mut(key).and_then(|h| h.out.as_mut()) {
                out(&mut RayEvent::new(&hit.contact, &self.contacts, &mut hit.stopped));
            }
        }
        self.departed = departed;

        // Enter/move pass
        let mut number = 1;
        let last = self.contacts.len().checked_sub(1);

        for (index, contact) in self.contacts.iter().enumerate() {
            number += 1;

            let hit = match self.hits.entry(contact.object) {
                indexmap::map::Entry::Occupied(entry) => {
                    let hit = entry.into_mut();
                    hit.contact = *contact;
                    hit
                }
                indexmap::map::Entry::Vacant(entry) => {
                    log::debug!("Ray entered {}", contact.object);
                    let hit = entry.insert(HitRecord {
                        key: contact.object,
                        contact: *contact,
                        stopped: false,
                    });
                    if let Some(over) = scene.handlers_mut(contact.object).and_then(|h| h.over.as_mut()) {
                        over(&mut RayEvent::new(contact, &self.contacts, &mut hit.stopped));
                    }
                    hit
                }
            };

            if let Some(moved) = scene.handlers_mut(contact.object).and_then(|h| h.moved.as_mut()) {
                moved(&mut RayEvent::new(contact, &self.contacts, &mut hit.stopped));
            }

            if hit.stopped {
                break;
            }

            // The beam leaves the last contact into open space.
            if Some(index) == last {
                number += 1;
            }
        }

        number.max(2)
    }

    fn push_vertex(&mut self, point: Vec3) {
        let offset = self.written * 3;
        self.positions[offset..offset + 3].copy_from_slice(&point.to_array());
        self.written += 1;
    }

    /// The flat position buffer. Only the first [`count`](Self::count)
    /// triples are meaningful; the tail holds stale data.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The position buffer viewed as `[x, y, z]` triples.
    pub fn vertices(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Vertex `index` of the buffer, stale or not.
    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        self.vertices().get(index).map(|v| Vec3::from_array(*v))
    }

    /// Result of the last [`update`](Self::update).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of vertices the last trace actually wrote.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Contacts of the last trace in order along the beam.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Objects currently touched by the ray, in order of first contact.
    pub fn hits(&self) -> impl Iterator<Item = &HitRecord> {
        self.hits.values()
    }

    pub fn is_hit(&self, key: ObjectKey) -> bool {
        self.hits.contains_key(&key)
    }

    /// Objects the ray is tested against.
    pub fn objects(&self) -> &[ObjectKey] {
        self.registry.objects()
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Configured bounces plus one for the origin.
    pub fn bounce_limit(&self) -> usize {
        self.bounce_limit
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Number of vertex slots in the position buffer.
    pub fn capacity(&self) -> usize {
        self.positions.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use lumen_core::{Mesh, Node, RayHandlers, Transform};

    /// Mirror in the plane x = `x` facing -X, big enough to catch rays near
    /// the X axis.
    fn mirror_mesh(x: f32) -> Arc<Mesh> {
        Arc::new(Mesh::new(
            vec![
                Vec3::new(x, -3.0, -3.0),
                Vec3::new(x, -3.0, 3.0),
                Vec3::new(x, 3.0, 0.0),
            ],
            vec![0, 1, 2],
        ))
    }

    fn add_mirror(scene: &mut Scene, x: f32, handlers: RayHandlers) -> ObjectKey {
        scene
            .add_node(None, Node::new("mirror").with_mesh(mirror_mesh(x)).with_handlers(handlers))
            .unwrap()
    }

    #[test]
    fn test_new_adds_origin_slot() {
        let reflector = Reflector::new(10, 100.0);
        assert_eq!(reflector.bounce_limit(), 11);
        assert_eq!(reflector.capacity(), 21);
        assert_eq!(reflector.positions().len(), 63);

        assert_eq!(Reflector::new(0, 1.0).bounce_limit(), 2);
    }

    #[test]
    fn test_empty_scene() {
        let mut scene = Scene::new();
        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 3.0, 0.0));

        assert_eq!(reflector.update(&mut scene), 2);
        assert_eq!(reflector.vertex(0), Some(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(reflector.vertex(1), Some(Vec3::new(1.0, 101.0, 0.0)));
        assert!(reflector.contacts().is_empty());
    }

    #[test]
    fn test_update_without_set_ray() {
        let mut scene = Scene::new();
        add_mirror(&mut scene, 2.0, RayHandlers::new().on_over(|_| {}));
        let mut reflector = Reflector::new(10, 100.0);

        assert_eq!(reflector.update(&mut scene), 2);
        assert_eq!(reflector.vertex(0), Some(Vec3::ZERO));
        assert_eq!(reflector.vertex(1), Some(Vec3::ZERO));
    }

    #[test]
    fn test_single_mirror_bounce() {
        let mut scene = Scene::new();
        let key = add_mirror(&mut scene, 2.0, RayHandlers::new().on_over(|_| {}));
        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::ZERO, Vec3::X);

        // origin + bounce + open space
        assert_eq!(reflector.update(&mut scene), 3);
        assert_eq!(reflector.written(), 3);

        let contact = reflector.contacts()[0];
        assert_eq!(contact.object, key);
        assert!((contact.point - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((contact.reflect - Vec3::NEG_X).length() < 1e-5);
        assert!((contact.direction - Vec3::X).length() < 1e-5);

        assert!((reflector.vertex(1).unwrap() - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((reflector.vertex(2).unwrap() - Vec3::new(-98.0, 0.0, 0.0)).length() < 1e-3);
        assert!(reflector.is_hit(key));
    }

    #[test]
    fn test_bounce_limit_caps_vertices() {
        // Two facing mirrors trap the ray.
        let mut scene = Scene::new();
        add_mirror(&mut scene, 2.0, RayHandlers::new().on_move(|_| {}));
        let left = Arc::new(Mesh::new(
            vec![
                Vec3::new(-2.0, -3.0, -3.0),
                Vec3::new(-2.0, 3.0, 0.0),
                Vec3::new(-2.0, -3.0, 3.0),
            ],
            vec![0, 1, 2],
        ));
        scene
            .add_node(
                None,
                Node::new("left")
                    .with_mesh(left)
                    .with_handlers(RayHandlers::new().on_move(|_| {})),
            )
            .unwrap();

        let mut reflector = Reflector::new(3, 10.0);
        reflector.set_ray(Vec3::ZERO, Vec3::X);
        let count = reflector.update(&mut scene);

        assert_eq!(reflector.contacts().len(), 3);
        assert_eq!(reflector.written(), reflector.bounce_limit() + 1);
        assert_eq!(count, 5);
    }

    #[test]
    fn test_enter_move_exit_sequence() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (over, moved, out) = (log.clone(), log.clone(), log.clone());
        let handlers = RayHandlers::new()
            .on_over(move |_| over.borrow_mut().push("over"))
            .on_move(move |_| moved.borrow_mut().push("move"))
            .on_out(move |_| out.borrow_mut().push("out"));

        let mut scene = Scene::new();
        let key = add_mirror(&mut scene, 2.0, handlers);
        let mut reflector = Reflector::new(10, 100.0);

        reflector.set_ray(Vec3::ZERO, Vec3::X);
        reflector.update(&mut scene);
        reflector.update(&mut scene);
        reflector.set_ray(Vec3::ZERO, Vec3::NEG_X);
        reflector.update(&mut scene);
        reflector.update(&mut scene);

        assert_eq!(*log.borrow(), vec!["over", "move", "move", "out"]);
        assert!(!reflector.is_hit(key));
    }

    #[test]
    fn test_stop_propagation_persists_while_hit() {
        let mut scene = Scene::new();
        add_mirror(
            &mut scene,
            2.0,
            RayHandlers::new().on_over(|event| event.stop_propagation()),
        );
        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::ZERO, Vec3::X);

        assert_eq!(reflector.update(&mut scene), 2);
        // No new enter, but the record keeps cutting the beam.
        assert_eq!(reflector.update(&mut scene), 2);
        assert!(reflector.hits().all(|hit| hit.stopped));
    }

    #[test]
    fn test_exit_handler_sees_last_contact() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let mut scene = Scene::new();
        add_mirror(
            &mut scene,
            2.0,
            RayHandlers::new().on_out(move |event| *sink.borrow_mut() = Some((event.position, event.contacts.len()))),
        );

        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::ZERO, Vec3::X);
        reflector.update(&mut scene);
        reflector.set_ray(Vec3::ZERO, Vec3::Y);
        reflector.update(&mut scene);

        let (position, contacts) = seen.borrow().unwrap();
        assert!((position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(contacts, 0);
    }

    #[test]
    fn test_removed_object_exits_silently() {
        let mut scene = Scene::new();
        let key = add_mirror(&mut scene, 2.0, RayHandlers::new().on_over(|_| {}));
        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::ZERO, Vec3::X);
        reflector.update(&mut scene);
        assert!(reflector.is_hit(key));

        scene.remove_node(key).unwrap();
        assert_eq!(reflector.update(&mut scene), 2);
        assert!(!reflector.is_hit(key));
        assert!(reflector.objects().is_empty());
    }

    #[test]
    fn test_moved_object_is_picked_up_next_tick() {
        let mut scene = Scene::new();
        let key = add_mirror(&mut scene, 2.0, RayHandlers::new().on_over(|_| {}));
        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::ZERO, Vec3::X);
        reflector.update(&mut scene);
        assert!((reflector.contacts()[0].point.x - 2.0).abs() < 1e-5);

        scene
            .set_transform(key, Transform::from_translation(Vec3::new(3.0, 0.0, 0.0)))
            .unwrap();
        assert!(scene.matrices_dirty());

        for _ in 0..3 {
            reflector.update(&mut scene);
            assert!((reflector.contacts()[0].point.x - 5.0).abs() < 1e-5);
        }
        assert!(!scene.matrices_dirty());
    }

    #[test]
    fn test_degenerate_normal_passes_straight_through() {
        // Flattening the mirror along its own normal keeps the triangle
        // hittable but collapses the world normal to zero.
        let mut scene = Scene::new();
        let key = scene
            .add_node(
                None,
                Node::new("flat mirror")
                    .with_mesh(mirror_mesh(2.0))
                    .with_transform(Transform {
                        scale: Vec3::new(0.0, 1.0, 1.0),
                        ..Default::default()
                    })
                    .with_handlers(RayHandlers::new().on_over(|_| {})),
            )
            .unwrap();
        let mut reflector = Reflector::new(10, 100.0);
        reflector.set_ray(Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO);

        assert_eq!(reflector.update(&mut scene), 3);
        assert_eq!(reflector.written(), 3);

        let contact = reflector.contacts()[0];
        assert_eq!(contact.object, key);
        assert_eq!(contact.normal, Vec3::ZERO);
        assert_eq!(contact.reflect, contact.direction);
        assert!((reflector.vertex(2).unwrap() - Vec3::new(100.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_bounce_is_capped() {
        let reflector = Reflector::new(u32::MAX, 1.0);
        assert_eq!(reflector.bounce_limit(), MAX_BOUNCE as usize + 1);
        assert_eq!(reflector.capacity(), MAX_BOUNCE as usize + 1 + POSITION_PADDING);
    }

    #[test]
    fn test_vertices_view_matches_flat_buffer() {
        let mut scene = Scene::new();
        let mut reflector = Reflector::new(2, 5.0);
        reflector.set_ray(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 4.0));
        reflector.update(&mut scene);

        assert_eq!(reflector.vertices().len(), reflector.capacity());
        assert_eq!(reflector.vertices()[1], [1.0, 2.0, 8.0]);
        assert_eq!(&reflector.positions()[3..6], &[1.0, 2.0, 8.0]);
    }

    #[test]
    fn test_from_config() {
        let config = ReflectorConfig {
            bounce: 4,
            far: 10.0,
            start: [10.0, 5.0, 0.0],
            end: [0.0, 0.0, 0.0],
        };
        let reflector = Reflector::from_config(&config);

        assert_eq!(reflector.bounce_limit(), 5);
        assert_eq!(reflector.far(), 10.0);
        assert_eq!(reflector.origin(), Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(reflector.target(), Vec3::ZERO);
    }
}
