//! Ray hit events delivered to scene objects.
//!
//! Objects opt into ray interaction by attaching a [`RayHandlers`] set with at
//! least one callback. The bounce engine calls them synchronously while it
//! diffs the current tick's contacts against the previous tick.

use std::fmt;

use lumen_math::Vec3;

use crate::scene::ObjectKey;

/// One intersection found while tracing the bounced ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Object that was hit
    pub object: ObjectKey,
    /// World-space hit point
    pub point: Vec3,
    /// Distance from the segment start to the hit point
    pub distance: f32,
    /// World-space surface normal (unit length, or zero for degenerate faces)
    pub normal: Vec3,
    /// Direction the ray was travelling when it hit
    pub direction: Vec3,
    /// Direction the ray leaves in after the bounce
    pub reflect: Vec3,
}

/// Payload handed to enter/move/exit handlers.
///
/// `contacts` is the full contact set of the current tick in trace order.
pub struct RayEvent<'a> {
    pub object: ObjectKey,
    pub position: Vec3,
    pub direction: Vec3,
    pub reflect: Vec3,
    pub normal: Vec3,
    pub contact: &'a Contact,
    pub contacts: &'a [Contact],
    stopped: &'a mut bool,
}

impl<'a> RayEvent<'a> {
    /// Build an event for `contact`, writing propagation stops into `stopped`.
    pub fn new(contact: &'a Contact, contacts: &'a [Contact], stopped: &'a mut bool) -> Self {
        Self {
            object: contact.object,
            position: contact.point,
            direction: contact.direction,
            reflect: contact.reflect,
            normal: contact.normal,
            contact,
            contacts,
            stopped,
        }
    }

    /// Halt dispatch to the contacts behind this one.
    ///
    /// The flag lives on the object's hit record, so it keeps cutting the
    /// beam at this object until the ray leaves it.
    pub fn stop_propagation(&mut self) {
        *self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped
    }
}

impl fmt::Debug for RayEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayEvent")
            .field("object", &self.object)
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("reflect", &self.reflect)
            .field("normal", &self.normal)
            .field("contacts", &self.contacts.len())
            .field("stopped", &*self.stopped)
            .finish()
    }
}

/// Boxed callback invoked with a ray event.
pub type RayHandler = Box<dyn FnMut(&mut RayEvent<'_>)>;

/// Optional enter/move/exit callbacks attached to a scene node.
#[derive(Default)]
pub struct RayHandlers {
    /// Called once when the ray starts touching the object
    pub over: Option<RayHandler>,
    /// Called every tick the ray touches the object, including the first
    pub moved: Option<RayHandler>,
    /// Called once when the ray stops touching the object
    pub out: Option<RayHandler>,
}

impl RayHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_over(mut self, handler: impl FnMut(&mut RayEvent<'_>) + 'static) -> Self {
        self.over = Some(Box::new(handler));
        self
    }

    pub fn on_move(mut self, handler: impl FnMut(&mut RayEvent<'_>) + 'static) -> Self {
        self.moved = Some(Box::new(handler));
        self
    }

    pub fn on_out(mut self, handler: impl FnMut(&mut RayEvent<'_>) + 'static) -> Self {
        self.out = Some(Box::new(handler));
        self
    }

    /// True if at least one callback is registered.
    pub fn is_interactive(&self) -> bool {
        self.over.is_some() || self.moved.is_some() || self.out.is_some()
    }
}

impl fmt::Debug for RayHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayHandlers")
            .field("over", &self.over.is_some())
            .field("moved", &self.moved.is_some())
            .field("out", &self.out.is_some())
            .finish()
    }
}
