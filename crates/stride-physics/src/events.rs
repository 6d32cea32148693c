//! Collision event capture
//!
//! rapier reports collision start/stop through an [`EventHandler`] during
//! `PhysicsPipeline::step`. The recorder buffers them so the simulation loop
//! can forward them to the character controller after the step.

use parking_lot::Mutex;
use rapier3d::prelude::*;

/// Whether a contact pair started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Started,
    Stopped,
}

/// A collision between two colliders, with their user-data tags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
    /// Tag of `collider1`, `None` when it was removed during the step
    pub tag1: Option<u128>,
    /// Tag of `collider2`, `None` when it was removed during the step
    pub tag2: Option<u128>,
}

impl ContactEvent {
    /// The other side of the pair if `collider` took part in it
    pub fn other(&self, collider: ColliderHandle) -> Option<(ColliderHandle, Option<u128>)> {
        if self.collider1 == collider {
            Some((self.collider2, self.tag2))
        } else if self.collider2 == collider {
            Some((self.collider1, self.tag1))
        } else {
            None
        }
    }
}

/// Buffers collision events emitted by the physics pipeline
#[derive(Default)]
pub(crate) struct CollisionRecorder {
    events: Mutex<Vec<ContactEvent>>,
}

impl CollisionRecorder {
    pub(crate) fn drain(&self) -> Vec<ContactEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for CollisionRecorder {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let phase = if event.started() {
            ContactPhase::Started
        } else {
            ContactPhase::Stopped
        };
        let tag = |handle: ColliderHandle| colliders.get(handle).map(|collider| collider.user_data);

        let contact = ContactEvent {
            phase,
            collider1: event.collider1(),
            collider2: event.collider2(),
            tag1: tag(event.collider1()),
            tag2: tag(event.collider2()),
        };
        tracing::trace!(?contact, "collision event");
        self.events.lock().push(contact);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
