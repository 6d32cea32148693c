//! Character state

use glam::{Quat, Vec3};
use stride_core::Transform;

use crate::locomotion::LocomotionState;

/// The controlled character
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Character {
    /// Position and orientation
    pub transform: Transform,
    /// Current gait
    pub state: LocomotionState,
    /// Touching a non-floor collider
    pub is_colliding: bool,
    /// Teleported since the last tick
    pub is_teleporting: bool,
}

impl Character {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn orientation(&self) -> Quat {
        self.transform.rotation
    }
}
