//! Core types used throughout Stride

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space transform of the controlled character.
///
/// The renderer reads this every frame; only the player controller writes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Axis the character model faces when its rotation is identity
    pub const FORWARD_AXIS: Vec3 = Vec3::Z;

    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform at `position` rotated `yaw` radians around +Y
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
        }
    }

    /// Direction the character is facing
    pub fn forward(&self) -> Vec3 {
        self.rotation * Self::FORWARD_AXIS
    }

    /// Offset from this transform to `target` on the horizontal (XZ) plane
    pub fn planar_offset_to(&self, target: Vec3) -> Vec3 {
        Vec3::new(target.x - self.position.x, 0.0, target.z - self.position.z)
    }

    /// Distance to `target` ignoring height
    pub fn planar_distance_to(&self, target: Vec3) -> f32 {
        self.planar_offset_to(target).length()
    }

    /// Rotation that turns [`Self::FORWARD_AXIS`] toward a horizontal direction.
    ///
    /// Returns `None` when the direction has no horizontal component.
    pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
        let planar = Vec3::new(direction.x, 0.0, direction.z).try_normalize()?;
        Some(Quat::from_rotation_arc(Self::FORWARD_AXIS, planar))
    }
}
