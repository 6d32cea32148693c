//! Point-to-point locomotion
//!
//! Moves the character across the ground plane toward its navigation target
//! and turns it to face the direction of travel.

mod config;
mod controller;

pub use config::LocomotionConfig;
pub use controller::{LocomotionController, LocomotionStep, TickContext};

use glam::Vec3;

/// Where the character is heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationTarget {
    /// A clicked destination, optionally at a run
    Explicit { point: Vec3, run: bool },
    /// A walk-only destination issued by the game itself
    Implicit { point: Vec3 },
}

impl NavigationTarget {
    /// Destination point
    pub fn point(&self) -> Vec3 {
        match self {
            NavigationTarget::Explicit { point, .. } | NavigationTarget::Implicit { point } => {
                *point
            }
        }
    }

    /// Whether the character should run there
    pub fn wants_run(&self) -> bool {
        match self {
            NavigationTarget::Explicit { run, .. } => *run,
            NavigationTarget::Implicit { .. } => false,
        }
    }
}

/// Gait reported to the animation blender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocomotionState {
    #[default]
    Idle,
    Walking,
    Running,
}

impl LocomotionState {
    /// Walking or running
    pub fn is_moving(self) -> bool {
        !matches!(self, LocomotionState::Idle)
    }

    pub fn is_running(self) -> bool {
        matches!(self, LocomotionState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_variants() {
        let explicit = NavigationTarget::Explicit {
            point: Vec3::X,
            run: true,
        };
        let implicit = NavigationTarget::Implicit { point: Vec3::Z };

        assert_eq!(explicit.point(), Vec3::X);
        assert!(explicit.wants_run());
        assert_eq!(implicit.point(), Vec3::Z);
        assert!(!implicit.wants_run());
    }

    #[test]
    fn test_state_flags() {
        assert!(!LocomotionState::Idle.is_moving());
        assert!(LocomotionState::Walking.is_moving());
        assert!(LocomotionState::Running.is_running());
    }
}
