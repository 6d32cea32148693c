//! Locomotion configuration and constants

use serde::{Deserialize, Serialize};

/// Locomotion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Walking step in world units per tick
    pub walk_speed: f32,
    /// Running step in world units per tick
    pub run_speed: f32,
    /// Planar distance at which a target counts as reached
    pub stop_threshold: f32,
    /// Turn rate, multiplied by delta time to get the slerp factor
    pub turn_speed: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 0.014,
            run_speed: 0.035,
            stop_threshold: 0.25,
            turn_speed: 7.0,
        }
    }
}

impl LocomotionConfig {
    /// Per-tick step cap for the current gait.
    ///
    /// Not scaled by delta time: characters cover more ground per second at
    /// higher frame rates.
    pub fn speed(&self, running: bool) -> f32 {
        if running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Slerp factor toward the desired facing for one tick
    pub fn turn_factor(&self, delta_time: f32) -> f32 {
        (self.turn_speed * delta_time).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocomotionConfig::default();
        assert_eq!(config.speed(false), 0.014);
        assert_eq!(config.speed(true), 0.035);
        assert_eq!(config.stop_threshold, 0.25);
    }

    #[test]
    fn test_turn_factor_is_clamped() {
        let config = LocomotionConfig::default();
        assert!((config.turn_factor(0.1) - 0.7).abs() < 1e-6);
        assert_eq!(config.turn_factor(1.0), 1.0);
        assert_eq!(config.turn_factor(-1.0), 0.0);
    }
}
