//! Player configuration

use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::locomotion::LocomotionConfig;
use crate::navigation::PointerConfig;

/// Everything tunable about the controlled character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub locomotion: LocomotionConfig,
    pub pointer: PointerConfig,
    pub animation: AnimationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PlayerConfig = toml::from_str(
            r#"
            [locomotion]
            walk_speed = 0.02

            [pointer]
            double_click_window_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.locomotion.walk_speed, 0.02);
        assert_eq!(config.locomotion.run_speed, 0.035);
        assert_eq!(config.pointer.double_click_window_ms, 250);
        assert_eq!(config.animation, AnimationConfig::default());
    }
}
