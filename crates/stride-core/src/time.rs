//! Frame clock for the simulation loop
//!
//! Produces the clamped, scaled delta time fed to `tick` once per frame, plus
//! an unscaled monotonic clock used to timestamp pointer input.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Whether to pause when window loses focus
    pub pause_on_unfocus: bool,
    /// Maximum delta time to prevent large jumps after a stall
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            pause_on_unfocus: true,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Scaled time since start in seconds (frozen while paused)
    pub total_time: f64,
    /// Delta time for this frame (clamped, scaled, zero while paused)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the game is paused
    pub paused: bool,
    /// Unscaled time since start, keeps running while paused
    real_time: f64,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.real_time += raw_delta.max(0.0) as f64;
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Monotonic wall-clock time since start, for input timestamps
    pub fn real_elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.real_time)
    }

    /// Pause the game
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the game
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}
