//! Animation configuration

use serde::{Deserialize, Serialize};

use super::Track;

/// Clip names bound to each character track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipBindings {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub stand_to_crouch: String,
    pub crouch_idle: String,
    pub crouch_to_stand: String,
}

impl Default for ClipBindings {
    fn default() -> Self {
        Self {
            idle: "Idle".to_string(),
            walk: "Walk".to_string(),
            run: "Run".to_string(),
            stand_to_crouch: "StandToCrouch".to_string(),
            crouch_idle: "CrouchIdle".to_string(),
            crouch_to_stand: "CrouchToStand".to_string(),
        }
    }
}

impl ClipBindings {
    /// Clip name bound to a track
    pub fn clip_for(&self, track: Track) -> &str {
        match track {
            Track::Idle => &self.idle,
            Track::Walk => &self.walk,
            Track::Run => &self.run,
            Track::StandToCrouch => &self.stand_to_crouch,
            Track::CrouchIdle => &self.crouch_idle,
            Track::CrouchToStand => &self.crouch_to_stand,
        }
    }
}

/// Animation blending configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Clip names for each track
    pub clips: ClipBindings,
    /// Crossfade duration between chained one-shot tracks, in seconds
    pub fade_duration: f32,
    /// Idle weight kept under the walk/run cycles to soften the blend
    pub moving_idle_weight: f32,
    /// Playback speed of the idle loop
    pub idle_time_scale: f32,
    /// Playback speed of the walk cycle
    pub walk_time_scale: f32,
    /// Playback speed of the run cycle
    pub run_time_scale: f32,
    /// Playback speed of the crouch sequence
    pub crouch_time_scale: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            clips: ClipBindings::default(),
            fade_duration: 0.2,
            moving_idle_weight: 0.2,
            idle_time_scale: 1.0,
            walk_time_scale: 1.8,
            run_time_scale: 1.0,
            crouch_time_scale: 1.0,
        }
    }
}

impl AnimationConfig {
    /// Playback speed for a track
    pub fn time_scale(&self, track: Track) -> f32 {
        match track {
            Track::Idle => self.idle_time_scale,
            Track::Walk => self.walk_time_scale,
            Track::Run => self.run_time_scale,
            Track::StandToCrouch | Track::CrouchIdle | Track::CrouchToStand => {
                self.crouch_time_scale
            }
        }
    }
}
