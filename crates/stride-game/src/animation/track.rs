//! Animation tracks and their playback state

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six clips driven for the controlled character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Standing idle loop
    Idle,
    /// Walk cycle
    Walk,
    /// Run cycle
    Run,
    /// Transition from standing into a crouch
    StandToCrouch,
    /// Crouched pose held while placing
    CrouchIdle,
    /// Transition from the crouch back to standing
    CrouchToStand,
}

impl Track {
    /// Every track, in registration order
    pub const ALL: [Track; 6] = [
        Track::Idle,
        Track::Walk,
        Track::Run,
        Track::StandToCrouch,
        Track::CrouchIdle,
        Track::CrouchToStand,
    ];

    /// Repeating tracks blended by locomotion state
    pub const LOCOMOTION: [Track; 3] = [Track::Idle, Track::Walk, Track::Run];

    /// One-shot sequence played while placing an object
    pub const PLACEMENT_CHAIN: [Track; 3] =
        [Track::StandToCrouch, Track::CrouchIdle, Track::CrouchToStand];

    /// Display name of the track
    pub fn name(self) -> &'static str {
        match self {
            Track::Idle => "Idle",
            Track::Walk => "Walk",
            Track::Run => "Run",
            Track::StandToCrouch => "StandToCrouch",
            Track::CrouchIdle => "CrouchIdle",
            Track::CrouchToStand => "CrouchToStand",
        }
    }

    /// How the track loops when played for the character
    pub fn loop_mode(self) -> LoopMode {
        match self {
            Track::Idle | Track::Walk | Track::Run => LoopMode::Repeating,
            Track::StandToCrouch | Track::CrouchIdle | Track::CrouchToStand => LoopMode::OneShot,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a track behaves when it reaches the end of its clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Wrap back to the start forever
    Repeating,
    /// Play once and hold the final frame
    OneShot,
}

/// Clip metadata supplied by the asset collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name as exported from the model
    pub name: String,
    /// Length in seconds
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Linear weight ramp in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct WeightFade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// Playback state of one clip bound to a track
#[derive(Debug, Clone)]
pub struct AnimationTrack {
    /// Name of the bound clip
    pub clip: String,
    /// Clip length in seconds
    pub duration: f32,
    /// Looping behaviour
    pub loop_mode: LoopMode,
    /// Playback speed multiplier
    pub time_scale: f32,
    time: f32,
    weight: f32,
    playing: bool,
    finished: bool,
    fade: Option<WeightFade>,
}

impl AnimationTrack {
    /// Bind a clip; the track starts stopped with zero weight
    pub fn new(clip: &AnimationClip, loop_mode: LoopMode, time_scale: f32) -> Self {
        Self {
            clip: clip.name.clone(),
            duration: clip.duration.max(0.0),
            loop_mode,
            time_scale,
            time: 0.0,
            weight: 0.0,
            playing: false,
            finished: false,
            fade: None,
        }
    }

    /// Current blend weight
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Playback position in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Whether the clock is running
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a one-shot track reached its last frame
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a weight ramp is in progress
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop the clock and rewind
    pub fn stop(&mut self) {
        self.playing = false;
        self.reset();
    }

    /// Rewind to the first frame and drop any fade
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.finished = false;
        self.fade = None;
    }

    /// Set the weight immediately, cancelling any fade
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
        self.fade = None;
    }

    /// Restart from the first frame and ramp the weight from 0 to `weight`
    pub fn crossfade_in(&mut self, weight: f32, fade_duration: f32) {
        self.reset();
        self.playing = true;
        self.ramp(0.0, weight, fade_duration);
    }

    /// Ramp the weight from its current value down to 0
    pub fn fade_out(&mut self, fade_duration: f32) {
        self.ramp(self.weight, 0.0, fade_duration);
    }

    fn ramp(&mut self, from: f32, to: f32, duration: f32) {
        let to = to.clamp(0.0, 1.0);
        if duration <= 0.0 {
            self.weight = to;
            self.fade = None;
        } else {
            self.weight = from.clamp(0.0, 1.0);
            self.fade = Some(WeightFade {
                from: self.weight,
                to,
                duration,
                elapsed: 0.0,
            });
        }
    }

    /// Advance fades and the clip clock. Returns true on the tick a one-shot
    /// track reaches its final frame.
    pub fn advance(&mut self, delta_time: f32) -> bool {
        if let Some(mut fade) = self.fade {
            fade.elapsed += delta_time;
            let t = (fade.elapsed / fade.duration).min(1.0);
            self.weight = fade.from + (fade.to - fade.from) * t;
            self.fade = if t >= 1.0 { None } else { Some(fade) };
        }

        if !self.playing {
            return false;
        }

        self.time += delta_time * self.time_scale;
        match self.loop_mode {
            LoopMode::Repeating => {
                if self.duration > 0.0 {
                    self.time = self.time.rem_euclid(self.duration);
                } else {
                    self.time = 0.0;
                }
                false
            }
            LoopMode::OneShot => {
                if self.time >= self.duration {
                    // Clamp on the last frame
                    self.time = self.duration;
                    self.playing = false;
                    self.finished = true;
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_track_wraps() {
        let clip = AnimationClip::new("Walk", 1.0);
        let mut track = AnimationTrack::new(&clip, LoopMode::Repeating, 2.0);
        track.play();

        assert!(!track.advance(0.75));
        assert!((track.time() - 0.5).abs() < 1e-5);
        assert!(track.is_playing());
    }

    #[test]
    fn test_one_shot_clamps_and_finishes_once() {
        let clip = AnimationClip::new("StandToCrouch", 0.5);
        let mut track = AnimationTrack::new(&clip, LoopMode::OneShot, 1.0);
        track.play();

        assert!(!track.advance(0.3));
        assert!(track.advance(0.3));
        assert_eq!(track.time(), 0.5);
        assert!(track.is_finished());
        assert!(!track.is_playing());

        // Held on the last frame, no second finish
        assert!(!track.advance(0.3));
        assert_eq!(track.time(), 0.5);
    }

    #[test]
    fn test_crossfade_ramps_weight() {
        let clip = AnimationClip::new("CrouchIdle", 2.0);
        let mut track = AnimationTrack::new(&clip, LoopMode::OneShot, 1.0);
        track.crossfade_in(1.0, 0.2);

        assert_eq!(track.weight(), 0.0);
        assert_eq!(track.time(), 0.0);
        track.advance(0.1);
        assert!((track.weight() - 0.5).abs() < 1e-5);
        track.advance(0.1);
        assert!((track.weight() - 1.0).abs() < 1e-5);
        assert!(!track.is_fading());
    }

    #[test]
    fn test_fade_out_runs_on_stopped_track() {
        let clip = AnimationClip::new("CrouchIdle", 0.1);
        let mut track = AnimationTrack::new(&clip, LoopMode::OneShot, 1.0);
        track.set_weight(1.0);
        track.fade_out(0.2);
        track.advance(0.4);
        assert_eq!(track.weight(), 0.0);
    }

    #[test]
    fn test_weight_is_clamped() {
        let clip = AnimationClip::new("Idle", 1.0);
        let mut track = AnimationTrack::new(&clip, LoopMode::Repeating, 1.0);
        track.set_weight(3.0);
        assert_eq!(track.weight(), 1.0);
        track.set_weight(-1.0);
        assert_eq!(track.weight(), 0.0);
    }

    #[test]
    fn test_loop_modes() {
        assert_eq!(Track::Walk.loop_mode(), LoopMode::Repeating);
        assert_eq!(Track::CrouchIdle.loop_mode(), LoopMode::OneShot);
        assert_eq!(Track::CrouchToStand.to_string(), "CrouchToStand");
    }
}
