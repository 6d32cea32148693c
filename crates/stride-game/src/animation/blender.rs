//! Weight blending and one-shot chaining over the character tracks

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::locomotion::LocomotionState;

use super::{AnimationClip, AnimationConfig, AnimationError, AnimationTrack, LoopMode, Track};

/// Identifies one call to [`AnimationBlender::play_one_shot_chain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainHandle(u64);

/// Notifications produced while advancing the blender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A one-shot track reached its final frame
    TrackFinished(Track),
    /// The last track of the live chain finished
    ChainFinished(ChainHandle),
}

/// Weights of the three repeating tracks for a locomotion state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionWeights {
    pub idle: f32,
    pub walk: f32,
    pub run: f32,
}

impl LocomotionWeights {
    /// Resync rule: the dominant track gets 1, idle keeps a soft bleed while moving
    pub fn for_state(state: LocomotionState, moving_idle_weight: f32) -> Self {
        match state {
            LocomotionState::Idle => Self {
                idle: 1.0,
                walk: 0.0,
                run: 0.0,
            },
            LocomotionState::Walking => Self {
                idle: moving_idle_weight,
                walk: 1.0,
                run: 0.0,
            },
            LocomotionState::Running => Self {
                idle: moving_idle_weight,
                walk: 0.0,
                run: 1.0,
            },
        }
    }
}

/// The single live one-shot chain
#[derive(Debug, Clone)]
struct ActiveChain {
    handle: ChainHandle,
    sequence: Vec<Track>,
    current: usize,
}

/// Blends the character's animation tracks
#[derive(Debug, Clone)]
pub struct AnimationBlender {
    tracks: HashMap<Track, AnimationTrack>,
    /// Crossfade duration between chained tracks
    pub fade_duration: f32,
    /// Idle weight under walk/run
    pub moving_idle_weight: f32,
    chain: Option<ActiveChain>,
    next_chain: u64,
}

impl AnimationBlender {
    /// Create an empty blender
    pub fn new(fade_duration: f32, moving_idle_weight: f32) -> Self {
        Self {
            tracks: HashMap::new(),
            fade_duration,
            moving_idle_weight,
            chain: None,
            next_chain: 1,
        }
    }

    /// Bind all six character tracks from a clip library.
    ///
    /// Repeating tracks start playing with weights taken from `state`. A time
    /// scale that is not positive would keep one-shot tracks from ever finishing.
    pub fn for_character(
        clips: &[AnimationClip],
        config: &AnimationConfig,
        state: LocomotionState,
    ) -> Result<Self, AnimationError> {
        let mut blender = Self::new(config.fade_duration, config.moving_idle_weight);

        for track in Track::ALL {
            let name = config.clips.clip_for(track);
            let clip = clips
                .iter()
                .find(|clip| clip.name == name)
                .ok_or_else(|| AnimationError::MissingClip {
                    track,
                    clip: name.to_string(),
                })?;
            let scale = config.time_scale(track);
            if !(scale.is_finite() && scale > 0.0) {
                return Err(AnimationError::InvalidTimeScale { track, scale });
            }
            blender.register_track(track, clip, track.loop_mode(), scale);
        }

        blender.sync_locomotion(state);
        Ok(blender)
    }

    /// Bind a track to a clip. Repeating tracks start playing immediately,
    /// one-shot tracks start stopped. Both start with zero weight.
    pub fn register_track(
        &mut self,
        track: Track,
        clip: &AnimationClip,
        loop_mode: LoopMode,
        time_scale: f32,
    ) {
        let mut animation = AnimationTrack::new(clip, loop_mode, time_scale);
        if loop_mode == LoopMode::Repeating {
            animation.play();
        }
        if self.tracks.insert(track, animation).is_some() {
            debug!(%track, clip = %clip.name, "rebound animation track");
        }
    }

    /// Look up a track
    pub fn track(&self, track: Track) -> Option<&AnimationTrack> {
        self.tracks.get(&track)
    }

    /// Current weight of a track
    pub fn weight(&self, track: Track) -> Option<f32> {
        self.track(track).map(AnimationTrack::weight)
    }

    /// Current repeating-track weights
    pub fn locomotion_weights(&self) -> LocomotionWeights {
        LocomotionWeights {
            idle: self.weight(Track::Idle).unwrap_or_default(),
            walk: self.weight(Track::Walk).unwrap_or_default(),
            run: self.weight(Track::Run).unwrap_or_default(),
        }
    }

    fn track_mut(&mut self, track: Track) -> Result<&mut AnimationTrack, AnimationError> {
        self.tracks
            .get_mut(&track)
            .ok_or(AnimationError::UnknownTrack(track))
    }

    /// Set a track's weight immediately
    pub fn set_weight(&mut self, track: Track, weight: f32) -> Result<(), AnimationError> {
        self.track_mut(track)?.set_weight(weight);
        Ok(())
    }

    /// Restart a track and ramp its weight up over `fade_duration`
    pub fn crossfade_in(
        &mut self,
        track: Track,
        weight: f32,
        fade_duration: f32,
    ) -> Result<(), AnimationError> {
        self.track_mut(track)?.crossfade_in(weight, fade_duration);
        Ok(())
    }

    /// Ramp a track's weight down to zero over `fade_duration`
    pub fn fade_out(&mut self, track: Track, fade_duration: f32) -> Result<(), AnimationError> {
        self.track_mut(track)?.fade_out(fade_duration);
        Ok(())
    }

    /// Resume a track from where it is
    pub fn play(&mut self, track: Track) -> Result<(), AnimationError> {
        self.track_mut(track)?.play();
        Ok(())
    }

    /// Stop and rewind a track
    pub fn stop(&mut self, track: Track) -> Result<(), AnimationError> {
        self.track_mut(track)?.stop();
        Ok(())
    }

    /// Rewind a track to its first frame
    pub fn reset(&mut self, track: Track) -> Result<(), AnimationError> {
        self.track_mut(track)?.reset();
        Ok(())
    }

    /// Advance every track by `delta_time`. Call exactly once per tick.
    pub fn advance(&mut self, delta_time: f32) -> Vec<AnimationEvent> {
        let mut events = Vec::new();

        for track in Track::ALL {
            if let Some(animation) = self.tracks.get_mut(&track) {
                if animation.advance(delta_time) {
                    events.push(AnimationEvent::TrackFinished(track));
                }
            }
        }

        let finished: Vec<Track> = events
            .iter()
            .filter_map(|event| match event {
                AnimationEvent::TrackFinished(track) => Some(*track),
                AnimationEvent::ChainFinished(_) => None,
            })
            .collect();
        for track in finished {
            if let Some(handle) = self.on_track_finished(track) {
                events.push(AnimationEvent::ChainFinished(handle));
            }
        }

        events
    }

    /// Step the live chain when its current track finishes
    fn on_track_finished(&mut self, track: Track) -> Option<ChainHandle> {
        let chain = self.chain.as_mut()?;
        if chain.sequence.get(chain.current) != Some(&track) {
            return None;
        }

        let next = chain.sequence.get(chain.current + 1).copied();
        let Some(next) = next else {
            let chain = self.chain.take()?;
            debug!(handle = ?chain.handle, "one-shot chain finished");
            return Some(chain.handle);
        };

        chain.current += 1;
        let fade = self.fade_duration;
        if let Some(animation) = self.tracks.get_mut(&track) {
            animation.fade_out(fade);
        }
        if let Some(animation) = self.tracks.get_mut(&next) {
            animation.crossfade_in(1.0, fade);
        }
        debug!(from = %track, to = %next, "chain advanced");
        None
    }

    /// Play one-shot tracks in order, reporting [`AnimationEvent::ChainFinished`]
    /// once when the last one finishes.
    ///
    /// A previously live chain is cancelled first; its handle is never reported.
    pub fn play_one_shot_chain(&mut self, sequence: &[Track]) -> Result<ChainHandle, AnimationError> {
        let first = *sequence.first().ok_or(AnimationError::EmptyChain)?;
        for &track in sequence {
            let animation = self
                .tracks
                .get(&track)
                .ok_or(AnimationError::UnknownTrack(track))?;
            if animation.loop_mode != LoopMode::OneShot {
                return Err(AnimationError::RepeatingInChain(track));
            }
        }

        if let Some(previous) = self.cancel_chain() {
            warn!(?previous, "replaced a live one-shot chain");
        }

        let handle = ChainHandle(self.next_chain);
        self.next_chain += 1;

        let fade = self.fade_duration;
        self.track_mut(first)?.crossfade_in(1.0, fade);
        self.chain = Some(ActiveChain {
            handle,
            sequence: sequence.to_vec(),
            current: 0,
        });

        debug!(?handle, ?sequence, "one-shot chain started");
        Ok(handle)
    }

    /// Handle of the live chain, if any
    pub fn active_chain(&self) -> Option<ChainHandle> {
        self.chain.as_ref().map(|chain| chain.handle)
    }

    /// Drop the live chain's finish subscription and stop its tracks
    pub fn cancel_chain(&mut self) -> Option<ChainHandle> {
        let chain = self.chain.take()?;
        for track in &chain.sequence {
            if let Some(animation) = self.tracks.get_mut(track) {
                animation.stop();
                animation.set_weight(0.0);
            }
        }
        debug!(handle = ?chain.handle, "one-shot chain cancelled");
        Some(chain.handle)
    }

    /// Apply the locomotion weight rule to the repeating tracks
    pub fn sync_locomotion(&mut self, state: LocomotionState) {
        let weights = LocomotionWeights::for_state(state, self.moving_idle_weight);
        self.apply_locomotion_weights(weights);
    }

    /// Zero the repeating tracks (placement takes over the blend)
    pub fn silence_locomotion(&mut self) {
        self.apply_locomotion_weights(LocomotionWeights {
            idle: 0.0,
            walk: 0.0,
            run: 0.0,
        });
    }

    /// Rewind and replay the repeating tracks, then resync their weights
    pub fn restart_locomotion(&mut self, state: LocomotionState) {
        for track in Track::LOCOMOTION {
            if let Some(animation) = self.tracks.get_mut(&track) {
                animation.reset();
                animation.play();
            }
        }
        self.sync_locomotion(state);
    }

    fn apply_locomotion_weights(&mut self, weights: LocomotionWeights) {
        for (track, weight) in [
            (Track::Idle, weights.idle),
            (Track::Walk, weights.walk),
            (Track::Run, weights.run),
        ] {
            if let Some(animation) = self.tracks.get_mut(&track) {
                animation.set_weight(weight);
            }
        }
    }
}
