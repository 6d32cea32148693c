//! Approach, crouch, place, stand

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::animation::{AnimationBlender, ChainHandle, Track};
use crate::locomotion::{LocomotionState, NavigationTarget};

/// Progress of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementPhase {
    /// Nothing to place
    #[default]
    Idle,
    /// Anchor captured, waiting for the first update
    Armed,
    /// Closing in on the anchor
    MovingToSpot,
    /// The crouch chain owns the animation blender
    PlayingSequence,
}

impl PlacementPhase {
    pub fn is_active(self) -> bool {
        !matches!(self, PlacementPhase::Idle)
    }
}

/// One armed placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSession {
    /// Kind of object being placed
    pub kind: String,
    /// Where the object goes
    pub anchor: Vec3,
    pub phase: PlacementPhase,
    has_started: bool,
    subscription: Option<ChainHandle>,
}

impl PlacementSession {
    /// Chain whose finish completes this placement
    pub fn subscription(&self) -> Option<ChainHandle> {
        self.subscription
    }
}

/// A finished placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementComplete {
    pub kind: String,
    pub point: Vec3,
}

/// Runs at most one placement at a time
#[derive(Debug, Clone)]
pub struct PlacementSequencer {
    /// 3D distance at which the character is on the anchor
    pub stop_threshold: f32,
    session: Option<PlacementSession>,
}

impl PlacementSequencer {
    pub fn new(stop_threshold: f32) -> Self {
        Self {
            stop_threshold,
            session: None,
        }
    }

    pub fn phase(&self) -> PlacementPhase {
        self.session
            .as_ref()
            .map_or(PlacementPhase::Idle, |session| session.phase)
    }

    /// Whether a placement owns the character
    pub fn is_placing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&PlacementSession> {
        self.session.as_ref()
    }

    /// Start placing `kind` at `position`.
    ///
    /// Returns the walk target for the anchor, or `None` if a placement is
    /// already running.
    pub fn arm(&mut self, kind: impl Into<String>, position: Vec3) -> Option<NavigationTarget> {
        let kind = kind.into();
        if let Some(session) = &self.session {
            debug!(requested = %kind, current = %session.kind, phase = ?session.phase, "placement already running");
            return None;
        }

        info!(%kind, anchor = ?position, "placement armed");
        self.session = Some(PlacementSession {
            kind,
            anchor: position,
            phase: PlacementPhase::Armed,
            has_started: false,
            subscription: None,
        });
        Some(NavigationTarget::Implicit { point: position })
    }

    /// Advance the placement for this tick.
    ///
    /// Without a blender the sequence completes as soon as it would start.
    pub fn update(
        &mut self,
        position: Vec3,
        blender: Option<&mut AnimationBlender>,
    ) -> Option<PlacementComplete> {
        let session = self.session.as_mut()?;

        if session.phase == PlacementPhase::Armed {
            session.phase = PlacementPhase::MovingToSpot;
        }

        if session.phase != PlacementPhase::MovingToSpot
            || session.has_started
            || position.distance(session.anchor) >= self.stop_threshold
        {
            return None;
        }

        session.has_started = true;
        session.phase = PlacementPhase::PlayingSequence;

        let Some(blender) = blender else {
            debug!("no animation blender, completing placement immediately");
            return self.finish();
        };

        blender.silence_locomotion();
        match blender.play_one_shot_chain(&Track::PLACEMENT_CHAIN) {
            Ok(handle) => {
                debug!(?handle, kind = %session.kind, "placement sequence started");
                session.subscription = Some(handle);
                None
            }
            Err(err) => {
                warn!(%err, "placement sequence could not start");
                self.finish()
            }
        }
    }

    /// Route a finished chain. Only the live subscription completes the placement.
    pub fn on_chain_finished(
        &mut self,
        handle: ChainHandle,
        blender: Option<&mut AnimationBlender>,
        state: LocomotionState,
    ) -> Option<PlacementComplete> {
        let live = self.session.as_ref().and_then(|session| session.subscription);
        if live != Some(handle) {
            debug!(?handle, ?live, "ignoring stale chain");
            return None;
        }

        if let Some(blender) = blender {
            let stopped = blender
                .stop(Track::CrouchToStand)
                .and_then(|()| blender.set_weight(Track::CrouchToStand, 0.0));
            if let Err(err) = stopped {
                warn!(%err, "could not stop placement track");
            }
            blender.restart_locomotion(state);
        }
        self.finish()
    }

    /// Abort the running placement. Returns whether one was running.
    pub fn cancel(&mut self, blender: Option<&mut AnimationBlender>, state: LocomotionState) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        if let Some(blender) = blender {
            if session.subscription.is_some() && blender.active_chain() == session.subscription {
                blender.cancel_chain();
            }
            blender.sync_locomotion(state);
        }

        info!(kind = %session.kind, phase = ?session.phase, "placement cancelled");
        true
    }

    fn finish(&mut self) -> Option<PlacementComplete> {
        let session = self.session.take()?;
        info!(kind = %session.kind, point = ?session.anchor, "placement complete");
        Some(PlacementComplete {
            kind: session.kind,
            point: session.anchor,
        })
    }
}

impl Default for PlacementSequencer {
    fn default() -> Self {
        Self::new(0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationClip, AnimationConfig, AnimationEvent};

    const DT: f32 = 1.0 / 60.0;

    fn blender() -> AnimationBlender {
        let config = AnimationConfig::default();
        let clips: Vec<AnimationClip> = Track::ALL
            .iter()
            .map(|&track| AnimationClip::new(config.clips.clip_for(track), 0.5))
            .collect();
        AnimationBlender::for_character(&clips, &config, LocomotionState::Idle).unwrap()
    }

    /// Advance until the live chain reports back
    fn run_chain(blender: &mut AnimationBlender) -> Vec<ChainHandle> {
        let mut finished = Vec::new();
        for _ in 0..600 {
            for event in blender.advance(DT) {
                if let AnimationEvent::ChainFinished(handle) = event {
                    finished.push(handle);
                }
            }
        }
        finished
    }

    #[test]
    fn test_arm_captures_anchor() {
        let mut placement = PlacementSequencer::default();
        let anchor = Vec3::new(2.0, 0.0, 3.0);

        let target = placement.arm("A", anchor);

        assert_eq!(target, Some(NavigationTarget::Implicit { point: anchor }));
        assert_eq!(placement.phase(), PlacementPhase::Armed);
        assert_eq!(placement.session().unwrap().anchor, anchor);
    }

    #[test]
    fn test_arm_while_placing_is_noop() {
        let mut placement = PlacementSequencer::default();
        let mut blender = blender();
        placement.arm("A", Vec3::new(2.0, 0.0, 3.0));
        placement.update(Vec3::new(2.0, 0.0, 3.0), Some(&mut blender));

        let before = placement.session().cloned();
        assert!(placement.arm("B", Vec3::ZERO).is_none());
        assert_eq!(placement.session().cloned(), before);
    }

    #[test]
    fn test_sequence_completes_once() {
        let mut placement = PlacementSequencer::default();
        let mut blender = blender();
        let anchor = Vec3::new(2.0, 0.0, 3.0);

        placement.arm("A", anchor);
        assert!(placement.update(anchor, Some(&mut blender)).is_none());
        assert_eq!(placement.phase(), PlacementPhase::PlayingSequence);
        assert_eq!(blender.weight(Track::Idle), Some(0.0));

        let finished = run_chain(&mut blender);
        assert_eq!(finished.len(), 1);

        let complete = placement
            .on_chain_finished(finished[0], Some(&mut blender), LocomotionState::Idle)
            .unwrap();
        assert_eq!(complete.kind, "A");
        assert_eq!(complete.point, anchor);
        assert!(!placement.is_placing());
        assert_eq!(blender.weight(Track::Idle), Some(1.0));
        assert!(!blender.track(Track::CrouchToStand).unwrap().is_playing());

        // Replaying the same handle does nothing
        assert!(placement
            .on_chain_finished(finished[0], Some(&mut blender), LocomotionState::Idle)
            .is_none());
    }

    #[test]
    fn test_waits_until_on_anchor() {
        let mut placement = PlacementSequencer::default();
        let mut blender = blender();
        placement.arm("A", Vec3::new(2.0, 0.0, 3.0));

        placement.update(Vec3::ZERO, Some(&mut blender));
        assert_eq!(placement.phase(), PlacementPhase::MovingToSpot);
        assert!(blender.active_chain().is_none());

        // Distance is measured in 3D
        placement.update(Vec3::new(2.0, 1.0, 3.0), Some(&mut blender));
        assert_eq!(placement.phase(), PlacementPhase::MovingToSpot);

        placement.update(Vec3::new(2.1, 0.0, 3.0), Some(&mut blender));
        assert_eq!(placement.phase(), PlacementPhase::PlayingSequence);
        assert!(blender.active_chain().is_some());
    }

    #[test]
    fn test_sequence_starts_once() {
        let mut placement = PlacementSequencer::default();
        let mut blender = blender();
        placement.arm("A", Vec3::ZERO);

        placement.update(Vec3::ZERO, Some(&mut blender));
        let first = blender.active_chain();
        placement.update(Vec3::ZERO, Some(&mut blender));
        placement.update(Vec3::ZERO, Some(&mut blender));

        assert_eq!(blender.active_chain(), first);
        assert_eq!(placement.session().unwrap().subscription(), first);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut placement = PlacementSequencer::default();
        let mut blender = blender();

        let stale = blender.play_one_shot_chain(&[Track::CrouchIdle]).unwrap();
        placement.arm("A", Vec3::ZERO);
        placement.update(Vec3::ZERO, Some(&mut blender));

        assert!(placement
            .on_chain_finished(stale, Some(&mut blender), LocomotionState::Idle)
            .is_none());
        assert!(placement.is_placing());
    }

    #[test]
    fn test_cancel_during_sequence() {
        let mut placement = PlacementSequencer::default();
        let mut blender = blender();
        placement.arm("A", Vec3::ZERO);
        placement.update(Vec3::ZERO, Some(&mut blender));
        let handle = placement.session().unwrap().subscription().unwrap();

        assert!(placement.cancel(Some(&mut blender), LocomotionState::Idle));

        assert!(!placement.is_placing());
        assert!(blender.active_chain().is_none());
        assert_eq!(blender.weight(Track::StandToCrouch), Some(0.0));
        assert_eq!(blender.weight(Track::Idle), Some(1.0));
        assert!(run_chain(&mut blender).is_empty());
        assert!(placement
            .on_chain_finished(handle, Some(&mut blender), LocomotionState::Idle)
            .is_none());
    }

    #[test]
    fn test_cancel_without_session() {
        let mut placement = PlacementSequencer::default();
        assert!(!placement.cancel(None, LocomotionState::Idle));
    }

    #[test]
    fn test_no_blender_completes_immediately() {
        let mut placement = PlacementSequencer::default();
        placement.arm("A", Vec3::new(2.0, 0.0, 3.0));

        let complete = placement.update(Vec3::new(2.0, 0.0, 3.0), None);

        assert_eq!(
            complete,
            Some(PlacementComplete {
                kind: "A".to_string(),
                point: Vec3::new(2.0, 0.0, 3.0),
            })
        );
        assert_eq!(placement.phase(), PlacementPhase::Idle);
    }
}
