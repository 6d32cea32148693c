//! Click-to-move player controller

use glam::Vec3;
use stride_core::Transform;
use tracing::{debug, error, info};

use crate::animation::{AnimationBlender, AnimationClip, AnimationEvent};
use crate::input::PointerDown;
use crate::locomotion::{LocomotionController, LocomotionState, NavigationTarget, TickContext};
use crate::navigation::{PickContext, PointerCommand, PointerNavigationResolver};
use crate::placement::{PlacementComplete, PlacementPhase, PlacementSequencer};

use super::{Character, PlayerConfig};

/// What the character bumped into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionPeer {
    /// Walkable ground, never blocks
    Floor,
    /// Scenery or walls
    Obstacle,
    /// An interactive object
    Interactive { id: String },
}

/// Notifications for the game layer
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// An object was placed at `point`
    PlacementComplete { kind: String, point: Vec3 },
    /// A teleport was applied
    TeleportComplete,
}

impl From<PlacementComplete> for PlayerEvent {
    fn from(complete: PlacementComplete) -> Self {
        PlayerEvent::PlacementComplete {
            kind: complete.kind,
            point: complete.point,
        }
    }
}

/// Owns the character and every system that drives it
pub struct PlayerController {
    /// Player configuration
    pub config: PlayerConfig,
    character: Character,
    target: Option<NavigationTarget>,
    locomotion: LocomotionController,
    resolver: PointerNavigationResolver,
    placement: PlacementSequencer,
    blender: Option<AnimationBlender>,
    events: Vec<PlayerEvent>,
    /// Locomotion state the blender weights were last synced to
    synced_state: LocomotionState,
}

impl PlayerController {
    /// Create a controller at `spawn`. Without a blender the character still
    /// moves and places objects, it just is not animated.
    pub fn new(config: PlayerConfig, spawn: Vec3, blender: Option<AnimationBlender>) -> Self {
        let locomotion = LocomotionController::with_config(config.locomotion.clone());
        let placement = PlacementSequencer::new(config.locomotion.stop_threshold);
        let resolver = PointerNavigationResolver::with_config(config.pointer.clone());

        Self {
            config,
            character: Character::new(Transform::from_position(spawn)),
            target: None,
            locomotion,
            resolver,
            placement,
            blender,
            events: Vec::new(),
            synced_state: LocomotionState::Idle,
        }
    }

    /// Create a controller and bind its animation tracks from a clip library
    pub fn with_clips(config: PlayerConfig, spawn: Vec3, clips: &[AnimationClip]) -> Self {
        let blender =
            match AnimationBlender::for_character(clips, &config.animation, LocomotionState::Idle) {
                Ok(blender) => Some(blender),
                Err(err) => {
                    error!(%err, "character animations unavailable, running unanimated");
                    None
                }
            };
        Self::new(config, spawn, blender)
    }

    /// Run one simulation tick
    pub fn tick(&mut self, delta_time: f32, is_paused: bool) {
        let finished: Vec<_> = match self.blender.as_mut() {
            Some(blender) => blender
                .advance(delta_time)
                .into_iter()
                .filter_map(|event| match event {
                    AnimationEvent::ChainFinished(handle) => Some(handle),
                    AnimationEvent::TrackFinished(_) => None,
                })
                .collect(),
            None => Vec::new(),
        };
        for handle in finished {
            if let Some(complete) =
                self.placement
                    .on_chain_finished(handle, self.blender.as_mut(), self.character.state)
            {
                self.events.push(complete.into());
            }
        }

        if !is_paused {
            if let Some(complete) = self
                .placement
                .update(self.character.position(), self.blender.as_mut())
            {
                self.events.push(complete.into());
            }
        }

        // The crouch happens on the spot
        if self.placement.phase() == PlacementPhase::PlayingSequence {
            self.character.state = LocomotionState::Idle;
        }

        let ctx = TickContext {
            delta_time,
            paused: is_paused,
            placement_active: self.placement.is_placing(),
        };
        self.locomotion.step(&mut self.character, &mut self.target, ctx);

        // The teleport guard covers exactly one tick
        self.character.is_teleporting = false;

        if self.character.state != self.synced_state && !self.placement.is_placing() {
            if let Some(blender) = self.blender.as_mut() {
                blender.sync_locomotion(self.character.state);
            }
            self.synced_state = self.character.state;
        }
    }

    /// Resolve a click and apply the resulting walk target.
    ///
    /// Interact commands are returned so the game layer can open the object.
    pub fn handle_pointer(
        &mut self,
        event: &PointerDown,
        ctx: &PickContext<'_>,
        is_paused: bool,
    ) -> Option<PointerCommand> {
        if is_paused {
            return None;
        }

        let command = self.resolver.resolve(event, ctx)?;
        debug!(?command, "pointer command");
        self.set_target(command.target());
        Some(command)
    }

    /// The character started touching `peer`
    pub fn collision_enter(&mut self, peer: CollisionPeer) {
        match peer {
            CollisionPeer::Floor => return,
            CollisionPeer::Interactive { id } => self.resolver.set_colliding_with(Some(id)),
            CollisionPeer::Obstacle => {}
        }

        self.character.is_colliding = true;
        self.character.state = LocomotionState::Idle;
        self.target = None;
        self.cancel_placement();
    }

    /// The character stopped touching `peer`
    pub fn collision_exit(&mut self, peer: CollisionPeer) {
        if let CollisionPeer::Interactive { id } = &peer {
            if self.resolver.colliding_with() == Some(id.as_str()) {
                self.resolver.set_colliding_with(None);
            }
        }
        self.character.is_colliding = false;
    }

    /// Move the character instantly, facing `yaw` radians around +Y.
    ///
    /// A crouch sequence already playing runs on to completion. A placement
    /// still waiting to reach its anchor is dropped, the character could never
    /// walk back to it.
    pub fn teleport(&mut self, position: Vec3, yaw: f32) {
        if self.placement.phase() != PlacementPhase::PlayingSequence {
            self.cancel_placement();
        }

        self.character.transform = Transform::from_position_yaw(position, yaw);
        self.character.state = LocomotionState::Idle;
        self.character.is_teleporting = true;
        self.target = None;

        info!(?position, yaw, "teleported");
        self.events.push(PlayerEvent::TeleportComplete);
    }

    /// Start placing `kind` where the character stands.
    ///
    /// Returns `false` when a placement is already running.
    pub fn arm_placement(&mut self, kind: impl Into<String>) -> bool {
        match self.placement.arm(kind, self.character.position()) {
            Some(target) => {
                self.set_target(target);
                true
            }
            None => false,
        }
    }

    /// Abort the running placement, if any
    pub fn cancel_placement(&mut self) -> bool {
        let cancelled = self
            .placement
            .cancel(self.blender.as_mut(), self.character.state);
        if cancelled {
            self.target = None;
            self.synced_state = self.character.state;
        }
        cancelled
    }

    /// Replace the navigation target. A new target un-sticks a colliding character.
    pub fn set_target(&mut self, target: NavigationTarget) {
        self.target = Some(target);
        self.character.is_colliding = false;
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current character transform
    pub fn transform(&self) -> Transform {
        self.character.transform
    }

    /// Character snapshot, including its flags
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Point the character is walking to
    pub fn target(&self) -> Option<NavigationTarget> {
        self.target
    }

    /// Whether a placement owns the character
    pub fn is_placing(&self) -> bool {
        self.placement.is_placing()
    }

    /// Progress of the running placement
    pub fn placement_phase(&self) -> PlacementPhase {
        self.placement.phase()
    }

    /// Animation blender, absent when the clips failed to bind
    pub fn blender(&self) -> Option<&AnimationBlender> {
        self.blender.as_ref()
    }

    /// Click resolver and its timing state
    pub fn resolver(&self) -> &PointerNavigationResolver {
        &self.resolver
    }
}
