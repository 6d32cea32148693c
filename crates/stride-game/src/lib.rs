//! Stride Game - Character control for click-to-move scenes
//!
//! Provides the player controller, locomotion, animation blending, pointer
//! navigation and object placement.

pub mod animation;
pub mod input;
pub mod locomotion;
pub mod navigation;
pub mod placement;
pub mod player;

pub use animation::{
    AnimationBlender, AnimationClip, AnimationConfig, AnimationError, AnimationEvent, ChainHandle,
    ClipBindings, LoopMode, Track,
};
pub use input::{InputHandler, PointerDown};
pub use locomotion::{
    LocomotionConfig, LocomotionController, LocomotionState, LocomotionStep, NavigationTarget,
    TickContext,
};
pub use navigation::{
    InteractiveObject, NodeId, PickCamera, PickContext, PickGraph, PickHit, PickService, PickTag,
    PointerCommand, PointerConfig, PointerNavigationResolver, Viewport,
};
pub use placement::{PlacementComplete, PlacementPhase, PlacementSequencer};
pub use player::{Character, CollisionPeer, PlayerConfig, PlayerController, PlayerEvent};
