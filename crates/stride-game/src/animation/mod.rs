//! Animation blending for the controlled character
//!
//! Owns the six character tracks, their weights and clocks, and plays the
//! one-shot crouch chain used while placing objects.

mod blender;
mod config;
mod error;
mod track;

pub use blender::{AnimationBlender, AnimationEvent, ChainHandle, LocomotionWeights};
pub use config::{AnimationConfig, ClipBindings};
pub use error::AnimationError;
pub use track::{AnimationClip, AnimationTrack, LoopMode, Track};
