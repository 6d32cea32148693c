//! Scripted object placement
//!
//! Walks the character onto an anchor, plays the crouch/place/stand chain and
//! reports the placed object once the character is standing again.

mod sequencer;

pub use sequencer::{PlacementComplete, PlacementPhase, PlacementSequencer, PlacementSession};
