//! Player module
//!
//! The controlled character and the controller that ties locomotion,
//! animation, pointer navigation and placement together.

mod character;
mod config;
mod controller;

pub use character::Character;
pub use config::PlayerConfig;
pub use controller::{CollisionPeer, PlayerController, PlayerEvent};
