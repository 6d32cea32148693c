//! Stride Core - Core types and utilities shared by the Stride crates
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Transform of the controlled character (position + orientation)
//! - Frame clock producing per-tick delta time

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;
