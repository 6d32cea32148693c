//! Pointer navigation
//!
//! Resolves clicks into walk targets by casting a camera ray through the scene
//! and classifying what it hits.

mod pick;
mod resolver;

pub use pick::{
    InteractiveObject, NodeId, PickCamera, PickContext, PickGraph, PickHit, PickRay, PickService,
    PickTag, Viewport, FLOOR_KIND, PICK_DISTANCE,
};
pub use resolver::{PointerCommand, PointerConfig, PointerNavigationResolver};
