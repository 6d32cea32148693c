//! Click-to-command resolution

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::input::PointerDown;
use crate::locomotion::NavigationTarget;

use super::pick::{InteractiveObject, PickContext};

/// Pointer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Two clicks closer than this are a double click (run)
    pub double_click_window_ms: u64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            double_click_window_ms: 300,
        }
    }
}

impl PointerConfig {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_window_ms)
    }
}

/// Result of a resolved click
#[derive(Debug, Clone, PartialEq)]
pub enum PointerCommand {
    /// Walk (or run) to a floor point
    Navigate(NavigationTarget),
    /// Walk up to an interactive object
    Interact {
        object: InteractiveObject,
        target: NavigationTarget,
    },
}

impl PointerCommand {
    pub fn target(&self) -> NavigationTarget {
        match self {
            PointerCommand::Navigate(target) | PointerCommand::Interact { target, .. } => *target,
        }
    }
}

/// Turns pointer presses into navigation or interaction commands
#[derive(Debug, Clone, Default)]
pub struct PointerNavigationResolver {
    pub config: PointerConfig,
    last_click_time: Option<Duration>,
    last_clicked: Option<String>,
    colliding_with: Option<String>,
    current_interactive: Option<InteractiveObject>,
}

impl PointerNavigationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PointerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Id of the interactive object the character is touching
    pub fn colliding_with(&self) -> Option<&str> {
        self.colliding_with.as_deref()
    }

    pub fn set_colliding_with(&mut self, id: Option<String>) {
        self.colliding_with = id;
    }

    /// Interactive object targeted by the latest accepted click
    pub fn current_interactive(&self) -> Option<&InteractiveObject> {
        self.current_interactive.as_ref()
    }

    /// Id of the last interactive object clicked
    pub fn last_clicked(&self) -> Option<&str> {
        self.last_clicked.as_deref()
    }

    /// Resolve one pointer press.
    ///
    /// Click timing is recorded for every press that reaches the resolver,
    /// even when the press produces no command.
    pub fn resolve(&mut self, event: &PointerDown, ctx: &PickContext<'_>) -> Option<PointerCommand> {
        let is_double_click = self.record_click(event.timestamp);

        let ray = ctx.ray_at(event.position)?;
        let hits = ctx.picker.cast_ray(ray.origin, ray.direction);

        let mut interactive: Option<(InteractiveObject, Vec3)> = None;
        let mut floor: Option<Vec3> = None;

        for hit in &hits {
            let Some((node, tag)) = ctx.graph.pickable_ancestor(hit.node) else {
                continue;
            };

            if tag.interactive {
                match tag.interactive_object() {
                    Some(object) => {
                        if self.colliding_with.as_deref() == Some(object.id.as_str()) {
                            debug!(id = %object.id, "already touching clicked object");
                            return None;
                        }
                        interactive = Some((object, hit.point));
                        break;
                    }
                    None => {
                        warn!(?node, name = ?ctx.graph.name(node), "interactive object has no valid id or kind");
                    }
                }
            }

            if tag.is_floor() && floor.is_none() {
                floor = Some(hit.point);
            }
        }

        if let Some((object, point)) = interactive {
            if !is_double_click && self.last_clicked.as_deref() == Some(object.id.as_str()) {
                debug!(id = %object.id, "repeat click ignored");
                return None;
            }

            self.last_clicked = Some(object.id.clone());
            self.current_interactive = Some(object.clone());
            let target = NavigationTarget::Explicit {
                point,
                run: is_double_click,
            };
            return Some(PointerCommand::Interact { object, target });
        }

        let point = floor?;
        self.last_clicked = None;
        self.current_interactive = None;
        Some(PointerCommand::Navigate(NavigationTarget::Explicit {
            point,
            run: is_double_click,
        }))
    }

    fn record_click(&mut self, timestamp: Duration) -> bool {
        let is_double_click = self
            .last_click_time
            .and_then(|last| timestamp.checked_sub(last))
            .is_some_and(|gap| gap < self.config.double_click_window());
        self.last_click_time = Some(timestamp);
        is_double_click
    }
}
