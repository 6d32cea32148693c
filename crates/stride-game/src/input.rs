//! Pointer input
//!
//! Turns raw window events into the explicit pointer events the navigation
//! resolver consumes.

use std::time::Duration;

use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};

/// A primary-button press at a screen position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    /// Cursor position in pixels, origin top-left
    pub position: Vec2,
    /// Monotonic time of the press
    pub timestamp: Duration,
}

/// Tracks the cursor and emits pointer presses
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    cursor: Option<Vec2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position, `None` when outside the window
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Handle `WindowEvent::CursorMoved`
    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
    }

    /// Handle `WindowEvent::CursorLeft`
    pub fn handle_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Handle a mouse button event. Only left presses inside the window count.
    pub fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        timestamp: Duration,
    ) -> Option<PointerDown> {
        if button != MouseButton::Left || state != ElementState::Pressed {
            return None;
        }

        self.cursor.map(|position| PointerDown {
            position,
            timestamp,
        })
    }
}
