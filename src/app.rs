//! Interactive viewer
//!
//! Opens a window over the demo room and feeds it real pointer input. There
//! is no renderer; the window title reports where the character is.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use glam::Vec3;
use stride_game::{InputHandler, PlayerEvent};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::scene::DemoScene;
use crate::settings::GameSettings;

/// Kind placed by the placement key
const PLACEMENT_KIND: &str = "trap";

pub struct ViewerApp {
    settings: GameSettings,
    window: Option<Arc<Window>>,
    scene: DemoScene,
    input: InputHandler,
    last_frame: Instant,
    /// Set when losing focus paused the game, so regaining it resumes
    paused_by_focus: bool,
}

impl ViewerApp {
    pub fn new(settings: GameSettings) -> Self {
        let scene = DemoScene::new(&settings);
        Self {
            settings,
            window: None,
            scene,
            input: InputHandler::new(),
            last_frame: Instant::now(),
            paused_by_focus: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        for event in self.scene.frame(delta) {
            if let PlayerEvent::PlacementComplete { kind, point } = event {
                info!(%kind, ?point, "object placed");
            }
        }

        if let Some(window) = &self.window {
            let transform = self.scene.player.transform();
            let character = self.scene.player.character();
            window.set_title(&format!(
                "Stride - ({:.2}, {:.2}) {:?}{}{}",
                transform.position.x,
                transform.position.z,
                character.state,
                if self.scene.player.is_placing() { " placing" } else { "" },
                if self.scene.time.paused { " [paused]" } else { "" },
            ));
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Escape => {
                self.scene.time.toggle_pause();
                self.paused_by_focus = false;
                info!(paused = self.scene.time.paused, "pause toggled");
            }
            KeyCode::KeyP => {
                if !self.scene.player.arm_placement(PLACEMENT_KIND) {
                    info!("already placing");
                }
            }
            KeyCode::KeyC => {
                self.scene.player.cancel_placement();
            }
            KeyCode::KeyR => {
                self.scene.teleport(Vec3::ZERO, 0.0);
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Stride")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.settings.window.width,
                self.settings.window.height,
            ));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.scene.resize(size.width, size.height);
                self.window = Some(Arc::new(window));
                info!("viewer window opened");
            }
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.scene.resize(size.width, size.height);
            }
            WindowEvent::Focused(false)
                if self.settings.time.pause_on_unfocus && !self.scene.time.paused =>
            {
                self.scene.time.pause();
                self.paused_by_focus = true;
            }
            WindowEvent::Focused(true) if self.paused_by_focus => {
                self.scene.time.resume();
                self.paused_by_focus = false;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_moved(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.handle_cursor_left();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let timestamp = self.scene.time.real_elapsed();
                if let Some(pointer) = self.input.handle_mouse_button(button, state, timestamp) {
                    self.scene.click_event(&pointer);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(key);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.update();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
