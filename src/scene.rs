//! Demo room: a floor, a few props and the controlled character
//!
//! Wires the player controller to its collaborators. The physics world
//! answers pick rays and reports the character's contacts; the pick graph
//! maps colliders back to scene objects.

use glam::{Vec2, Vec3};
use stride_core::GameTime;
use stride_game::{
    AnimationClip, CollisionPeer, NodeId, PickCamera, PickContext, PickGraph, PickTag,
    PlayerController, PlayerEvent, PointerCommand, PointerDown, Track, Viewport,
};
use stride_physics::{CharacterBody, CharacterBodyConfig, ContactPhase, PhysicsWorld};
use tracing::{debug, info};

use crate::settings::GameSettings;

/// Where the camera sits relative to the room center
const CAMERA_EYE: Vec3 = Vec3::new(7.55, 5.0, 10.0);

/// The demo room and everything in it
pub struct DemoScene {
    pub player: PlayerController,
    pub time: GameTime,
    pub viewport: Viewport,
    physics: PhysicsWorld,
    graph: PickGraph,
    camera: PickCamera,
    body: CharacterBody,
}

impl DemoScene {
    pub fn new(settings: &GameSettings) -> Self {
        let mut physics = PhysicsWorld::new();
        let mut graph = PickGraph::new();

        let floor = graph.add_node("floor", None, Some(PickTag::floor()));
        physics.create_ground(0.0, floor.to_tag());

        let desk = graph.add_node("desk", None, Some(PickTag::interactive("desk", "project")));
        let desk_top = graph.add_node("desk-top", Some(desk), None);
        physics.create_static_box(
            Vec3::new(0.8, 0.4, 0.5),
            Vec3::new(-3.0, 0.4, -2.0),
            desk_top.to_tag(),
        );

        let shelf = graph.add_node("shelf", None, Some(PickTag::prop()));
        physics.create_static_box(
            Vec3::new(0.3, 1.0, 1.5),
            Vec3::new(4.0, 1.0, -3.0),
            shelf.to_tag(),
        );

        // Untagged, so pick rays pass through it
        let character = graph.add_node("character", None, None);
        let body = CharacterBody::spawn(
            &mut physics,
            CharacterBodyConfig::default(),
            Vec3::ZERO,
            character.to_tag(),
        );
        physics.update_queries();

        let clips = demo_clips(settings);
        let player = PlayerController::with_clips(settings.player.clone(), Vec3::ZERO, &clips);

        let window = &settings.window;
        let camera =
            PickCamera::orthographic(CAMERA_EYE, Vec3::ZERO, window.view_height, window.aspect());

        info!(nodes = graph.len(), "demo scene ready");
        Self {
            player,
            time: GameTime::new(settings.time.clone()),
            viewport: Viewport::new(window.width as f32, window.height as f32),
            physics,
            graph,
            camera,
            body,
        }
    }

    /// Advance one frame by `raw_delta` real seconds
    pub fn frame(&mut self, raw_delta: f32) -> Vec<PlayerEvent> {
        self.time.update(raw_delta);
        let paused = self.time.paused;
        self.player.tick(self.time.delta_time, paused);

        self.body.follow(&mut self.physics, self.player.transform().position);
        if !paused {
            self.physics.step();
        }
        self.forward_contacts();

        let events = self.player.drain_events();
        for event in &events {
            info!(?event, "player event");
        }
        events
    }

    /// Route a click through the controller
    pub fn click(&mut self, position: Vec2) -> Option<PointerCommand> {
        let event = PointerDown {
            position,
            timestamp: self.time.real_elapsed(),
        };
        self.click_event(&event)
    }

    pub fn click_event(&mut self, event: &PointerDown) -> Option<PointerCommand> {
        let ctx = PickContext {
            camera: &self.camera,
            viewport: self.viewport,
            graph: &self.graph,
            picker: &self.physics,
        };
        let command = self.player.handle_pointer(event, &ctx, self.time.paused);
        if let Some(PointerCommand::Interact { object, .. }) = &command {
            info!(id = %object.id, kind = %object.kind, "walking to interactive object");
        }
        command
    }

    /// Screen position at which `point` appears
    pub fn screen_position(&self, point: Vec3) -> Vec2 {
        let clip = (self.camera.projection * self.camera.view).project_point3(point);
        Vec2::new(
            (clip.x + 1.0) / 2.0 * self.viewport.width,
            (1.0 - clip.y) / 2.0 * self.viewport.height,
        )
    }

    /// Teleport the character and its collider
    pub fn teleport(&mut self, position: Vec3, yaw: f32) {
        self.player.teleport(position, yaw);
        self.body.set_position(&mut self.physics, position);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width as f32, height as f32);
        let height_units = self.camera_height();
        self.camera = PickCamera::orthographic(
            CAMERA_EYE,
            Vec3::ZERO,
            height_units,
            width as f32 / height.max(1) as f32,
        );
    }

    fn camera_height(&self) -> f32 {
        // Orthographic projection maps view height to 2 NDC units
        2.0 / self.camera.projection.y_axis.y
    }

    fn forward_contacts(&mut self) {
        for contact in self.physics.drain_collisions() {
            let Some((_, tag)) = contact.other(self.body.collider) else {
                continue;
            };
            let peer = tag
                .and_then(NodeId::from_tag)
                .map_or(CollisionPeer::Obstacle, |node| self.graph.collision_peer(node));
            debug!(?peer, phase = ?contact.phase, "character contact");

            match contact.phase {
                ContactPhase::Started => self.player.collision_enter(peer),
                ContactPhase::Stopped => self.player.collision_exit(peer),
            }
        }
    }
}

/// Stand-in clip library; real clips come from the asset pipeline
fn demo_clips(settings: &GameSettings) -> Vec<AnimationClip> {
    let bindings = &settings.player.animation.clips;
    Track::ALL
        .iter()
        .map(|&track| {
            let duration = match track {
                Track::Idle => 2.0,
                Track::Walk | Track::Run => 1.0,
                Track::StandToCrouch | Track::CrouchToStand => 0.8,
                Track::CrouchIdle => 1.2,
            };
            AnimationClip::new(bindings.clip_for(track), duration)
        })
        .collect()
}
