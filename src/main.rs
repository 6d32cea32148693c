//! Stride - click-to-move character controller
//!
//! Runs a scripted walk/placement demo headless, or opens an interactive
//! viewer with `--window`. `--write-settings` writes the current settings
//! file so it can be edited.

mod app;
mod scene;
mod settings;

use anyhow::{Context, Result};
use glam::Vec3;
use stride_game::{PlayerEvent, PointerCommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use app::ViewerApp;
use scene::DemoScene;
use settings::GameSettings;

/// Frame length of the headless demo
const DEMO_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Stride...");
    let settings = GameSettings::load();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--write-settings") {
        return settings.save();
    }
    if args.iter().any(|arg| arg == "--window") {
        return ViewerApp::new(settings).run();
    }

    run_demo(&settings)
}

/// Walk to a floor point, place an object, walk to the desk, teleport home
fn run_demo(settings: &GameSettings) -> Result<()> {
    let mut scene = DemoScene::new(settings);

    let floor_point = Vec3::new(2.0, 0.0, 1.5);
    let command = scene
        .click(scene.screen_position(floor_point))
        .context("Floor click produced no command")?;
    info!(?command, "clicked the floor");
    run_until(&mut scene, 600, |scene| scene.player.target().is_none());
    info!(position = ?scene.player.transform().position, "arrived");

    scene.player.arm_placement("trap");
    let placed = run_until(&mut scene, 600, |scene| !scene.player.is_placing());
    anyhow::ensure!(placed, "Placement did not finish");

    let desk = scene.screen_position(Vec3::new(-3.0, 0.8, -2.0));
    if let Some(PointerCommand::Interact { object, .. }) = scene.click(desk) {
        info!(id = %object.id, "heading to the desk");
        run_until(&mut scene, 900, |scene| scene.player.target().is_none());
    }

    scene.teleport(Vec3::ZERO, 0.0);
    let events = run_frames(&mut scene, 1);
    anyhow::ensure!(
        events.contains(&PlayerEvent::TeleportComplete),
        "Teleport was not reported"
    );

    info!(position = ?scene.player.transform().position, "demo finished");
    Ok(())
}

/// Run frames until `done` holds, at most `max_frames`. Returns whether it held.
fn run_until(
    scene: &mut DemoScene,
    max_frames: usize,
    done: impl Fn(&DemoScene) -> bool,
) -> bool {
    for _ in 0..max_frames {
        scene.frame(DEMO_DT);
        if done(scene) {
            return true;
        }
    }
    false
}

fn run_frames(scene: &mut DemoScene, frames: usize) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        events.extend(scene.frame(DEMO_DT));
    }
    events
}
