//! Headless replay of scripted input against orbit controls.

// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]

use std::path::Path;

use glam::Vec3;
use serde::Deserialize;
use vantage::camera::{self, Camera};
use vantage::controls::{presets, ControlEventKind};
use vantage::input::{HeadlessSurface, InputEvent};
use vantage::options::ControlOptions;
use vantage::VantageError;

/// Scripted gesture sequence replayed against orbit controls.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ReplayScript {
    /// Viewport size in client pixels.
    viewport: [f32; 2],
    /// Initial camera position.
    position: [f32; 3],
    /// Initial target.
    target: [f32; 3],
    /// Vertical field of view in degrees.
    fov: f32,
    events: Vec<InputEvent>,
}

impl Default for ReplayScript {
    fn default() -> Self {
        Self {
            viewport: [800.0, 600.0],
            position: [0.0, 0.0, 10.0],
            target: [0.0; 3],
            fov: 60.0,
            events: Vec::new(),
        }
    }
}

fn load_script(path: &Path) -> Result<ReplayScript, VantageError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| VantageError::Script(e.to_string()))
}

fn run(options_path: Option<&str>, script_path: &str) -> Result<(), VantageError> {
    let options = match options_path {
        Some(path) => ControlOptions::load(Path::new(path))?,
        None => ControlOptions::default(),
    };
    let script = load_script(Path::new(script_path))?;
    let [width, height] = script.viewport;

    let camera = camera::shared(
        Camera::perspective(script.fov, width / height.max(1.0), 0.1, 10_000.0)
            .with_position(Vec3::from_array(script.position)),
    );
    let mut controls = presets::orbit_controls(camera, Vec3::from_array(script.target));
    controls.apply_options(&options);
    for kind in [ControlEventKind::Start, ControlEventKind::End] {
        let _ = controls.add_event_listener(kind, |event| {
            log::debug!(
                "{:?}: position {} target {} zoom {}",
                event.kind,
                event.position,
                event.target,
                event.zoom
            );
        });
    }

    let mut surface = HeadlessSurface::new(width, height);
    controls.attach(&mut surface);
    for event in &script.events {
        let _ = controls.handle_event(event, &mut surface);
    }
    controls.detach(&mut surface);

    let camera = controls.camera();
    let camera = camera.borrow();
    log::info!(
        "replayed {} events: position {} target {} distance {} zoom {}",
        script.events.len(),
        camera.position,
        controls.target(),
        controls.distance(),
        camera.zoom
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options_path, script_path) = match args.as_slice() {
        [script] => (None, script.as_str()),
        [options, script] => (Some(options.as_str()), script.as_str()),
        _ => {
            log::error!("Usage: vantage-replay [options.toml] <script.json>");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options_path, script_path) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
