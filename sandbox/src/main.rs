use std::{env, path::PathBuf};

use anyhow::bail;
use machi_engine::{
    config::{Config, ConfigResult, CONFIG_PATH_VAR},
    log::{fatal, info, warning},
    render::HeadlessDevice,
    Engine, EngineConfig,
};

mod sandbox_app;

use sandbox_app::SandboxApp;

/// Opens a real SDL window with an OpenGL context. Rendering still goes
/// through `HeadlessDevice`, which records draw state without issuing GL
/// calls, so the window stays blank.
#[cfg(feature = "sdl")]
fn create_window() -> machi_engine::window::SdlWindow {
    machi_engine::window::SdlWindow::new()
}

/// Without a display the sandbox plays a short input script: fly forward,
/// look around, zoom, print stats and quit.
#[cfg(not(feature = "sdl"))]
fn create_window() -> machi_engine::window::HeadlessWindow {
    use machi_engine::{
        input::Key,
        window::{Action, HeadlessWindow, RawWindowEvent},
    };

    let key = |key: Key, action: Action| RawWindowEvent::Key {
        key: key.into_raw(),
        scancode: 0,
        action,
        mods: Default::default(),
    };

    let mut window = HeadlessWindow::new()
        .with_idle_frames(10)
        .with_frame([key(Key::W, Action::Press)])
        .with_idle_frames(60)
        .with_frame([key(Key::W, Action::Release)])
        .with_frame([RawWindowEvent::CursorMoved { x: 640.0, y: 360.0 }]);

    for step in 1..=30 {
        let offset = step as f64 * 4.0;
        window.push_frame([RawWindowEvent::CursorMoved {
            x: 640.0 + offset,
            y: 360.0 - offset / 2.0,
        }]);
    }

    window
        .with_frame([RawWindowEvent::Scrolled {
            x_offset: 0.0,
            y_offset: 3.0,
        }])
        .with_idle_frames(10)
        .with_frame([key(Key::F1, Action::Press)])
        .with_frame([key(Key::F1, Action::Release)])
        .with_frame([key(Key::Escape, Action::Press)])
}

fn load_config() -> ConfigResult<EngineConfig> {
    let path = if env::var_os(CONFIG_PATH_VAR).is_some() {
        Config::default_path()
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("machi.toml")
    };

    Config::load(path)?.section()
}

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(err) => (EngineConfig::default(), Some(err)),
    };

    let logger = config.build_logger("Sandbox");
    if let Some(err) = config_error {
        warning!(logger, "{err}, using default settings");
    }

    let mut engine = Engine::new(config, create_window(), HeadlessDevice::new(), logger.clone());

    if !engine.initialize() {
        fatal!(logger, "Failed to initialize the engine");
        bail!("engine initialization failed");
    }
    info!(logger, "{}", engine.build_info());
    if cfg!(feature = "sdl") {
        warning!(
            logger,
            "The graphics device is headless: the window shows no rendered output"
        );
    }

    let mut app = SandboxApp::new(engine.device_mut(), &logger);
    engine.run_app(&mut app);

    info!(
        logger,
        "Sandbox finished after {} frames ({:.2}s)",
        engine.frame_count(),
        engine.total_time()
    );

    Ok(())
}
