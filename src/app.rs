use anyhow::{Context, Result};
use log::{error, info};
use std::rc::Rc;

use crate::config::DemoConfig;
use crate::demo::{self, DemoKind};
use crate::platform::GlWindow;
use crate::render::backend::SharedGl;
use crate::render::frame::FrameLoop;
use crate::utils::logging::init_logging;

/// Entry point shared by the binaries: load config, set up, loop, tear down.
pub fn run(kind: DemoKind) -> Result<()> {
    let config = DemoConfig::load_or_default().context("Failed to load configuration")?;
    init_logging(&config.log_level).context("Failed to initialize logger")?;

    let result = run_with_config(kind, &config);
    if let Err(e) = &result {
        error!("{} demo failed: {:#}", kind, e);
    }
    result
}

pub fn run_with_config(kind: DemoKind, config: &DemoConfig) -> Result<()> {
    info!("Starting {} demo", kind);

    let title = config.window.title.as_deref().unwrap_or(kind.title());
    let (mut window, gl) = GlWindow::new(title, &config.window, &config.context)?;
    info!("OpenGL version: {}", gl.version());
    let gl: SharedGl = Rc::new(gl);

    let mut scene = demo::build_scene(kind, &gl, config)
        .with_context(|| format!("Failed to set up the {} scene", kind))?;

    let stats = FrameLoop::new(config.clear_color).run(&mut window, gl.as_ref(), scene.as_mut())?;

    // GPU objects go before the context that owns them.
    drop(scene);
    drop(gl);
    drop(window);

    info!("Shut down cleanly after {} frames", stats.frames);
    Ok(())
}
