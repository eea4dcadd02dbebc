pub mod grid;
pub mod triangle;

pub use grid::GridScene;
pub use triangle::TriangleScene;

use std::fmt;

use crate::config::DemoConfig;
use crate::render::backend::SharedGl;
use crate::render::frame::Scene;
use crate::utils::error::DemoError;

/// Fragment output bound to color number 0 in every demo program.
pub const OUTPUT_COLOR: &str = "outColor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Triangle,
    Grid,
}

impl DemoKind {
    pub fn title(self) -> &'static str {
        match self {
            DemoKind::Triangle => "OpenGL",
            DemoKind::Grid => "OpenGL Grid",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoKind::Triangle => f.write_str("triangle"),
            DemoKind::Grid => f.write_str("grid"),
        }
    }
}

/// Compiles, links and uploads everything `kind` needs. Nothing is left allocated on error.
pub fn build_scene(
    kind: DemoKind,
    gl: &SharedGl,
    config: &DemoConfig,
) -> Result<Box<dyn Scene>, DemoError> {
    Ok(match kind {
        DemoKind::Triangle => Box::new(TriangleScene::new(gl)?),
        DemoKind::Grid => {
            Box::new(GridScene::new(gl, &config.grid, config.window.aspect_ratio())?)
        }
    })
}
