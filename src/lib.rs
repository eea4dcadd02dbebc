pub mod app;
pub mod config;
pub mod demo;
pub mod platform;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::{DemoConfig, GridConfig};
pub use demo::DemoKind;
pub use platform::{Platform, PlatformEvent};
pub use render::frame::{FrameLoop, Scene};
pub use render::shaders::{ShaderError, ShaderProgram};
pub use utils::error::DemoError;
