pub mod core;
pub mod grid;

pub use self::core::{ConfigError, ContextConfig, DemoConfig, WindowConfig};
pub use grid::GridConfig;
