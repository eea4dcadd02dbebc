use thiserror::Error;

use crate::config::ConfigError;
use crate::render::shaders::ShaderError;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, DemoError>;
