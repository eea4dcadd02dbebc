use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::grid::GridConfig;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Falls back to the demo name when unset.
    pub title: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            x: 100,
            y: 100,
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

impl WindowConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub major: u8,
    pub minor: u8,
    pub stencil_bits: u8,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 2,
            stencil_bits: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub context: ContextConfig,
    pub clear_color: [f32; 4],
    pub log_level: String,
    pub grid: GridConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            context: ContextConfig::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            log_level: "info".to_string(),
            grid: GridConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Reads `path`, treating a missing file as "all defaults".
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()
    }

    /// Loads from the per-user config directory, or defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "MetroManDevTeam", "glsandbox")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
