use serde::{Deserialize, Serialize};

use super::core::ConfigError;

/// Layout and animation parameters of the quad grid.
///
/// Index ranges are half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub i_range: [i32; 2],
    pub j_range: [i32; 2],
    pub spacing: f32,
    pub quad_half_extent: f32,
    pub amplitude: f32,
    pub phase_divisor: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            i_range: [-10, 10],
            j_range: [-5, 5],
            spacing: 0.08,
            quad_half_extent: 0.03,
            amplitude: 0.1,
            phase_divisor: 2.0,
        }
    }
}

impl GridConfig {
    /// Rejects values that would silently empty the grid or turn offsets into NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, [start, end]) in [("i_range", self.i_range), ("j_range", self.j_range)] {
            if end < start {
                return Err(ConfigError::Invalid(format!(
                    "grid.{name} end {end} is before start {start}"
                )));
            }
        }

        if !self.phase_divisor.is_finite() || self.phase_divisor == 0.0 {
            return Err(ConfigError::Invalid(format!(
                "grid.phase_divisor must be finite and non-zero, got {}",
                self.phase_divisor
            )));
        }

        for (name, value) in [
            ("spacing", self.spacing),
            ("quad_half_extent", self.quad_half_extent),
            ("amplitude", self.amplitude),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "grid.{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
