//! Per-frame placement of the animated quad grid.

use glam::{Mat4, Vec3};
use std::ops::Range;

use crate::config::GridConfig;

/// Transform of one grid cell for one frame. Never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInstance {
    pub i: i32,
    pub j: i32,
    pub translation: Vec3,
    pub model: Mat4,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub i_range: Range<i32>,
    pub j_range: Range<i32>,
    pub spacing: f32,
    pub amplitude: f32,
    pub phase_divisor: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::from(&GridConfig::default())
    }
}

impl From<&GridConfig> for GridLayout {
    fn from(config: &GridConfig) -> Self {
        Self {
            i_range: config.i_range[0]..config.i_range[1],
            j_range: config.j_range[0]..config.j_range[1],
            spacing: config.spacing,
            amplitude: config.amplitude,
            phase_divisor: config.phase_divisor,
        }
    }
}

impl GridLayout {
    pub fn cell_count(&self) -> usize {
        self.i_range.len() * self.j_range.len()
    }

    pub fn phase(&self, i: i32, j: i32) -> f32 {
        (i + j) as f32 / self.phase_divisor
    }

    /// `sin(t + phase(i, j)) * amplitude`
    pub fn z_offset(&self, elapsed: f32, i: i32, j: i32) -> f32 {
        (elapsed + self.phase(i, j)).sin() * self.amplitude
    }

    pub fn instance(&self, elapsed: f32, i: i32, j: i32) -> ModelInstance {
        let translation = Vec3::new(
            (i as f32 + 0.5) * self.spacing,
            (j as f32 + 0.5) * self.spacing,
            self.z_offset(elapsed, i, j),
        );
        ModelInstance {
            i,
            j,
            translation,
            model: Mat4::from_translation(translation),
        }
    }

    /// All cells at time `elapsed`, `i` outermost.
    pub fn instances(&self, elapsed: f32) -> impl Iterator<Item = ModelInstance> + '_ {
        self.i_range.clone().flat_map(move |i| {
            self.j_range
                .clone()
                .map(move |j| self.instance(elapsed, i, j))
        })
    }
}
