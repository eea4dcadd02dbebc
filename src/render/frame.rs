//! The per-frame render/update loop.

use log::{debug, info};
use std::time::Instant;

use super::backend::GraphicsApi;
use crate::platform::{Key, Platform, PlatformEvent};
use crate::utils::error::DemoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Clock and frame counter owned by one run of the loop.
#[derive(Debug, Clone)]
pub struct LoopContext {
    start: Instant,
    last_elapsed: f32,
    frame_index: u64,
}

impl Default for LoopContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopContext {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_elapsed: 0.0,
            frame_index: 0,
        }
    }

    /// Seconds since the context was created. Never decreases between calls.
    pub fn elapsed(&mut self) -> f32 {
        let now = self.start.elapsed().as_secs_f32();
        if now > self.last_elapsed {
            self.last_elapsed = now;
        }
        self.last_elapsed
    }

    pub fn next_frame(&mut self) -> FrameTime {
        let frame = FrameTime {
            elapsed: self.elapsed(),
            frame_index: self.frame_index,
        };
        self.frame_index += 1;
        frame
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub frame_index: u64,
}

/// Something drawn once per frame with static GPU resources it owns.
pub trait Scene {
    /// Updates time-dependent uniforms and draws. Returns the number of draw calls issued.
    fn render(&mut self, frame: &FrameTime) -> Result<u32, DemoError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub draw_calls: u64,
}

pub struct FrameLoop {
    state: LoopState,
    clear_color: [f32; 4],
    stats: FrameStats,
}

impl FrameLoop {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            state: LoopState::Running,
            clear_color,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Quit, or releasing Escape, stops the loop. Nothing restarts it.
    pub fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Quit | PlatformEvent::KeyReleased(Key::Escape) => {
                if self.state == LoopState::Running {
                    debug!("Stop requested by {:?}", event);
                }
                self.state = LoopState::Stopped;
            }
            PlatformEvent::KeyReleased(Key::Other) => {}
        }
    }

    /// Runs until stopped: poll, clear, update and draw, present.
    pub fn run(
        &mut self,
        platform: &mut dyn Platform,
        gl: &dyn GraphicsApi,
        scene: &mut dyn Scene,
    ) -> Result<FrameStats, DemoError> {
        let mut context = LoopContext::new();

        while self.state == LoopState::Running {
            if let Some(event) = platform.poll_event() {
                self.handle_event(event);
            }
            if self.state == LoopState::Stopped {
                break;
            }

            gl.clear(self.clear_color);

            let frame = context.next_frame();
            let draw_calls = scene.render(&frame)?;

            platform.present()?;

            self.stats.frames += 1;
            self.stats.draw_calls += u64::from(draw_calls);
        }

        info!(
            "Frame loop stopped after {} frames ({} draw calls, {:.2}s)",
            self.stats.frames,
            self.stats.draw_calls,
            context.elapsed()
        );
        Ok(self.stats)
    }
}
