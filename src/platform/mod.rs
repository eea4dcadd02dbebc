//! Windowing and context boundary.
//!
//! The frame loop only sees [`Platform`]: a non-blocking event source plus a way to
//! present the finished frame. [`GlWindow`] is the winit/glutin implementation.

pub mod window;

pub use window::GlWindow;

use crate::utils::error::DemoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Quit,
    KeyReleased(Key),
}

pub trait Platform {
    /// Returns at most one pending event without blocking.
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Swaps the back buffer to the screen. May block on vsync.
    fn present(&mut self) -> Result<(), DemoError>;
}
