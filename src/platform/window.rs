use anyhow::{anyhow, Context, Result};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use log::{debug, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{collections::VecDeque, ffi::CString, num::NonZeroU32, ptr, time::Duration};
use winit::{
    dpi::{LogicalPosition, LogicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{Key as WinitKey, NamedKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowBuilder},
};

use super::{Key, Platform, PlatformEvent};
use crate::config::{ContextConfig, WindowConfig};
use crate::render::backend::GlApi;
use crate::utils::error::DemoError;

/// A window with a current OpenGL context. Dropping it destroys the context first.
pub struct GlWindow {
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    _window: Window,
    event_loop: EventLoop<()>,
    pending: VecDeque<PlatformEvent>,
}

impl GlWindow {
    /// Opens the window, makes a core-profile context current and loads GL.
    pub fn new(
        title: &str,
        window_config: &WindowConfig,
        context_config: &ContextConfig,
    ) -> Result<(Self, GlApi)> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let window_builder = WindowBuilder::new()
            .with_title(title)
            .with_position(LogicalPosition::new(window_config.x, window_config.y))
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
            .with_resizable(false);

        let template = ConfigTemplateBuilder::new().with_stencil_size(context_config.stencil_bits);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, pick_config)
            .map_err(|e| anyhow!("Failed to create window: {e}"))?;
        let window = window.context("Display builder returned no window")?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                context_config.major,
                context_config.minor,
            ))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .with_context(|| {
                format!(
                    "Failed to create OpenGL {}.{} core context",
                    context_config.major, context_config.minor
                )
            })?;

        let attrs = window.build_surface_attributes(Default::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let interval = if window_config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Could not set swap interval {:?}: {}", interval, e);
        }

        let gl = GlApi::load(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });

        info!(
            "Opened '{}' {}x{} at ({}, {})",
            title, window_config.width, window_config.height, window_config.x, window_config.y
        );

        Ok((
            Self {
                gl_context,
                gl_surface,
                _window: window,
                event_loop,
                pending: VecDeque::new(),
            },
            gl,
        ))
    }

    fn pump(&mut self) {
        let pending = &mut self.pending;
        let status = self.event_loop.pump_events(Some(Duration::ZERO), |event, _| {
            if let Some(event) = translate_event(&event) {
                pending.push_back(event);
            }
        });

        if let PumpStatus::Exit(code) = status {
            debug!("Event loop exited with code {}", code);
            self.pending.push_back(PlatformEvent::Quit);
        }
    }
}

// glutin fails `build` before calling the picker when no config matches.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .min_by_key(|config| config.num_samples())
        .expect("display offered no matching GL config")
}

fn translate_event(event: &Event<()>) -> Option<PlatformEvent> {
    match event {
        Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => Some(PlatformEvent::Quit),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event: KeyEvent { logical_key, state: ElementState::Released, .. },
                    ..
                },
            ..
        } => Some(PlatformEvent::KeyReleased(match logical_key {
            WinitKey::Named(NamedKey::Escape) => Key::Escape,
            _ => Key::Other,
        })),
        _ => None,
    }
}

impl Platform for GlWindow {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        if self.pending.is_empty() {
            self.pump();
        }
        self.pending.pop_front()
    }

    fn present(&mut self) -> Result<(), DemoError> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| DemoError::Platform(format!("Failed to swap buffers: {e}")))
    }
}
