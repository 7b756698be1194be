use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, error};
use pixels::{Pixels, SurfaceTexture};
use reflex_session::PresentWindow;
use reflex_timing::{Clock, MonotonicClock};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

/// Owns the window, the pixel surface, and the input latch. The window is
/// created hidden on the first event-loop pass and only shown while a
/// session runs; `platform::SessionIo` adapts this to the collaborator
/// traits the session core consumes.
pub struct ReflexApp {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    clock: MonotonicClock,
    latched_press: Option<u64>,
    cancel_requested: bool,
    quit_requested: bool,
}

impl ReflexApp {
    pub fn new(clock: MonotonicClock) -> Self {
        Self {
            window: None,
            pixels: None,
            clock,
            latched_press: None,
            cancel_requested: false,
            quit_requested: false,
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());

        let window_attributes = Window::default_attributes()
            .with_title("Reflex")
            .with_visible(false)
            .with_fullscreen(Some(Fullscreen::Borderless(primary_monitor)))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);

        debug!(
            "surface ready: {}×{}",
            physical_size.width, physical_size.height
        );
        self.window = Some(window);
        Ok(())
    }

    /// Fills the whole frame with one gray level and presents it, blocking,
    /// bracketed by clock readings.
    pub fn present(&mut self, gray_level: f32) -> Result<PresentWindow> {
        let pixels = self.pixels.as_mut().context("display surface not ready")?;
        let level = (gray_level.clamp(0.0, 1.0) * 255.0).round() as u8;
        for pixel in pixels.frame_mut().chunks_exact_mut(4) {
            pixel.copy_from_slice(&[level, level, level, 0xff]);
        }

        let before = self.clock.now();
        pixels.render()?;
        let after = self.clock.now();
        Ok(PresentWindow { before, after })
    }

    pub fn show_session_screen(&mut self) -> Result<()> {
        let window = self.window.as_ref().context("window not ready")?;
        window.set_visible(true);
        window.focus_window();
        window.set_cursor_visible(false);
        Ok(())
    }

    pub fn hide_session_screen(&mut self) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
            window.set_visible(false);
        }
    }

    pub fn latched_press(&self) -> Option<u64> {
        self.latched_press
    }

    pub fn reset_latch(&mut self) {
        self.latched_press = None;
    }

    pub fn reset_session(&mut self) {
        self.latched_press = None;
        self.cancel_requested = false;
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn record_press(&mut self) {
        if self.latched_press.is_none() {
            self.latched_press = Some(self.clock.now());
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                error!("failed to resize surface: {e}");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                error!("failed to resize buffer: {e}");
            }
        }
    }
}

impl ApplicationHandler for ReflexApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!("failed to create window and surface: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.quit_requested = true,
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    self.cancel_requested = true;
                } else {
                    self.record_press();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => self.record_press(),
            WindowEvent::Resized(size) => self.handle_resize(size),
            _ => {}
        }
    }
}
