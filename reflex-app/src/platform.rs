use std::time::Duration;

use anyhow::Result;
use reflex_session::{DisplaySurface, InputSource, PresentWindow};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::EventLoopExtPumpEvents;

use crate::app::ReflexApp;

/// Drives one non-blocking pass of the winit event loop, dispatching any
/// queued window events into the app's latch and signal flags.
pub fn pump(event_loop: &mut EventLoop<()>, app: &mut ReflexApp) {
    let _ = event_loop.pump_app_events(Some(Duration::ZERO), app);
}

/// Borrows the event loop and window state for the duration of one session
/// and adapts them to the collaborator traits the session core consumes.
pub struct SessionIo<'a> {
    pub event_loop: &'a mut EventLoop<()>,
    pub app: &'a mut ReflexApp,
}

impl InputSource for SessionIo<'_> {
    fn pump(&mut self) {
        pump(self.event_loop, self.app);
    }

    fn latched_press(&self) -> Option<u64> {
        self.app.latched_press()
    }

    fn reset_latch(&mut self) {
        self.app.reset_latch();
    }

    fn reset_session(&mut self) {
        self.app.reset_session();
    }

    fn cancel_requested(&self) -> bool {
        self.app.cancel_requested()
    }

    fn quit_requested(&self) -> bool {
        self.app.quit_requested()
    }
}

impl DisplaySurface for SessionIo<'_> {
    fn present(&mut self, gray_level: f32) -> Result<PresentWindow> {
        self.app.present(gray_level)
    }
}
