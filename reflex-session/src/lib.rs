pub mod input;
pub mod runner;
pub mod scheduler;
pub mod state;
pub mod surface;

pub use input::InputSource;
pub use runner::run_session;
pub use scheduler::{DelaySource, UniformDelay};
pub use state::SessionState;
pub use surface::{DisplaySurface, PresentWindow, NEUTRAL_LEVEL, STIMULUS_LEVEL};
