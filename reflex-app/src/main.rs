use anyhow::Result;
use clap::Parser;
use reflex_session::UniformDelay;
use reflex_timing::MonotonicClock;
use winit::event_loop::EventLoop;

mod app;
mod cli;
mod menu;
mod platform;

use app::ReflexApp;
use cli::Args;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.session_config();
    if let Err(err) = config.validate() {
        eprintln!("invalid arguments: {err}");
        std::process::exit(1);
    }

    let clock = MonotonicClock::new();
    let mut delays = UniformDelay::new(
        config.min_delay_seconds,
        config.max_delay_seconds,
        rand::rng(),
    )?;

    let mut event_loop = EventLoop::new()?;
    let mut app = ReflexApp::new(clock.clone());
    // First pass creates the hidden window before any menu interaction.
    platform::pump(&mut event_loop, &mut app);

    if args.run_once {
        let code = menu::run_once(&mut event_loop, &mut app, &clock, &mut delays, &config, &args)?;
        if code != 0 {
            std::process::exit(code);
        }
    } else {
        menu::main_menu(&mut event_loop, &mut app, &clock, &mut delays, config)?;
    }
    Ok(())
}
