use anyhow::Result;
use log::info;
use reflex_core::{Phase, SessionConfig, SessionOutcome, SessionRecord};
use reflex_timing::{Clock, RealtimeGuard};

use crate::input::InputSource;
use crate::scheduler::DelaySource;
use crate::state::{step, SessionState};
use crate::surface::DisplaySurface;

/// Runs one complete session from reset to terminal outcome.
///
/// The loop is strictly sequential: pump input, observe session signals,
/// then advance the trial machine. Pumping happens on every pass so cancel
/// and quit are seen promptly even mid-trial; both discard the in-flight
/// trial and keep every result recorded before them.
///
/// Scheduling priority is raised for the duration of the run and restored
/// on every exit path, including errors, via the guard's drop.
pub fn run_session<C, D, P>(
    config: &SessionConfig,
    clock: &C,
    delays: &mut D,
    io: &mut P,
) -> Result<SessionRecord>
where
    C: Clock<Ticks = u64>,
    D: DelaySource,
    P: DisplaySurface + InputSource,
{
    config.validate()?;

    let mut state = SessionState::new();
    io.reset_session();
    let _priority = RealtimeGuard::acquire();

    let outcome = loop {
        io.pump();
        // A full result set is terminal before any signal: a cancel landing
        // on the same pump as the last trial's resolution cannot demote a
        // completed session.
        if state.phase == Phase::Finished {
            break SessionOutcome::Completed;
        }
        if io.quit_requested() {
            break SessionOutcome::QuitRequested;
        }
        if io.cancel_requested() {
            break SessionOutcome::Aborted;
        }
        step(&mut state, clock, delays, io, config.trial_count)?;
    };

    info!(
        "session ended: {:?}, {} trials recorded",
        outcome,
        state.results.len()
    );

    Ok(SessionRecord {
        outcome,
        trials: state.results,
    })
}
