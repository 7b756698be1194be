use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info};
use reflex_core::{Phase, TrialResult};
use reflex_timing::{wait_toward_deadline, Clock};

use crate::input::InputSource;
use crate::scheduler::DelaySource;
use crate::surface::{DisplaySurface, NEUTRAL_LEVEL, STIMULUS_LEVEL};

/// Mutable state for one run, owned by the session runner and discarded
/// after the terminal outcome. Nothing here survives between runs.
#[derive(Debug)]
pub struct SessionState {
    pub phase: Phase,
    pub trial_index: usize,
    pub scheduled_delay_seconds: f64,
    pub trial_start: u64,
    pub stimulus: Option<u64>,
    pub results: Vec<TrialResult>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::BeginTrial,
            trial_index: 0,
            scheduled_delay_seconds: 0.0,
            trial_start: 0,
            stimulus: None,
            results: Vec::new(),
        }
    }

    /// Appends a resolved trial and advances the index, exactly once per
    /// trial.
    fn record(&mut self, result: TrialResult, trial_count: usize) {
        self.results.push(result);
        self.trial_index += 1;
        self.phase = if self.trial_index >= trial_count {
            Phase::Finished
        } else {
            Phase::BeginTrial
        };
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advances the trial machine by one step against the current clock
/// reading. Exactly one of trial setup, false-start resolution, stimulus
/// presentation, response resolution, or a bounded wait happens per call;
/// the caller pumps input and checks session signals between calls.
pub fn step<C, D, P>(
    state: &mut SessionState,
    clock: &C,
    delays: &mut D,
    io: &mut P,
    trial_count: usize,
) -> Result<()>
where
    C: Clock<Ticks = u64>,
    D: DelaySource,
    P: DisplaySurface + InputSource,
{
    match state.phase {
        Phase::BeginTrial => {
            state.scheduled_delay_seconds = delays.draw();
            state.trial_start = clock.now();
            state.stimulus = None;
            io.reset_latch();
            io.present(NEUTRAL_LEVEL)?;
            info!(
                "trial {}/{}: waiting {:.3} s",
                state.trial_index + 1,
                trial_count,
                state.scheduled_delay_seconds
            );
            state.phase = Phase::WaitingForStimulus;
        }

        Phase::WaitingForStimulus => {
            if io.latched_press().is_some() {
                info!("false start: input before stimulus");
                state.record(
                    TrialResult::false_start(state.scheduled_delay_seconds),
                    trial_count,
                );
                return Ok(());
            }

            let elapsed = clock.ticks_to_seconds(clock.now() - state.trial_start);
            if elapsed >= state.scheduled_delay_seconds {
                let window = io.present(STIMULUS_LEVEL)?;
                state.stimulus = Some(window.midpoint());
                state.phase = Phase::WaitingForResponse;
                debug!(
                    "stimulus presented, bracket {:.3} ms wide",
                    clock.ticks_to_ms(window.after - window.before)
                );
            } else {
                let remaining = state.scheduled_delay_seconds - elapsed;
                wait_toward_deadline(Duration::from_secs_f64(remaining));
            }
        }

        Phase::WaitingForResponse => {
            if let (Some(press), Some(stimulus)) = (io.latched_press(), state.stimulus) {
                let reaction_ms = clock.ticks_to_ms(press.saturating_sub(stimulus));
                info!("reaction: {:.3} ms", reaction_ms);
                state.record(
                    TrialResult::reaction(state.scheduled_delay_seconds, reaction_ms),
                    trial_count,
                );
            } else {
                thread::yield_now();
            }
        }

        Phase::Finished => {}
    }

    Ok(())
}
