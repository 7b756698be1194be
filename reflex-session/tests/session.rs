//! Session runner driven end to end by deterministic fake collaborators.
//!
//! The fakes share one simulated nanosecond counter: every pump advances it
//! by one loop-pass quantum and every present call by a fixed blocking
//! duration, so stimulus midpoints and press timestamps come out exact.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use reflex_core::{SessionConfig, SessionOutcome, SessionSummary};
use reflex_session::{
    run_session, DelaySource, DisplaySurface, InputSource, PresentWindow, NEUTRAL_LEVEL,
    STIMULUS_LEVEL,
};
use reflex_timing::Clock;

const MS: u64 = 1_000_000;

#[derive(Clone)]
struct SimClock {
    now: Rc<Cell<u64>>,
}

impl Clock for SimClock {
    type Ticks = u64;

    fn now(&self) -> u64 {
        self.now.get()
    }

    fn ticks_to_ms(&self, delta: u64) -> f64 {
        delta as f64 / 1e6
    }

    fn ticks_to_seconds(&self, delta: u64) -> f64 {
        delta as f64 / 1e9
    }
}

struct FixedDelay(f64);

impl DelaySource for FixedDelay {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// What the simulated participant does on one trial.
#[derive(Clone, Copy)]
enum Participant {
    /// Press this long after the stimulus midpoint; optionally press again
    /// a second time in the same trial.
    Respond {
        after_ms: f64,
        repeat_after_ms: Option<f64>,
    },
    /// Press this long after the trial's neutral screen, before any
    /// stimulus appears.
    Jump { after_ms: f64 },
}

struct SimIo {
    now: Rc<Cell<u64>>,
    /// Fake time one pump stands in for: one loop pass of wall time.
    step_ns: u64,
    /// Simulated duration of the blocking present call.
    present_ns: u64,
    script: Vec<Participant>,
    trial: usize,
    pending_presses: Vec<u64>,
    cancel_at: Option<u64>,
    quit_at: Option<u64>,
    latch: Option<u64>,
    cancel: bool,
    quit: bool,
    presented_levels: Vec<f32>,
}

impl SimIo {
    fn new(now: Rc<Cell<u64>>, script: Vec<Participant>) -> Self {
        Self {
            now,
            step_ns: MS,
            present_ns: 8 * MS,
            script,
            trial: 0,
            pending_presses: Vec::new(),
            cancel_at: None,
            quit_at: None,
            latch: None,
            cancel: false,
            quit: false,
            presented_levels: Vec::new(),
        }
    }

    fn stimulus_presents(&self) -> usize {
        self.presented_levels
            .iter()
            .filter(|&&level| level == STIMULUS_LEVEL)
            .count()
    }
}

impl InputSource for SimIo {
    fn pump(&mut self) {
        let t = self.now.get() + self.step_ns;
        self.now.set(t);
        if self.cancel_at.is_some_and(|at| t >= at) {
            self.cancel = true;
        }
        if self.quit_at.is_some_and(|at| t >= at) {
            self.quit = true;
        }
        self.pending_presses.sort_unstable();
        while let Some(&press) = self.pending_presses.first() {
            if press > t {
                break;
            }
            self.pending_presses.remove(0);
            if self.latch.is_none() {
                self.latch = Some(press);
            }
        }
    }

    fn latched_press(&self) -> Option<u64> {
        self.latch
    }

    fn reset_latch(&mut self) {
        self.latch = None;
    }

    fn reset_session(&mut self) {
        self.latch = None;
        self.cancel = false;
    }

    fn cancel_requested(&self) -> bool {
        self.cancel
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

impl DisplaySurface for SimIo {
    fn present(&mut self, gray_level: f32) -> Result<PresentWindow> {
        let before = self.now.get();
        let after = before + self.present_ns;
        self.now.set(after);
        self.presented_levels.push(gray_level);
        let window = PresentWindow { before, after };

        if gray_level == NEUTRAL_LEVEL {
            // Trial begin: queue whatever the scripted participant does
            // before the stimulus.
            if let Some(Participant::Jump { after_ms }) = self.script.get(self.trial).copied() {
                self.pending_presses
                    .push(after + (after_ms * MS as f64) as u64);
            }
            self.trial += 1;
        } else if let Some(Participant::Respond {
            after_ms,
            repeat_after_ms,
        }) = self.script.get(self.trial.saturating_sub(1)).copied()
        {
            let stimulus = window.midpoint();
            self.pending_presses
                .push(stimulus + (after_ms * MS as f64) as u64);
            if let Some(repeat_ms) = repeat_after_ms {
                self.pending_presses
                    .push(stimulus + (repeat_ms * MS as f64) as u64);
            }
        }

        Ok(window)
    }
}

fn harness(script: Vec<Participant>) -> (SimClock, SimIo) {
    let now = Rc::new(Cell::new(0));
    let clock = SimClock { now: now.clone() };
    let io = SimIo::new(now, script);
    (clock, io)
}

fn config(trial_count: usize) -> SessionConfig {
    SessionConfig {
        trial_count,
        min_delay_seconds: 0.02,
        max_delay_seconds: 0.06,
    }
}

#[test]
fn completed_session_records_every_trial() {
    let (clock, mut io) = harness(vec![
        Participant::Respond {
            after_ms: 150.0,
            repeat_after_ms: None,
        },
        Participant::Respond {
            after_ms: 200.0,
            repeat_after_ms: None,
        },
        Participant::Jump { after_ms: 10.0 },
    ]);
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(3), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::Completed);
    assert_eq!(record.trials.len(), 3);
    assert_eq!(record.trials[0].reaction_ms, Some(150.0));
    assert_eq!(record.trials[1].reaction_ms, Some(200.0));
    assert_eq!(record.trials[2].reaction_ms, None);
    assert!(record.trials[2].false_start);
    for trial in &record.trials {
        assert_eq!(trial.scheduled_delay_seconds, 0.04);
    }

    let summary = SessionSummary::from_trials(&record.trials);
    assert_eq!(summary.valid_count, 2);
    assert_eq!(summary.false_start_count, 1);
    assert_eq!(summary.average_reaction_ms, Some(175.0));
}

#[test]
fn false_start_resolves_without_presenting_the_stimulus() {
    let (clock, mut io) = harness(vec![Participant::Jump { after_ms: 10.0 }]);
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(1), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::Completed);
    assert_eq!(record.trials.len(), 1);
    assert!(record.trials[0].false_start);
    assert_eq!(record.trials[0].reaction_ms, None);
    assert_eq!(record.trials[0].scheduled_delay_seconds, 0.04);
    assert_eq!(io.stimulus_presents(), 0);
}

#[test]
fn only_the_first_press_resolves_a_trial() {
    let (clock, mut io) = harness(vec![Participant::Respond {
        after_ms: 150.0,
        repeat_after_ms: Some(160.0),
    }]);
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(1), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::Completed);
    assert_eq!(record.trials.len(), 1);
    assert_eq!(record.trials[0].reaction_ms, Some(150.0));
}

#[test]
fn reactions_are_never_negative() {
    let (clock, mut io) = harness(vec![Participant::Respond {
        after_ms: 0.0,
        repeat_after_ms: None,
    }]);
    let mut delays = FixedDelay(0.02);

    let record = run_session(&config(1), &clock, &mut delays, &mut io).unwrap();

    let reaction = record.trials[0].reaction_ms.unwrap();
    assert!(reaction >= 0.0);
}

#[test]
fn cancel_discards_the_in_flight_trial() {
    let (clock, mut io) = harness(vec![Participant::Respond {
        after_ms: 150.0,
        repeat_after_ms: None,
    }]);
    io.cancel_at = Some(20 * MS);
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(1), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::Aborted);
    assert!(record.trials.is_empty());
}

#[test]
fn cancel_preserves_previously_completed_trials() {
    let (clock, mut io) = harness(vec![
        Participant::Respond {
            after_ms: 100.0,
            repeat_after_ms: None,
        },
        Participant::Respond {
            after_ms: 100.0,
            repeat_after_ms: None,
        },
    ]);
    // Lands in the second trial's waiting period: the first trial resolves
    // well under 200 ms of simulated time.
    io.cancel_at = Some(260 * MS);
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(2), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::Aborted);
    assert_eq!(record.trials.len(), 1);
    assert_eq!(record.trials[0].reaction_ms, Some(100.0));
}

#[test]
fn quit_ends_the_session_with_its_own_outcome() {
    let (clock, mut io) = harness(vec![Participant::Respond {
        after_ms: 150.0,
        repeat_after_ms: None,
    }]);
    io.quit_at = Some(20 * MS);
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(1), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::QuitRequested);
    assert!(record.trials.is_empty());
}

#[test]
fn stale_cancel_is_cleared_at_session_start() {
    let (clock, mut io) = harness(vec![Participant::Respond {
        after_ms: 150.0,
        repeat_after_ms: None,
    }]);
    io.cancel = true;
    let mut delays = FixedDelay(0.04);

    let record = run_session(&config(1), &clock, &mut delays, &mut io).unwrap();

    assert_eq!(record.outcome, SessionOutcome::Completed);
    assert_eq!(record.trials.len(), 1);
}

#[test]
fn invalid_configuration_is_rejected_before_the_run() {
    let (clock, mut io) = harness(vec![]);
    let mut delays = FixedDelay(0.04);

    let no_trials = SessionConfig {
        trial_count: 0,
        ..config(1)
    };
    assert!(run_session(&no_trials, &clock, &mut delays, &mut io).is_err());

    let inverted = SessionConfig {
        min_delay_seconds: 1.0,
        max_delay_seconds: 0.5,
        trial_count: 1,
    };
    assert!(run_session(&inverted, &clock, &mut delays, &mut io).is_err());

    assert!(io.presented_levels.is_empty());
}
