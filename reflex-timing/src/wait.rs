use std::thread;
use std::time::Duration;

use crate::sleep::precise_sleep;

/// Below this much remaining time the wait stops issuing kernel sleeps and
/// only yields the thread slice, trading CPU for wake-up precision.
pub const FINE_WAIT_THRESHOLD: Duration = Duration::from_millis(3);

/// Length of one coarse wait step.
pub const COARSE_SLEEP_QUANTUM: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTier {
    /// Far from the deadline: give up a full scheduler quantum.
    Coarse,
    /// Close to the deadline: yield only the current thread slice.
    Fine,
}

impl WaitTier {
    pub fn for_remaining(remaining: Duration) -> Self {
        if remaining > FINE_WAIT_THRESHOLD {
            WaitTier::Coarse
        } else {
            WaitTier::Fine
        }
    }
}

/// Waits one step toward a deadline `remaining` away. Callers re-check the
/// clock after every step; this never waits the full remainder at once.
pub fn wait_toward_deadline(remaining: Duration) {
    match WaitTier::for_remaining(remaining) {
        WaitTier::Coarse => precise_sleep(COARSE_SLEEP_QUANTUM),
        WaitTier::Fine => thread::yield_now(),
    }
}
