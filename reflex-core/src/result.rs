use serde::{Deserialize, Serialize};

use crate::phase::SessionOutcome;

/// Recorded result per trial, produced exactly once per resolved trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub scheduled_delay_seconds: f64,
    /// `None` on false starts. Exporters serialize this as "no value",
    /// never zero.
    pub reaction_ms: Option<f64>,
    pub false_start: bool,
}

impl TrialResult {
    pub fn reaction(scheduled_delay_seconds: f64, reaction_ms: f64) -> Self {
        Self {
            scheduled_delay_seconds,
            reaction_ms: Some(reaction_ms),
            false_start: false,
        }
    }

    pub fn false_start(scheduled_delay_seconds: f64) -> Self {
        Self {
            scheduled_delay_seconds,
            reaction_ms: None,
            false_start: true,
        }
    }
}

/// One complete run: how it ended plus everything recorded before that.
/// An interrupted run keeps its completed trials; only the in-flight trial
/// is discarded.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub outcome: SessionOutcome,
    pub trials: Vec<TrialResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn false_start_carries_no_reaction() {
        let trial = TrialResult::false_start(2.5);
        assert_eq!(trial.scheduled_delay_seconds, 2.5);
        assert_eq!(trial.reaction_ms, None);
        assert!(trial.false_start);
    }

    #[test]
    fn reaction_carries_delay_and_latency() {
        let trial = TrialResult::reaction(3.0, 187.5);
        assert_eq!(trial.scheduled_delay_seconds, 3.0);
        assert_eq!(trial.reaction_ms, Some(187.5));
        assert!(!trial.false_start);
    }
}
