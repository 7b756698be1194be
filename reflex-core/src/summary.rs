use crate::result::TrialResult;

/// Per-session aggregate, derived in a single pass over the results.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub trial_count: usize,
    pub valid_count: usize,
    pub false_start_count: usize,
    /// Arithmetic mean over valid trials only; `None` when there are no
    /// valid trials. Never reported as 0.0 in that case.
    pub average_reaction_ms: Option<f64>,
}

impl SessionSummary {
    pub fn from_trials(trials: &[TrialResult]) -> Self {
        let mut valid_count = 0;
        let mut false_start_count = 0;
        let mut total_ms = 0.0;

        for trial in trials {
            if trial.false_start {
                false_start_count += 1;
            } else if let Some(ms) = trial.reaction_ms {
                valid_count += 1;
                total_ms += ms;
            }
        }

        let average_reaction_ms = if valid_count > 0 {
            Some(total_ms / valid_count as f64)
        } else {
            None
        };

        Self {
            trial_count: trials.len(),
            valid_count,
            false_start_count,
            average_reaction_ms,
        }
    }
}
