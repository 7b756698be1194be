use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use reflex_core::{SessionSummary, TrialResult};
use serde::{Deserialize, Serialize};

/// Serialized form of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub trial_count: usize,
    pub valid_count: usize,
    pub false_start_count: usize,
    /// `null` in the output when there are no valid trials.
    pub average_reaction_ms: Option<f64>,
    pub trials: Vec<ReportTrial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTrial {
    pub trial: usize,
    pub random_delay_seconds: f64,
    /// `null` on false starts.
    pub reaction_ms: Option<f64>,
    pub false_start: bool,
}

impl Report {
    pub fn new(trials: &[TrialResult]) -> Self {
        let summary = SessionSummary::from_trials(trials);
        Self {
            trial_count: trials.len(),
            valid_count: summary.valid_count,
            false_start_count: summary.false_start_count,
            average_reaction_ms: summary.average_reaction_ms,
            trials: trials
                .iter()
                .enumerate()
                .map(|(index, trial)| ReportTrial {
                    trial: index + 1,
                    random_delay_seconds: trial.scheduled_delay_seconds,
                    reaction_ms: trial.reaction_ms,
                    false_start: trial.false_start,
                })
                .collect(),
        }
    }
}

pub fn write_json<W: Write>(out: W, trials: &[TrialResult]) -> Result<()> {
    serde_json::to_writer_pretty(out, &Report::new(trials))?;
    Ok(())
}

pub fn export_json(path: &Path, trials: &[TrialResult]) -> Result<()> {
    ensure!(!trials.is_empty(), "no results to export");
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_json(&mut out, trials)?;
    out.flush()?;
    log::debug!("JSON written to {}", path.display());
    Ok(())
}
