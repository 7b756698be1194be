use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use chrono::Local;
use reflex_core::{SessionSummary, TrialResult};

/// `reflex_YYYYMMDD_HHMMSS.csv` from local time.
pub fn default_csv_path() -> PathBuf {
    PathBuf::from(Local::now().format("reflex_%Y%m%d_%H%M%S.csv").to_string())
}

/// Writes the trial table plus a trailing average row.
///
/// A false start leaves `reaction_ms` empty; so does the average row when
/// no trial was valid. Empty means "no value", never zero.
pub fn write_csv<W: Write>(mut out: W, trials: &[TrialResult]) -> Result<()> {
    writeln!(out, "trial,random_delay_seconds,reaction_ms,false_start")?;
    for (index, trial) in trials.iter().enumerate() {
        write!(out, "{},{:.6},", index + 1, trial.scheduled_delay_seconds)?;
        match trial.reaction_ms {
            Some(ms) => writeln!(out, "{:.6},{}", ms, u8::from(trial.false_start))?,
            None => writeln!(out, ",{}", u8::from(trial.false_start))?,
        }
    }

    let summary = SessionSummary::from_trials(trials);
    match summary.average_reaction_ms {
        Some(avg) => writeln!(out, "average,,{:.6},", avg)?,
        None => writeln!(out, "average,,,")?,
    }
    Ok(())
}

pub fn export_csv(path: &Path, trials: &[TrialResult]) -> Result<()> {
    ensure!(!trials.is_empty(), "no results to export");
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_csv(&mut out, trials)?;
    out.flush()?;
    log::debug!("CSV written to {}", path.display());
    Ok(())
}
