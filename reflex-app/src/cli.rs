use std::path::PathBuf;

use clap::Parser;
use reflex_core::SessionConfig;

/// Reaction-time tester: wait for the bright screen, then press any key or
/// mouse button as fast as you can.
#[derive(Debug, Parser)]
#[command(name = "reflex", version, about)]
pub struct Args {
    /// Minimum random delay before the stimulus, in seconds
    #[arg(long, default_value_t = 2.0)]
    pub min_delay: f64,

    /// Maximum random delay before the stimulus, in seconds
    #[arg(long, default_value_t = 5.0)]
    pub max_delay: f64,

    /// Number of trials per session
    #[arg(long, default_value_t = 10)]
    pub trials: usize,

    /// Run one session without the interactive menu and exit
    #[arg(long)]
    pub run_once: bool,

    /// Write a JSON report here after a completed --run-once session
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<PathBuf>,

    /// Write a CSV report here after a completed --run-once session
    #[arg(long, value_name = "PATH")]
    pub csv_out: Option<PathBuf>,
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            trial_count: self.trials,
            min_delay_seconds: self.min_delay,
            max_delay_seconds: self.max_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let args = Args::try_parse_from(["reflex"]).unwrap();
        let config = args.session_config();
        assert_eq!(config, SessionConfig::default());
        assert!(!args.run_once);
        assert_eq!(args.csv_out, None);
    }

    #[test]
    fn overrides_are_applied() {
        let args = Args::try_parse_from([
            "reflex",
            "--min-delay",
            "1.5",
            "--max-delay",
            "3.0",
            "--trials",
            "5",
            "--run-once",
            "--csv-out",
            "out.csv",
        ])
        .unwrap();
        let config = args.session_config();
        assert_eq!(config.min_delay_seconds, 1.5);
        assert_eq!(config.max_delay_seconds, 3.0);
        assert_eq!(config.trial_count, 5);
        assert!(args.run_once);
        assert_eq!(args.csv_out, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::try_parse_from(["reflex", "--frobnicate"]).is_err());
    }
}
