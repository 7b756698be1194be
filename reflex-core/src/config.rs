use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session parameters. Edits between runs take effect on the next run; a
/// running session never observes a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub trial_count: usize,
    pub min_delay_seconds: f64,
    pub max_delay_seconds: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trial_count: 10,
            min_delay_seconds: 2.0,
            max_delay_seconds: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("trial count must be at least 1")]
    NoTrials,
    #[error("min delay must be positive, got {0} s")]
    NonPositiveDelay(f64),
    #[error("min delay {min} s must be below max delay {max} s")]
    EmptyDelayRange { min: f64, max: f64 },
}

impl SessionConfig {
    /// Rejects configurations a session must never start with. Values are
    /// never clamped; the caller fixes them or gives up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trial_count < 1 {
            return Err(ConfigError::NoTrials);
        }
        if self.min_delay_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveDelay(self.min_delay_seconds));
        }
        if self.min_delay_seconds >= self.max_delay_seconds {
            return Err(ConfigError::EmptyDelayRange {
                min: self.min_delay_seconds,
                max: self.max_delay_seconds,
            });
        }
        Ok(())
    }
}
