use anyhow::{Context, Result};
use rand::distr::{Distribution, Uniform};
use rand::Rng;

/// Draws the randomized delay between trial start and stimulus.
pub trait DelaySource {
    fn draw(&mut self) -> f64;
}

/// Uniform delay over an inclusive `[min, max]` second range.
///
/// The distribution object is rebuilt whenever the range changes, so range
/// edits between sessions apply to the next run; the RNG stream itself
/// persists across runs.
#[derive(Debug, Clone)]
pub struct UniformDelay<R: Rng> {
    rng: R,
    dist: Uniform<f64>,
}

impl<R: Rng> UniformDelay<R> {
    pub fn new(min_seconds: f64, max_seconds: f64, rng: R) -> Result<Self> {
        let dist = Uniform::new_inclusive(min_seconds, max_seconds)
            .context("invalid delay range")?;
        Ok(Self { rng, dist })
    }

    pub fn set_range(&mut self, min_seconds: f64, max_seconds: f64) -> Result<()> {
        self.dist = Uniform::new_inclusive(min_seconds, max_seconds)
            .context("invalid delay range")?;
        Ok(())
    }
}

impl<R: Rng> DelaySource for UniformDelay<R> {
    fn draw(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}
