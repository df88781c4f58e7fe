use std::time::Duration;
use std::thread;
use rand::Rng;
use log::info;

/// Longest single wait, in seconds. Larger bounds are clamped to it.
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Inclusive range of seconds to wait between requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for DelayRange {
    fn default() -> Self {
        DelayRange::new(2.0, 5.0)
    }
}

impl DelayRange {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        DelayRange { min_secs, max_secs }
    }

    /// No waiting at all. Used by tests and local runs.
    pub fn none() -> Self {
        DelayRange::new(0.0, 0.0)
    }

    pub fn sample(&self) -> Duration {
        let min = clamp_secs(self.min_secs);
        let max = clamp_secs(self.max_secs);
        let secs = if max <= min {
            min
        } else {
            rand::thread_rng().gen_range(min..=max)
        };
        Duration::from_secs_f64(secs)
    }

    /// Sleeps for a sampled duration and returns it.
    pub fn wait(&self) -> Duration {
        let delay = self.sample();
        info!("Waiting {:.2}s before next request...", delay.as_secs_f64());
        thread::sleep(delay);
        delay
    }
}

fn clamp_secs(secs: f64) -> f64 {
    if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, MAX_DELAY_SECS)
    }
}
