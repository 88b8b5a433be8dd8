use std::time::Duration;

use super::error::{Error, Result};

/// Fixed timing knobs of a run. Defaults match the documented behavior of the tool;
/// tests shrink them to keep runs short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Upper bound for one load request, body included.
    pub request_timeout: Duration,
    /// Upper bound for the liveness probe issued before the run.
    pub probe_timeout: Duration,
    /// How often the controller reports progress.
    pub progress_interval: Duration,
    /// How long the controller waits for each worker after raising the stop signal.
    pub join_timeout: Duration,
    /// Each worker pauses for a uniformly drawn interval in this range between requests.
    pub think_time_min: Duration,
    pub think_time_max: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            progress_interval: Duration::from_secs(10),
            join_timeout: Duration::from_secs(5),
            think_time_min: Duration::from_millis(100),
            think_time_max: Duration::from_millis(500),
        }
    }
}

/// Upper bound on concurrent workers; each one is a spawned task with its own RNG.
pub const MAX_WORKERS: u64 = 100_000;

/// Parameters of one load run. Immutable once built.
#[derive(Debug, Clone)]
pub struct RunConfig {
    base_url: String,
    workers: u64,
    duration: Duration,
    timings: Timings,
    seed: Option<u64>,
}

impl RunConfig {
    pub fn new(base_url: &str, workers: u64, duration: Duration) -> Result<Self> {
        if workers == 0 || workers > MAX_WORKERS {
            return Err(Error::InvalidWorkers);
        }
        if duration < Duration::from_secs(1) {
            return Err(Error::InvalidDuration(duration));
        }

        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed =
            url::Url::parse(trimmed).map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            workers,
            duration,
            timings: Timings::default(),
            seed: None,
        })
    }

    pub fn with_timings(mut self, timings: Timings) -> Result<Self> {
        if timings.think_time_min > timings.think_time_max {
            return Err(Error::InvalidThinkTime {
                min: timings.think_time_min,
                max: timings.think_time_max,
            });
        }
        self.timings = timings;
        Ok(self)
    }

    /// Make every worker's traffic reproducible: worker `i` seeds its RNG with `seed + i`.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Target base address without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn workers(&self) -> u64 {
        self.workers
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
