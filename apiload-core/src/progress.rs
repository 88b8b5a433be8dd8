use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Monotonic tick counter (1-based).
    pub tick: u64,
    pub elapsed: Duration,
    /// Configured run duration.
    pub duration: Duration,
    pub requests_total: u64,
    pub requests_successful: u64,
}

impl ProgressUpdate {
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

pub type ProgressFn = std::sync::Arc<dyn Fn(ProgressUpdate) + Send + Sync + 'static>;
