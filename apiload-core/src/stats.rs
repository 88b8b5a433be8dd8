use std::sync::Mutex;
use std::time::Duration;

/// Result of a single request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// `None` when the request never produced a response (connect error, timeout, ...).
    pub status: Option<u16>,
    pub elapsed: Duration,
}

impl RequestOutcome {
    pub fn completed(status: u16, elapsed: Duration) -> Self {
        Self {
            status: Some(status),
            elapsed,
        }
    }

    pub fn transport_failure(elapsed: Duration) -> Self {
        Self {
            status: None,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(s) if s < 400)
    }
}

/// Owned, immutable copy of the run statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// One entry per attempted request, in recording order.
    pub latencies: Vec<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    total: u64,
    successful: u64,
    failed: u64,
    latencies: Vec<Duration>,
}

/// Request counters and latencies shared by all workers of a run.
///
/// Every update and every read takes the same lock, so `total == successful + failed`
/// and `latencies.len() == total` hold for any observer.
#[derive(Debug, Default)]
pub struct RunStats {
    inner: Mutex<Inner>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: RequestOutcome) {
        let mut inner = self.lock();
        inner.total += 1;
        if outcome.is_success() {
            inner.successful += 1;
        } else {
            inner.failed += 1;
        }
        inner.latencies.push(outcome.elapsed);
    }

    /// `(total, successful)` without copying the latency list.
    pub fn counts(&self) -> (u64, u64) {
        let inner = self.lock();
        (inner.total, inner.successful)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.lock();
        StatsSnapshot {
            total: inner.total,
            successful: inner.successful,
            failed: inner.failed,
            latencies: inner.latencies.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn classifies_by_status() {
        let d = Duration::from_millis(5);
        assert!(RequestOutcome::completed(200, d).is_success());
        assert!(RequestOutcome::completed(399, d).is_success());
        assert!(!RequestOutcome::completed(400, d).is_success());
        assert!(!RequestOutcome::completed(500, d).is_success());
        assert!(!RequestOutcome::transport_failure(d).is_success());
    }

    #[test]
    fn record_keeps_counts_and_latencies_consistent() {
        let stats = RunStats::new();
        stats.record(RequestOutcome::completed(200, Duration::from_millis(10)));
        stats.record(RequestOutcome::completed(404, Duration::from_millis(20)));
        stats.record(RequestOutcome::transport_failure(Duration::from_millis(30)));

        let snap = stats.snapshot();
        assert_eq!(snap.total, 3);
        assert_eq!(snap.successful, 1);
        assert_eq!(snap.failed, 2);
        assert_eq!(
            snap.latencies,
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(30)
            ]
        );
        assert_eq!(stats.counts(), (3, 1));
    }

    #[test]
    fn concurrent_recording_drops_nothing() {
        let stats = Arc::new(RunStats::new());
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for i in 0..1_000u64 {
                        let status = if (i + t) % 5 == 0 { 500 } else { 200 };
                        stats.record(RequestOutcome::completed(status, Duration::from_micros(i)));
                        let (total, successful) = stats.counts();
                        assert!(successful <= total);
                    }
                })
            })
            .collect();

        for t in threads {
            if t.join().is_err() {
                panic!("recording thread panicked");
            }
        }

        let snap = stats.snapshot();
        assert_eq!(snap.total, 8_000);
        assert_eq!(snap.total, snap.successful + snap.failed);
        assert_eq!(snap.latencies.len() as u64, snap.total);
        assert_eq!(snap.failed, 8 * 200);
    }
}
