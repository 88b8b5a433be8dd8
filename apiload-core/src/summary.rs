use std::time::Duration;

use hdrhistogram::Histogram;

use super::stats::StatsSnapshot;

/// Aggregate figures of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// Percentage of successful requests, rounded to 2 decimals.
    pub success_rate_pct: f64,
    pub latency_avg: Duration,
    pub latency_min: Duration,
    pub latency_max: Duration,
    pub latency_p50: Duration,
    pub latency_p90: Duration,
    pub latency_p99: Duration,
    /// Requests per second over the *configured* duration, not the measured one.
    pub throughput_rps: f64,
}

impl Summary {
    /// `None` when no request was recorded.
    pub fn from_snapshot(snapshot: &StatsSnapshot, configured_duration: Duration) -> Option<Self> {
        if snapshot.total == 0 || snapshot.latencies.is_empty() {
            return None;
        }

        let latencies = &snapshot.latencies;
        let sum: Duration = latencies.iter().sum();
        let count = u32::try_from(latencies.len()).unwrap_or(u32::MAX);
        let latency_avg = sum / count;
        let latency_min = latencies.iter().min().copied().unwrap_or_default();
        let latency_max = latencies.iter().max().copied().unwrap_or_default();

        let percentiles = latency_percentiles(latencies);

        let success_rate_pct =
            round2(snapshot.successful as f64 / snapshot.total as f64 * 100.0);

        let secs = configured_duration.as_secs_f64();
        let throughput_rps = if secs > 0.0 {
            snapshot.total as f64 / secs
        } else {
            0.0
        };

        Some(Self {
            total: snapshot.total,
            successful: snapshot.successful,
            failed: snapshot.failed,
            success_rate_pct,
            latency_avg,
            latency_min,
            latency_max,
            latency_p50: percentiles[0],
            latency_p90: percentiles[1],
            latency_p99: percentiles[2],
            throughput_rps,
        })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// p50/p90/p99, microsecond resolution.
fn latency_percentiles(latencies: &[Duration]) -> [Duration; 3] {
    let mut hist = match Histogram::<u64>::new(3) {
        Ok(h) => h,
        Err(_) => return [Duration::ZERO; 3],
    };

    for d in latencies {
        let us = u64::try_from(d.as_micros()).unwrap_or(u64::MAX).max(1);
        // Auto-resizing histogram: recording only fails on overflow of the count.
        let _ = hist.record(us);
    }

    [0.50, 0.90, 0.99].map(|q| Duration::from_micros(hist.value_at_quantile(q)))
}
