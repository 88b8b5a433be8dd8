use serde::Serialize;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _cfg: &apiload_core::RunConfig) {}

    fn progress(&self) -> Option<apiload_core::ProgressFn> {
        Some(Arc::new(move |u| {
            let line = build_progress_line(&u);
            emit_json_line(&line);
        }))
    }

    fn print_summary(
        &self,
        outcome: &apiload_core::RunOutcome,
        summary: Option<&apiload_core::Summary>,
        results_file: &Path,
    ) -> anyhow::Result<()> {
        let line = build_summary_line(outcome, summary, results_file);
        emit_json_line(&line);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonProgressLine {
    pub kind: &'static str,
    pub tick: u64,
    pub elapsed_secs: u64,
    pub duration_secs: u64,
    pub remaining_secs: u64,
    pub requests_total: u64,
    pub requests_successful: u64,
}

fn build_progress_line(u: &apiload_core::ProgressUpdate) -> JsonProgressLine {
    JsonProgressLine {
        kind: "progress",
        tick: u.tick,
        elapsed_secs: u.elapsed.as_secs(),
        duration_secs: u.duration.as_secs(),
        remaining_secs: u.remaining().as_secs(),
        requests_total: u.requests_total,
        requests_successful: u.requests_successful,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub preflight: &'static str,
    pub stop_reason: String,
    pub elapsed_secs: f64,
    pub workers_joined: u64,
    pub workers_abandoned: u64,
    pub totals: JsonTotals,
    pub success_rate_pct: Option<f64>,
    pub throughput_rps: Option<f64>,
    pub latency: Option<JsonLatencySummary>,
    pub results_file: String,
}

#[derive(Debug, Serialize, Default)]
pub(crate) struct JsonTotals {
    pub requests_total: u64,
    pub successful_requests_total: u64,
    pub failed_requests_total: u64,
}

/// Seconds.
#[derive(Debug, Serialize)]
pub(crate) struct JsonLatencySummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

fn build_summary_line(
    outcome: &apiload_core::RunOutcome,
    summary: Option<&apiload_core::Summary>,
    results_file: &Path,
) -> JsonSummaryLine {
    let preflight = match outcome.preflight {
        apiload_core::Preflight::Ready => "ready",
        apiload_core::Preflight::UnexpectedStatus(_) => "unexpected_status",
        apiload_core::Preflight::Unreachable(_) => "unreachable",
    };

    let totals = JsonTotals {
        requests_total: outcome.snapshot.total,
        successful_requests_total: outcome.snapshot.successful,
        failed_requests_total: outcome.snapshot.failed,
    };

    let latency = summary.map(|s| JsonLatencySummary {
        avg: s.latency_avg.as_secs_f64(),
        min: s.latency_min.as_secs_f64(),
        max: s.latency_max.as_secs_f64(),
        p50: s.latency_p50.as_secs_f64(),
        p90: s.latency_p90.as_secs_f64(),
        p99: s.latency_p99.as_secs_f64(),
    });

    JsonSummaryLine {
        kind: "summary",
        preflight,
        stop_reason: outcome.stop_reason.to_string(),
        elapsed_secs: outcome.elapsed.as_secs_f64(),
        workers_joined: outcome.workers_joined,
        workers_abandoned: outcome.workers_abandoned,
        totals,
        success_rate_pct: summary.map(|s| s.success_rate_pct),
        throughput_rps: summary.map(|s| s.throughput_rps),
        latency,
        results_file: results_file.display().to_string(),
    }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut out = std::io::stdout().lock();
    if serde_json::to_writer(&mut out, line).is_ok() {
        let _ = writeln!(out);
    }
}
