//! Text rendering of a run summary and the per-run results file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use super::error::{Error, Result};
use super::runner::StopReason;
use super::summary::Summary;

const RULE_WIDTH: usize = 60;

/// Shown in place of the figures when a run recorded no requests.
pub const NO_DATA: &str = "No data collected: no requests were recorded.";

/// Run parameters printed at the top of the results file.
#[derive(Debug, Clone)]
pub struct RunMetadata<'a> {
    pub base_url: &'a str,
    pub workers: u64,
    pub duration: Duration,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
    pub finished_at: DateTime<Local>,
}

pub fn results_file_name(at: DateTime<Local>) -> String {
    format!("load_test_results_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

pub fn render_console(summary: Option<&Summary>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "LOAD TEST SUMMARY");
    let _ = writeln!(out, "{rule}");
    match summary {
        Some(s) => write_figures(&mut out, s),
        None => {
            let _ = writeln!(out, "{NO_DATA}");
        }
    }
    let _ = writeln!(out, "{rule}");
    out
}

pub fn render_file(meta: &RunMetadata<'_>, summary: Option<&Summary>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "LOAD TEST RESULTS");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "URL: {}", meta.base_url);
    let _ = writeln!(out, "Workers: {}", meta.workers);
    let _ = writeln!(out, "Duration: {} s", meta.duration.as_secs());
    let _ = writeln!(out, "Elapsed: {:.3} s", meta.elapsed.as_secs_f64());
    let _ = writeln!(out, "Stopped by: {}", meta.stop_reason);
    let _ = writeln!(
        out,
        "Date/time: {}",
        meta.finished_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);
    match summary {
        Some(s) => write_figures(&mut out, s),
        None => {
            let _ = writeln!(out, "{NO_DATA}");
        }
    }
    out
}

/// Write the results file into `dir` and return its path.
pub async fn write_results(
    dir: &Path,
    meta: &RunMetadata<'_>,
    summary: Option<&Summary>,
) -> Result<PathBuf> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(Error::MissingResultsDir(dir.display().to_string()));
    }

    let path = dir.join(results_file_name(meta.finished_at));
    tokio::fs::write(&path, render_file(meta, summary)).await?;
    Ok(path)
}

fn write_figures(out: &mut String, s: &Summary) {
    let _ = writeln!(out, "Total requests:    {}", s.total);
    let _ = writeln!(
        out,
        "Successful:        {} ({:.2}%)",
        s.successful, s.success_rate_pct
    );
    let _ = writeln!(out, "Failed:            {}", s.failed);
    let _ = writeln!(out, "Average latency:   {}", secs(s.latency_avg));
    let _ = writeln!(out, "Min latency:       {}", secs(s.latency_min));
    let _ = writeln!(out, "Max latency:       {}", secs(s.latency_max));
    let _ = writeln!(
        out,
        "p50 / p90 / p99:   {} / {} / {}",
        secs(s.latency_p50),
        secs(s.latency_p90),
        secs(s.latency_p99)
    );
    let _ = writeln!(out, "Requests/sec:      {:.2}", s.throughput_rps);
}

fn secs(d: Duration) -> String {
    format!("{:.3} s", d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn at() -> DateTime<Local> {
        match Local.with_ymd_and_hms(2026, 10, 18, 9, 5, 7) {
            chrono::LocalResult::Single(v) => v,
            other => panic!("ambiguous local time: {other:?}"),
        }
    }

    fn summary() -> Summary {
        Summary {
            total: 40,
            successful: 38,
            failed: 2,
            success_rate_pct: 95.0,
            latency_avg: Duration::from_millis(123),
            latency_min: Duration::from_millis(4),
            latency_max: Duration::from_millis(1500),
            latency_p50: Duration::from_millis(100),
            latency_p90: Duration::from_millis(300),
            latency_p99: Duration::from_millis(1400),
            throughput_rps: 0.13333,
        }
    }

    fn meta() -> RunMetadata<'static> {
        RunMetadata {
            base_url: "http://localhost:5000",
            workers: 10,
            duration: Duration::from_secs(300),
            elapsed: Duration::from_millis(300_250),
            stop_reason: StopReason::DurationElapsed,
            finished_at: at(),
        }
    }

    #[test]
    fn file_name_embeds_timestamp() {
        assert_eq!(
            results_file_name(at()),
            "load_test_results_20261018_090507.txt"
        );
    }

    #[test]
    fn console_report_lists_figures() {
        let text = render_console(Some(&summary()));
        assert!(text.contains("Total requests:    40"));
        assert!(text.contains("Successful:        38 (95.00%)"));
        assert!(text.contains("Failed:            2"));
        assert!(text.contains("Average latency:   0.123 s"));
        assert!(text.contains("Max latency:       1.500 s"));
        assert!(text.contains("Requests/sec:      0.13"));
        assert!(!text.contains(NO_DATA));
    }

    #[test]
    fn empty_run_renders_no_data_notice() {
        assert!(render_console(None).contains(NO_DATA));
        let file = render_file(&meta(), None);
        assert!(file.contains(NO_DATA));
        assert!(!file.contains("Total requests"));
    }

    #[test]
    fn file_report_carries_metadata_and_same_figures() {
        let s = summary();
        let file = render_file(&meta(), Some(&s));
        assert!(file.starts_with("LOAD TEST RESULTS\n"));
        assert!(file.contains("URL: http://localhost:5000"));
        assert!(file.contains("Workers: 10"));
        assert!(file.contains("Duration: 300 s"));
        assert!(file.contains("Elapsed: 300.250 s"));
        assert!(file.contains("Stopped by: duration_elapsed"));
        assert!(file.contains("Date/time: 2026-10-18 09:05:07"));

        let console = render_console(Some(&s));
        for line in console.lines().filter(|l| l.contains(':')) {
            assert!(file.contains(line), "missing in file: {line}");
        }
    }

    #[tokio::test]
    async fn writes_results_into_directory() {
        let dir = match tempfile::tempdir() {
            Ok(v) => v,
            Err(err) => panic!("tempdir failed: {err}"),
        };
        let path = match write_results(dir.path(), &meta(), Some(&summary())).await {
            Ok(v) => v,
            Err(err) => panic!("write failed: {err}"),
        };
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("load_test_results_20261018_090507.txt")
        );
        let content = match std::fs::read_to_string(&path) {
            Ok(v) => v,
            Err(err) => panic!("read failed: {err}"),
        };
        assert!(content.contains("Total requests:    40"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = match tempfile::tempdir() {
            Ok(v) => v,
            Err(err) => panic!("tempdir failed: {err}"),
        };
        let missing = dir.path().join("nope");
        let err = write_results(&missing, &meta(), None).await;
        assert!(matches!(err, Err(Error::MissingResultsDir(_))));
    }
}
