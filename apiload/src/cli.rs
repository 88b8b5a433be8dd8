use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:5000";

fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("duration cannot be empty (expected e.g. 300, 90s, 5m)".to_string());
    }

    let number_end = s
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(s.len(), |(idx, _)| idx);

    if number_end == 0 {
        return Err(format!("invalid duration '{s}' (expected e.g. 300, 90s, 5m)"));
    }

    let (number_str, unit_str) = s.split_at(number_end);
    let value: u64 = number_str
        .parse()
        .map_err(|_| format!("invalid duration '{s}' (expected e.g. 300, 90s, 5m)"))?;

    // A bare number is a count of seconds.
    match unit_str.trim() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Duration::from_secs(value)),
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => {
            Ok(Duration::from_millis(value))
        }
        "m" | "min" | "mins" | "minute" | "minutes" => {
            let secs = value
                .checked_mul(60)
                .ok_or_else(|| format!("duration '{s}' is too large"))?;
            Ok(Duration::from_secs(secs))
        }
        "h" | "hr" | "hrs" | "hour" | "hours" => {
            let secs = value
                .checked_mul(60)
                .and_then(|v| v.checked_mul(60))
                .ok_or_else(|| format!("duration '{s}' is too large"))?;
            Ok(Duration::from_secs(secs))
        }
        _ => Err(format!("invalid duration '{s}' (expected e.g. 300, 90s, 5m)")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Progress as log lines, summary block on stdout.
    HumanReadable,
    /// Emit JSON progress and summary lines (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "apiload",
    author,
    version,
    about = "Load generator for the users/categories/properties REST API",
    long_about = "apiload drives concurrent randomized traffic (80% reads, 20% writes) against the REST API, reports progress every 10 seconds and writes a load_test_results_<timestamp>.txt summary when the run ends.\n\nCtrl-C ends the run early; statistics gathered so far are still reported.",
    after_help = "Examples:\n  apiload --url http://localhost:5000 --threads 10 --duration 300\n  apiload run --threads 50 --duration 5m --output json\n  apiload seed --url http://localhost:5000",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Enable debug logging (per-worker request lines). `RUST_LOG` overrides this.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a load test (same as passing the flags without a subcommand)
    Run(RunArgs),

    /// Populate the API with a fixed set of users, categories and properties
    Seed(SeedArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Base URL of the API
    #[arg(long, env = "APILOAD_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 10)]
    pub threads: u64,

    /// Run length; a bare number is seconds (e.g. 300, 90s, 5m)
    #[arg(long, value_parser = parse_duration, default_value = "300")]
    pub duration: Duration,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Directory for the load_test_results_<timestamp>.txt file
    #[arg(long, default_value = ".")]
    pub results_dir: PathBuf,

    /// Seed the traffic RNGs for a reproducible request mix
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Base URL of the API
    #[arg(long, env = "APILOAD_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Per-request timeout
    #[arg(long, value_parser = parse_duration, default_value = "10")]
    pub timeout: Duration,
}
