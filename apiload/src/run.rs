use std::sync::Arc;

use anyhow::Context as _;
use apiload_core::report::{self, RunMetadata};
use apiload_core::{HttpClient, RunConfig};

use crate::cli::RunArgs;
use crate::output;
use crate::run_error::RunError;

pub(crate) async fn run(args: RunArgs) -> Result<(), RunError> {
    let cfg = RunConfig::new(&args.url, args.threads, args.duration)
        .context("invalid run configuration")
        .map_err(RunError::InvalidInput)?
        .with_seed(args.seed);

    // Fail before the run rather than after minutes of traffic.
    if !args.results_dir.is_dir() {
        return Err(RunError::InvalidInput(anyhow::anyhow!(
            "--results-dir is not a directory: {}",
            args.results_dir.display()
        )));
    }

    let out = output::formatter(args.output);
    out.print_header(&cfg);

    let client = Arc::new(HttpClient::default());
    let outcome = apiload_core::run_load(&cfg, client, out.progress(), interrupted()).await;

    let summary = outcome.summary(&cfg);
    if summary.is_none() {
        tracing::warn!("no requests were recorded, nothing to summarize");
    }

    let meta = RunMetadata {
        base_url: cfg.base_url(),
        workers: cfg.workers(),
        duration: cfg.duration(),
        elapsed: outcome.elapsed,
        stop_reason: outcome.stop_reason,
        finished_at: chrono::Local::now(),
    };
    let path = report::write_results(&args.results_dir, &meta, summary.as_ref())
        .await
        .context("failed to write results file")
        .map_err(RunError::RuntimeError)?;
    tracing::info!("results saved to {}", path.display());

    out.print_summary(&outcome, summary.as_ref(), &path)
        .map_err(RunError::RuntimeError)?;

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the run simply lasts its full duration.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
