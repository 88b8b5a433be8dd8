use std::path::Path;
use std::sync::Arc;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput;

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, cfg: &apiload_core::RunConfig) {
        println!("target: {}", cfg.base_url());
        println!(
            "workers: {} duration: {}",
            cfg.workers(),
            humantime::format_duration(cfg.duration())
        );
        println!();
    }

    fn progress(&self) -> Option<apiload_core::ProgressFn> {
        Some(Arc::new(|u| {
            tracing::info!("{}", progress_line(&u));
        }))
    }

    fn print_summary(
        &self,
        outcome: &apiload_core::RunOutcome,
        summary: Option<&apiload_core::Summary>,
        results_file: &Path,
    ) -> anyhow::Result<()> {
        print!("{}", apiload_core::report::render_console(summary));
        if outcome.workers_abandoned > 0 {
            println!(
                "note: {} worker(s) did not stop in time and were abandoned",
                outcome.workers_abandoned
            );
        }
        println!("results: {}", results_file.display());
        Ok(())
    }
}

fn progress_line(u: &apiload_core::ProgressUpdate) -> String {
    format!(
        "progress: {}/{}s | requests: {} | successful: {} | remaining: {}s",
        u.elapsed.as_secs(),
        u.duration.as_secs(),
        u.requests_total,
        u.requests_successful,
        u.remaining().as_secs()
    )
}
