use crate::cli::OutputFormat;
use std::path::Path;

mod human;
mod json;

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, cfg: &apiload_core::RunConfig);
    fn progress(&self) -> Option<apiload_core::ProgressFn>;
    fn print_summary(
        &self,
        outcome: &apiload_core::RunOutcome,
        summary: Option<&apiload_core::Summary>,
        results_file: &Path,
    ) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
