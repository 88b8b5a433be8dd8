use crate::cli::SeedArgs;
use crate::exit_codes::ExitCode;
use crate::run_error::RunError;

pub(crate) async fn seed(args: SeedArgs) -> Result<ExitCode, RunError> {
    let url = args.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(RunError::InvalidInput(anyhow::anyhow!(
            "invalid --url `{url}` (expected http:// or https://)"
        )));
    }

    let client = apiload_core::HttpClient::default();
    let report = apiload_core::seed(&client, url, args.timeout).await;

    println!(
        "created: {} failed: {}",
        report.created.len(),
        report.failed.len()
    );
    for t in &report.totals {
        match t.count {
            Some(n) => println!("{}: {n}", t.resource),
            None => println!("{}: ?", t.resource),
        }
    }

    if report.all_created() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::SeedIncomplete)
    }
}
