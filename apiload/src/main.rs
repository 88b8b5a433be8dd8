mod cli;
mod exit_codes;
mod logging;
mod output;
mod run;
mod run_error;
mod seed;

use clap::Parser;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(v) => v,
        Err(err) => {
            use clap::error::ErrorKind;
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    exit_codes::ExitCode::Success.as_i32()
                }
                _ => exit_codes::ExitCode::InvalidInput.as_i32(),
            };
            std::process::exit(code);
        }
    };

    logging::init(cli.verbose);

    let result = match cli.command {
        None => run::run(cli.run)
            .await
            .map(|()| exit_codes::ExitCode::Success),
        Some(cli::Command::Run(args)) => run::run(args)
            .await
            .map(|()| exit_codes::ExitCode::Success),
        Some(cli::Command::Seed(args)) => seed::seed(args).await,
    };

    let code = match result {
        Ok(code) => code.as_i32(),
        Err(err) => {
            eprintln!("{err}");
            err.exit_code().as_i32()
        }
    };

    std::process::exit(code);
}
