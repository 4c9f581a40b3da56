use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use study_locker_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // LOCKER_API_URL and credentials may live in a local .env
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `--json` output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("LOCKER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if verbose => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
