//! `voter-shield`: the extraction pipeline's command-line entry point.

mod args;
mod driver;
mod regression;

use args::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        eprintln!("error: {message}");
        std::process::exit(driver::EXIT_PRECONDITION_FAILED);
    }

    match driver::run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!(%err, "run failed");
            eprintln!("error: {err:#}");
            std::process::exit(driver::EXIT_PRECONDITION_FAILED);
        }
    }
}
