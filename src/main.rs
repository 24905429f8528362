//! aws-session command line tool
//!
//! Resolves an AWS session the same way the library does and reports who it
//! authenticates as.

use std::process::ExitCode;

use aws_session::cli::Cli;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // RUST_LOG overrides the -v flags
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(cli.verbose >= 2))
        .with(filter)
        .init();

    tracing::info!("Starting aws-session v{}", env!("CARGO_PKG_VERSION"));

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
