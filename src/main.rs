// ABOUTME: Entry point for the compstate-deploy CLI application.
// ABOUTME: Parses arguments, runs the deploy, and maps failures to exit codes.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use compstate_deploy::output::Output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("compstate_deploy=debug,warn")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::stdout(cli.verbose);

    if let Err(e) = commands::deploy(&cli, &output).await {
        commands::report_error(&output, &e);
        std::process::exit(e.exit_code());
    }
}
