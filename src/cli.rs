// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the deploy flags and the state repository argument.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "compstate-deploy")]
#[command(about = "Deploy a given competition state to all known hosts")]
#[command(version)]
pub struct Cli {
    /// Show remote command output and debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Skips checking the current state of the hosts
    #[arg(long)]
    pub skip_host_check: bool,

    /// Deploy settings file (YAML); defaults apply when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Competition state repository
    pub compstate: PathBuf,
}
