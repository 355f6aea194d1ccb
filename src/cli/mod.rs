pub mod commands;
pub mod validators;

use std::path::PathBuf;

use clap::Parser;
pub use commands::*;

#[derive(Parser, Debug)]
#[command(name = "atlas-cli", version)]
#[command(about = "Create RIPE Atlas measurements and watch their results")]
#[command(
    long_about = "Create ping, traceroute, DNS, SSL certificate and NTP measurements on the RIPE Atlas probe network.\nOne-off measurements stream their results back as they arrive unless --no-report is given."
)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "ATLAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
