use clap::Parser;
use eyre::{Result, WrapErr};

mod api;
mod cli;
mod config;
mod constants;
mod error;
mod measure;
mod measurement;
mod report;
mod stream;
mod utils;

use cli::{Cli, Commands};
use config::Config;
use measure::run_measure;
use utils::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).wrap_err("Failed to load configuration")?;

    match cli.command {
        Commands::Measure(args) => run_measure(args, &config).await?,
    }

    Ok(())
}
