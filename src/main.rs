use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::{Cli, Commands};
use cli::commands::categories::categories_command;
use cli::commands::config::config_command;
use cli::commands::load_config;
use cli::commands::run::run_command;
use cli::commands::submit::submit_command;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run); the terminal belongs to the widget
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("floating-feedback.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting floating-feedback");

    match cli.command {
        Commands::Run(args) => run_command(args, cli.config).await,
        Commands::Categories(args) => {
            let config = load_config(cli.config.as_deref())?;
            categories_command(args, config).await
        }
        Commands::Submit(args) => {
            let config = load_config(cli.config.as_deref())?;
            submit_command(args, config).await
        }
        Commands::Config(args) => config_command(args, cli.config.as_deref()).await,
    }
}
