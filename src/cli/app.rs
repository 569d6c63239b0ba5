use super::commands::categories::CategoriesArgs;
use super::commands::config::ConfigCommands;
use super::commands::run::RunArgs;
use super::commands::submit::SubmitArgs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "floating-feedback")]
#[command(about = "Collect user feedback into a SharePoint list")]
#[command(version)]
pub struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive feedback widget
    Run(RunArgs),
    /// Show the category choices configured on the target list
    Categories(CategoriesArgs),
    /// Submit feedback without the interactive widget
    Submit(SubmitArgs),
    /// Configuration management
    Config(ConfigCommands),
}
