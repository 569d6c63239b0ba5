use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use dialoguer::{Input, Select};
use log::info;
use std::path::Path;

use floating_feedback::config::{Config, ENV_OVERRIDES};
use floating_feedback::feedback::Position;

use super::{config_path, load_config};

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective configuration, including environment overrides
    Show,
    /// Print where the config file lives
    Path,
    /// Create or update the config file interactively
    Init,
    /// Set a single value in the config file
    Set {
        /// Setting name (e.g. site_url, list_name, position)
        key: String,
        /// Setting value
        value: String,
    },
}

pub async fn config_command(args: ConfigCommands, path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => show_command(path),
        ConfigSubcommands::Path => {
            println!("{}", config_path(path)?.display());
            Ok(())
        }
        ConfigSubcommands::Init => init_command(path),
        ConfigSubcommands::Set { key, value } => set_command(path, &key, &value),
    }
}

fn show_command(path: Option<&Path>) -> Result<()> {
    let file = config_path(path)?;
    let config = load_config(path)?;

    println!("{} {}", "Config file:".dimmed(), file.display());
    if !file.exists() {
        println!("{}", "  (not created yet, showing defaults)".dimmed());
    }
    println!();

    let token = if config.access_token.is_some() {
        "(set)".green()
    } else {
        "(not set)".dimmed()
    };

    let rows: [(&str, String); 9] = [
        ("site_url", config.site_url.clone()),
        ("list_name", config.list_name.clone()),
        ("category_field", config.category_field.clone()),
        ("position", config.position.to_string()),
        ("theme", format!("{:?}", config.theme).to_lowercase()),
        ("user_display_name", config.user_display_name.clone()),
        ("user_email", config.user_email.clone()),
        ("page_name", config.page_name.clone()),
        ("request_timeout_secs", config.request_timeout_secs.to_string()),
    ];
    for (key, value) in rows {
        println!("  {:<22} {}", key.bright_blue(), value);
    }
    println!("  {:<22} {}", "access_token".bright_blue(), token);

    println!();
    println!("{}", "Columns:".bold());
    let columns = &config.columns;
    for (key, value) in [
        ("title", &columns.title),
        ("description", &columns.description),
        ("submitted_by", &columns.submitted_by),
        ("rating", &columns.rating),
        ("page_name", &columns.page_name),
        ("category", &columns.category),
    ] {
        println!("  {:<22} {}", key.bright_blue(), value);
    }

    let active: Vec<&str> = ENV_OVERRIDES
        .iter()
        .copied()
        .filter(|name| std::env::var(name).is_ok_and(|v| !v.is_empty()))
        .collect();
    if !active.is_empty() {
        println!();
        println!("{} {}", "Environment overrides:".yellow(), active.join(", "));
    }

    Ok(())
}

fn init_command(path: Option<&Path>) -> Result<()> {
    let file = config_path(path)?;
    let mut config = Config::read_file(&file)?;

    println!("{}", "Configure the feedback widget".bold());
    println!("{}", format!("Writing to {}", file.display()).dimmed());
    println!();

    config.site_url = Input::<String>::new()
        .with_prompt("SharePoint site URL (e.g., https://contoso.sharepoint.com/sites/intranet)")
        .with_initial_text(config.site_url.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.starts_with("http://") || input.starts_with("https://") {
                Ok(())
            } else {
                Err("URL must start with http:// or https://")
            }
        })
        .interact_text()?;

    config.list_name = Input::<String>::new()
        .with_prompt("Feedback list title")
        .default(config.list_name.clone())
        .interact_text()?;

    config.category_field = Input::<String>::new()
        .with_prompt("Category column")
        .default(config.category_field.clone())
        .interact_text()?;

    config.user_display_name = Input::<String>::new()
        .with_prompt("Your display name")
        .default(config.user_display_name.clone())
        .allow_empty(true)
        .interact_text()?;

    config.page_name = Input::<String>::new()
        .with_prompt("Page name recorded with each submission")
        .default(config.page_name.clone())
        .allow_empty(true)
        .interact_text()?;

    let positions = [Position::Bottom, Position::Top];
    let current = positions.iter().position(|p| *p == config.position).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Floating button position")
        .items(&positions)
        .default(current)
        .interact()?;
    config.position = positions[selection];

    let token = rpassword::prompt_password("Access token (leave empty to keep the current one): ")
        .context("Failed to read access token")?;
    if !token.trim().is_empty() {
        config.access_token = Some(token.trim().to_string());
    }

    config.save_to(&file)?;
    info!("Config initialised at {:?}", file);
    println!();
    println!("{} {}", "✓".bright_green(), format!("Saved {}", file.display()).green());
    Ok(())
}

fn set_command(path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let file = config_path(path)?;
    // File values only, so environment overrides are never persisted
    let mut config = Config::read_file(&file)?;
    config.set(key, value)?;
    config.save_to(&file)?;

    info!("Set {} in {:?}", key, file);
    println!("{} {} = {}", "✓".bright_green(), key.bold(), value);
    Ok(())
}
