use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::info;

use floating_feedback::api::ListClient;
use floating_feedback::config::Config;
use floating_feedback::feedback::CategoryFieldConfig;

#[derive(Args)]
pub struct CategoriesArgs {
    /// Title of the list to inspect
    #[arg(long)]
    pub list: Option<String>,

    /// Choice column to read (defaults to the configured category field)
    #[arg(long)]
    pub field: Option<String>,
}

/// Fetch the category column's choices and print them
pub async fn categories_command(args: CategoriesArgs, config: Config) -> Result<()> {
    let list = args.list.unwrap_or_else(|| config.list_name.clone());
    let field = args.field.unwrap_or_else(|| config.category_field.clone());
    if list.trim().is_empty() {
        anyhow::bail!("No list configured");
    }

    let client = config.build_client()?;
    info!("Fetching choices of '{}' on list '{}'", field, list);

    let metadata = client
        .fetch_choice_field(&list, &field)
        .await
        .with_context(|| format!("Failed to read column '{}' on list '{}'", field, list))?;

    if metadata.choices.is_none() {
        println!("{}", format!("No categories found in the '{}' column.", field).yellow());
        return Ok(());
    }

    let categories = CategoryFieldConfig::from(metadata);
    let mode = if categories.allow_multiple {
        "multiple selection".bright_green()
    } else {
        "single selection".bright_yellow()
    };

    println!("{} {} ({})", "List:".dimmed(), list.bold(), mode);
    println!("{} {}", "Column:".dimmed(), field.bold());

    if categories.is_empty() {
        println!("{}", format!("No categories found in the '{}' column.", field).yellow());
    }
    for category in &categories.available {
        println!("  • {}", category.bright_blue());
    }

    Ok(())
}
