use anyhow::Result;
use clap::Args;
use colored::*;
use log::{info, warn};
use std::sync::Arc;

use floating_feedback::config::Config;
use floating_feedback::feedback::{FeedbackForm, Msg, MAX_RATING};
use floating_feedback::feedback::headless::{dispatch_all, run_until_idle};
use floating_feedback::tui::Command;

#[derive(Args)]
pub struct SubmitArgs {
    /// Short summary of the feedback
    #[arg(long)]
    pub title: Option<String>,

    /// The feedback itself
    #[arg(long)]
    pub description: Option<String>,

    /// Star rating from 1 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_RATING as i64))]
    pub rating: Option<u8>,

    /// Category to tag the feedback with (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Title of the list that receives feedback
    #[arg(long)]
    pub list: Option<String>,
}

/// Fill in the form from the arguments and submit it, without a terminal UI
pub async fn submit_command(args: SubmitArgs, mut config: Config) -> Result<()> {
    if let Some(list) = args.list {
        config.list_name = list;
    }
    let client = config.build_client()?;
    let mut form = FeedbackForm::new(config.to_props(), Arc::new(client));

    let command = form.on_mount();
    run_until_idle(&mut form, command).await;

    if let Some(reason) = form.categories().failure() {
        warn!("Category metadata unavailable: {}", reason);
    }

    for category in &args.categories {
        if !form.category_config().contains(category) {
            anyhow::bail!(
                "Unknown category '{}'. Available: {}",
                category,
                form.category_config().available.join(", ")
            );
        }
    }

    let mut messages = vec![
        Msg::Open,
        Msg::SetTitle(args.title.unwrap_or_default()),
        Msg::SetDescription(args.description.unwrap_or_default()),
        Msg::SetRating(args.rating.unwrap_or(0)),
    ];
    messages.extend(args.categories.into_iter().map(Msg::ToggleCategory));
    dispatch_all(&mut form, messages).await;

    let command = form.update(Msg::Submit);
    for command in command.into_vec() {
        if let Command::Perform(future) = command {
            let msg = future.await;
            // Nothing to auto-close without a window
            form.update(msg);
        }
    }

    let errors = form.field_errors();
    if !errors.is_empty() {
        for message in errors.messages() {
            eprintln!("{} {}", "✗".bright_red(), message.red());
        }
        anyhow::bail!("Feedback was not submitted");
    }

    match form.message() {
        Some(message) if message.is_error() => {
            eprintln!("{}", message.text.bright_red().bold());
            anyhow::bail!("Feedback was not submitted");
        }
        Some(message) => {
            info!("Feedback submitted from the command line");
            println!("{} {}", "✓".bright_green(), message.text.green());
            Ok(())
        }
        None => anyhow::bail!("Submission finished without a result"),
    }
}
