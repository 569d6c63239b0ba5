use anyhow::{Context, Result};
use clap::Args;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use is_terminal::IsTerminal;
use log::{info, warn};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use floating_feedback::api::ListClient;
use floating_feedback::config::Config;
use floating_feedback::feedback::Position;
use floating_feedback::tui::{FeedbackApp, Runtime, Theme};

use super::load_config;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Title of the list that receives feedback
    #[arg(long)]
    pub list: Option<String>,

    /// Where the floating button sits
    #[arg(long, value_enum)]
    pub position: Option<Position>,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(list) = &self.list {
            config.list_name = list.clone();
        }
        if let Some(position) = self.position {
            config.position = position;
        }
    }
}

pub async fn run_command(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    if !io::stdout().is_terminal() {
        anyhow::bail!("The feedback widget needs an interactive terminal; use `floating-feedback submit` instead");
    }

    let mut config = load_config(config_path.as_deref())?;
    args.apply(&mut config);
    let client: Arc<dyn ListClient> = Arc::new(config.build_client()?);

    let app = FeedbackApp::new(config.to_props(), client);
    let mut runtime = Runtime::new(app, Theme::new(config.theme));

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Launching feedback widget for list '{}'", config.list_name);
    let result = match runtime.mount() {
        Ok(_) => run_tui(&mut terminal, &mut runtime, &args, config_path.as_deref()).await,
        Err(err) => Err(err),
    };
    runtime.unmount();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    runtime: &mut Runtime<FeedbackApp>,
    args: &RunArgs,
    config_path: Option<&Path>,
) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // Process all pending events first for minimal input latency
        let mut should_quit = false;
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl && key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('c') | KeyCode::Char('q') => {
                                should_quit = true;
                                break;
                            }
                            KeyCode::Char('r') => {
                                if let Err(err) = reload(runtime, args, config_path) {
                                    warn!("Config reload failed: {:#}", err);
                                }
                                continue;
                            }
                            _ => {}
                        }
                    }

                    if !runtime.handle_key(key)? {
                        should_quit = true;
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    if !runtime.handle_mouse(mouse)? {
                        should_quit = true;
                        break;
                    }
                }
                _ => {}
            }
        }

        if should_quit {
            break;
        }

        // Results of finished requests and timers
        if !runtime.poll_async()? {
            break;
        }

        terminal.draw(|frame| runtime.render(frame))?;

        // Sleep for remainder of 16ms frame (60 FPS)
        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }

    Ok(())
}

/// Re-read configuration and hand the form its new props
fn reload(runtime: &mut Runtime<FeedbackApp>, args: &RunArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    let client = config.build_client()?;

    info!("Reloaded configuration, list '{}'", config.list_name);
    runtime.set_theme(Theme::new(config.theme));
    runtime.app_mut().set_client(Arc::new(client));
    runtime.set_props(config.to_props())?;
    Ok(())
}
