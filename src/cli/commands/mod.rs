pub mod categories;
pub mod config;
pub mod run;
pub mod submit;

use anyhow::Result;
use floating_feedback::config::Config;
use std::path::{Path, PathBuf};

/// Load configuration from `--config` if given, else the default location
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// The file `config` subcommands read and write
pub fn config_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::get_config_path(),
    }
}
