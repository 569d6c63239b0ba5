use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ColumnMapping, SharePointClient};
use crate::feedback::{DEFAULT_CATEGORY_FIELD, DEFAULT_LIST_NAME, FeedbackProps, Position};
use crate::tui::ThemeVariant;

/// Environment variables that override values from the config file
pub const ENV_OVERRIDES: &[&str] = &[
    "FEEDBACK_SITE_URL",
    "FEEDBACK_LIST_NAME",
    "FEEDBACK_CATEGORY_FIELD",
    "FEEDBACK_USER_NAME",
    "FEEDBACK_USER_EMAIL",
    "FEEDBACK_PAGE_NAME",
    "FEEDBACK_ACCESS_TOKEN",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site_url: String,
    pub list_name: String,
    pub category_field: String,
    pub position: Position,
    pub theme: ThemeVariant,
    pub user_display_name: String,
    pub user_email: String,
    pub page_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
    pub columns: ColumnMapping,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            list_name: DEFAULT_LIST_NAME.to_string(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            position: Position::default(),
            theme: ThemeVariant::default(),
            user_display_name: String::new(),
            user_email: String::new(),
            page_name: String::new(),
            access_token: None,
            request_timeout_secs: 30,
            columns: ColumnMapping::default(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("floating-feedback")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".floating-feedback")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::read_file(path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read the file only; a missing file yields defaults
    pub fn read_file(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&config_content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", path);

        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        let config_content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let take = |name: &str, target: &mut String| {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                debug!("Config override from {}", name);
                *target = value;
            }
        };

        take("FEEDBACK_SITE_URL", &mut self.site_url);
        take("FEEDBACK_LIST_NAME", &mut self.list_name);
        take("FEEDBACK_CATEGORY_FIELD", &mut self.category_field);
        take("FEEDBACK_USER_NAME", &mut self.user_display_name);
        take("FEEDBACK_USER_EMAIL", &mut self.user_email);
        take("FEEDBACK_PAGE_NAME", &mut self.page_name);

        if let Some(token) = lookup("FEEDBACK_ACCESS_TOKEN").filter(|v| !v.is_empty()) {
            self.access_token = Some(token);
        }
    }

    /// Set a single value by its key name, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "site_url" => self.site_url = value.to_string(),
            "list_name" => self.list_name = value.to_string(),
            "category_field" => self.category_field = value.to_string(),
            "user_display_name" => self.user_display_name = value.to_string(),
            "user_email" => self.user_email = value.to_string(),
            "page_name" => self.page_name = value.to_string(),
            "access_token" => {
                self.access_token = if value.is_empty() { None } else { Some(value.to_string()) }
            }
            "position" => {
                self.position = match value.to_lowercase().as_str() {
                    "top" => Position::Top,
                    "bottom" => Position::Bottom,
                    other => anyhow::bail!("Invalid position '{}', expected top or bottom", other),
                }
            }
            "theme" => {
                self.theme = match value.to_lowercase().as_str() {
                    "mocha" | "dark" => ThemeVariant::Mocha,
                    "latte" | "light" => ThemeVariant::Latte,
                    other => anyhow::bail!("Invalid theme '{}', expected mocha or latte", other),
                }
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}'", value))?
            }
            _ => anyhow::bail!("Unknown setting: {}", key),
        }
        Ok(())
    }

    /// Check what a host needs before it can talk to the list
    pub fn validate_site(&self) -> Result<()> {
        if self.site_url.trim().is_empty() {
            anyhow::bail!(
                "No site URL configured. Run `floating-feedback config init` or set FEEDBACK_SITE_URL"
            );
        }
        if !self.site_url.starts_with("http://") && !self.site_url.starts_with("https://") {
            anyhow::bail!("Site URL must start with http:// or https://: {}", self.site_url);
        }
        Ok(())
    }

    /// Props the form is mounted with
    pub fn to_props(&self) -> FeedbackProps {
        FeedbackProps {
            site_url: self.site_url.clone(),
            list_name: self.list_name.clone(),
            category_field: self.category_field.clone(),
            columns: self.columns.clone(),
            user_display_name: self.user_display_name.clone(),
            user_email: self.user_email.clone(),
            page_name: self.page_name.clone(),
            position: self.position,
        }
    }

    pub fn build_client(&self) -> Result<SharePointClient> {
        self.validate_site()?;
        SharePointClient::new(
            self.site_url.clone(),
            self.access_token.clone(),
            Duration::from_secs(self.request_timeout_secs.max(1)),
        )
        .context("Failed to build HTTP client")
    }
}
