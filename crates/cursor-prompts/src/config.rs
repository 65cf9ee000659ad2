//! Configuration file support for cursor-prompts.
//!
//! Loads `cursor-prompts.toml` from `--config` or the user config directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use cursor_prompts_core::ControllerSettings;
use cursor_prompts_logging::LogFormat;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "cursor-prompts.toml";

/// Application configuration loaded from `cursor-prompts.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database location (default: data dir)
    pub db_path: Option<PathBuf>,
    /// Tracing filter, e.g. "info" or "cursor_prompts_store=debug"
    pub log_level: Option<String>,
    /// pretty, json or compact
    pub log_format: Option<String>,
    /// Also write JSON logs to this file
    pub log_file: Option<PathBuf>,
    /// Where exports are written when no --output is given
    pub export_dir: Option<PathBuf>,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

/// Title suggestion tuning
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SuggestionConfig {
    pub min_chars: Option<usize>,
    pub limit: Option<usize>,
}

impl AppConfig {
    /// Default config location: `<config_dir>/cursor-prompts/cursor-prompts.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cursor-prompts").join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    /// Resolve the configuration to use.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path)?
                .with_context(|| format!("Config file not found: {}", path.display())),
            None => match Self::default_path() {
                Some(path) => Ok(Self::load(&path)?.unwrap_or_default()),
                None => Ok(Self::default()),
            },
        }
    }

    /// Configured log format, if any.
    pub fn log_format(&self) -> Result<Option<LogFormat>> {
        self.log_format
            .as_deref()
            .map(|s| s.parse::<LogFormat>().map_err(anyhow::Error::msg))
            .transpose()
    }

    /// Controller settings with config overrides applied.
    pub fn controller_settings(&self) -> ControllerSettings {
        let mut settings = ControllerSettings::default();
        if let Some(min_chars) = self.suggestions.min_chars {
            settings = settings.with_suggestion_min_chars(min_chars);
        }
        if let Some(limit) = self.suggestions.limit {
            settings = settings.with_suggestion_limit(limit);
        }
        settings
    }
}
