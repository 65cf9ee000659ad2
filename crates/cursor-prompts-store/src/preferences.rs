//! User preferences stored next to, but independent of, the prompt data.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::kv::KeyValueStore;

pub const THEME_KEY: &str = "theme";

/// Light/dark preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Preference access. Never touches the prompt version counter.
pub struct Preferences {
    kv: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored theme, falling back to light for missing or unknown values.
    pub async fn theme(&self) -> Result<Theme> {
        let theme = match self.kv.get(THEME_KEY).await? {
            Some(Value::String(s)) => s.parse().unwrap_or_default(),
            _ => Theme::default(),
        };
        Ok(theme)
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        debug!(%theme, "Persisting theme");
        self.kv
            .set(vec![(
                THEME_KEY.to_string(),
                Value::String(theme.as_str().to_string()),
            )])
            .await
    }

    /// Flip the stored theme and return the new value.
    pub async fn toggle_theme(&self) -> Result<Theme> {
        let next = self.theme().await?.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}
