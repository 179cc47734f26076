//! Configuration system (layered: defaults > config file > env).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CourierError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WORLD_TIME_URL: &str = "https://worldtimeapi.org/api/timezone";
pub const DEFAULT_TIMEZONE: &str = "America/Lima";

/// Gateway configuration.
///
/// Resolution order, later layers win:
/// 1. Built-in defaults
/// 2. TOML file (`COURIER_CONFIG`, or `~/.courier/config.toml` when present)
/// 3. Environment variables (a `.env` file is loaded first if present)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    pub api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub base_url: String,
    pub summary_webhook_url: Option<String>,
    pub world_time_url: String,
    pub default_timezone: String,
    pub session_dir: PathBuf,
}

impl fmt::Debug for CourierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourierConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("assistant_id", &self.assistant_id)
            .field("base_url", &self.base_url)
            .field("summary_webhook_url", &self.summary_webhook_url)
            .field("world_time_url", &self.world_time_url)
            .field("default_timezone", &self.default_timezone)
            .field("session_dir", &self.session_dir)
            .finish()
    }
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            summary_webhook_url: None,
            world_time_url: DEFAULT_WORLD_TIME_URL.to_string(),
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            session_dir: default_courier_dir().join("sessions"),
        }
    }
}

impl CourierConfig {
    /// Load the full layered configuration for the running process.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let explicit = std::env::var("COURIER_CONFIG").ok().map(PathBuf::from);
        let path = explicit.clone().unwrap_or_else(default_config_path);

        let mut config = if explicit.is_some() || path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            CourierError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            CourierError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Overlay values found through `lookup` (normally the process env).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY").or_else(|| non_empty("OPEN_AI_KEY_ASISTANCE")) {
            self.api_key = Some(key);
        }
        if let Some(id) = non_empty("ASSISTANT_ID") {
            self.assistant_id = Some(id);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(url) = non_empty("SUMMARY_WEBHOOK_URL") {
            self.summary_webhook_url = Some(url);
        }
        if let Some(url) = non_empty("WORLD_TIME_BASE_URL") {
            self.world_time_url = url;
        }
        if let Some(tz) = non_empty("DEFAULT_TIMEZONE") {
            self.default_timezone = tz;
        }
        if let Some(dir) = non_empty("COURIER_SESSION_DIR") {
            self.session_dir = PathBuf::from(dir);
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CourierError::Configuration("OPENAI_API_KEY is not set".into()))
    }

    pub fn require_assistant_id(&self) -> Result<&str> {
        self.assistant_id
            .as_deref()
            .ok_or_else(|| CourierError::Configuration("ASSISTANT_ID is not set".into()))
    }
}

fn default_courier_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".courier"))
        .unwrap_or_else(|| PathBuf::from(".courier"))
}

fn default_config_path() -> PathBuf {
    default_courier_dir().join("config.toml")
}
