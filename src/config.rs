//! Configuration

use serde::{Deserialize, Serialize};

use crate::output::linedraw::{self, Charset};

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How long a lone ESC waits before resolving, in milliseconds
    pub escape_timeout_ms: u64,
    /// Which box-drawing character set to emit
    pub charset: CharsetName,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escape_timeout_ms: 10,
            charset: CharsetName::Vt100,
        }
    }
}

/// Named box-drawing character sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetName {
    Vt100,
    Utf8,
    Ascii,
}

impl CharsetName {
    pub fn charset(self) -> Charset {
        match self {
            CharsetName::Vt100 => linedraw::VT100,
            CharsetName::Utf8 => linedraw::UTF8,
            CharsetName::Ascii => linedraw::ASCII,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or fall back to defaults
    pub fn load_or_default() -> Self {
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                if let Ok(config) = Self::load(&config_path) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn escape_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.escape_timeout_ms)
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<std::path::PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| std::path::PathBuf::from(home).join(".config").join("ansikit"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
