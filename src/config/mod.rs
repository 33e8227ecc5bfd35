//! Configuration management for chatpress.
//!
//! Configuration is read from `~/.config/chatpress/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::extractor::ExtractorConfig;
use crate::renderer::RendererConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub renderer: RendererConfig,
    pub server: ServerConfig,
}

/// Settings for the web UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web UI listens on
    pub bind: String,

    /// Drop a session after this many seconds without a request (default: 3600)
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            session_ttl_secs: 3600,
        }
    }
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs.max(1))
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/chatpress/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("chatpress").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# chatpress configuration

[extractor]
# Run the browser without a visible window
headless = true

# Seconds to wait for the first message to render
timeout_secs = 20

# Extra wait after the first message appears (milliseconds)
settle_ms = 2000

# Delay between checks while waiting (milliseconds)
poll_interval_ms = 250

# Browser viewport
window_width = 1920
window_height = 1080

user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"

# Selectors for message bodies and role labels on the share page
message_selector = "div[class*='markdown']"
role_selector = "div[class*='font-semibold']"

# Label used when a message has no role label
unknown_role = "Unknown"

# Path to Chrome/Chromium; detected automatically when unset
# chrome_executable = "/usr/bin/chromium"

[renderer]
title = "ChatGPT Conversation"

# Print an "Extracted on" timestamp under the title
include_metadata = true

# Page size and margin in points (612 x 792 is US Letter, 595 x 842 is A4)
page_width = 612.0
page_height = 792.0
margin = 72.0

# Heading color
accent_color = "#1a73e8"

compress = true

[server]
bind = "127.0.0.1:8501"

# Forget an idle session's conversation after this many seconds
session_ttl_secs = 3600
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.extractor.timeout_secs, 20);
        assert_eq!(config.extractor.message_selector, "div[class*='markdown']");
        assert_eq!(
            config.extractor.user_agent,
            ExtractorConfig::default().user_agent
        );
        assert_eq!(config.renderer.accent_color, "#1a73e8");
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert_eq!(config.server.session_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[extractor]
timeout_secs = 45

[renderer]
include_metadata = false
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.extractor.timeout_secs, 45);
        assert!(!config.renderer.include_metadata);
        // Defaults elsewhere
        assert_eq!(config.extractor.settle_ms, 2000);
        assert_eq!(config.renderer.title, "ChatGPT Conversation");
        assert_eq!(config.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.extractor.unknown_role, "Unknown");
        assert!(config.renderer.include_metadata);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.session_ttl_secs, 3600);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extractor]\ntimeout_secs = \"soon\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from(&dir.path().join("nope.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_create_default_config_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::create_default_config(&path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.renderer.margin, 72.0);
    }
}
