/*!
 * Configuration support for the doctor directory
 *
 * Provides runtime configuration options for the catalog endpoint,
 * autocomplete, and output defaults.
 */

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::autocomplete::clamp_limit;
use crate::constants::{DEFAULT_ENDPOINT, PLACEHOLDER_PHOTO, SUGGESTION_LIMIT};
use crate::OutputFormat;

/// Global configuration for the doctor directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Catalog endpoint returning a doctor object or an array of doctors
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum number of autocomplete suggestions, between 1 and 3
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Request timeout in seconds (None = wait indefinitely)
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// Custom user agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: Option<String>,

    /// Image reference used for doctors without a photo
    #[serde(default = "default_placeholder_photo")]
    pub placeholder_photo: String,

    /// Whether to show a spinner while the catalog loads
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    /// Default output format for rendered results
    #[serde(default)]
    pub default_output_format: OutputFormat,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            suggestion_limit: default_suggestion_limit(),
            request_timeout_seconds: None,
            user_agent: default_user_agent(),
            placeholder_photo: default_placeholder_photo(),
            show_progress: default_show_progress(),
            default_output_format: OutputFormat::Text,
        }
    }
}

// Default value functions for serde
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_suggestion_limit() -> usize {
    SUGGESTION_LIMIT
}

fn default_user_agent() -> Option<String> {
    Some(format!("docsearch/{}", env!("CARGO_PKG_VERSION")))
}

fn default_placeholder_photo() -> String {
    PLACEHOLDER_PHOTO.to_string()
}

fn default_show_progress() -> bool {
    true
}

impl DirectoryConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `DOCSEARCH_ENDPOINT`: catalog URL
    /// - `DOCSEARCH_SUGGESTION_LIMIT`: number, clamped to 1..=3
    /// - `DOCSEARCH_TIMEOUT`: seconds, or "none"
    /// - `DOCSEARCH_PROGRESS`: "true" or "false"
    /// - `DOCSEARCH_PLACEHOLDER_PHOTO`: image reference
    /// - `DOCSEARCH_FORMAT`: "text", "json", "jsonl", or "csv"
    pub fn from_env() -> Self {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    fn merge_env<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("DOCSEARCH_ENDPOINT") {
            if !val.trim().is_empty() {
                self.endpoint = val;
            }
        }

        if let Some(val) = var("DOCSEARCH_SUGGESTION_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.suggestion_limit = clamp_limit(limit);
            }
        }

        if let Some(val) = var("DOCSEARCH_TIMEOUT") {
            self.request_timeout_seconds = match val.to_lowercase().as_str() {
                "none" | "0" => None,
                secs => secs.parse().ok(),
            };
        }

        if let Some(val) = var("DOCSEARCH_PROGRESS") {
            self.show_progress = val.to_lowercase() == "true";
        }

        if let Some(val) = var("DOCSEARCH_PLACEHOLDER_PHOTO") {
            self.placeholder_photo = val;
        }

        if let Some(val) = var("DOCSEARCH_FORMAT") {
            self.default_output_format = match val.to_lowercase().as_str() {
                "json" => OutputFormat::Json,
                "jsonl" | "json-lines" => OutputFormat::JsonLines,
                "csv" => OutputFormat::Csv,
                _ => OutputFormat::Text,
            };
        }

        self
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| crate::DirectoryError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                suggestion: Some("Check that the file is valid TOML format".to_string()),
            })?;
        config.suggestion_limit = clamp_limit(config.suggestion_limit);
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::DirectoryError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                suggestion: None,
            })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/docsearch/config.toml` on Unix-like systems
    /// or `%APPDATA%\docsearch\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "docsearch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, environment, or defaults
    ///
    /// Priority order:
    /// 1. Default config file (if exists)
    /// 2. Environment variables
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                match Self::from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config file"),
                }
            }
        }

        Self::from_env()
    }
}

// Global configuration support
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Option<DirectoryConfig>> = RwLock::new(None);
}

/// Set the global configuration
pub fn set_global_config(config: DirectoryConfig) {
    if let Ok(mut guard) = GLOBAL_CONFIG.write() {
        *guard = Some(config);
    }
}

/// Get the global configuration (or load one if not set)
pub fn global_config() -> DirectoryConfig {
    GLOBAL_CONFIG
        .read()
        .ok()
        .and_then(|guard| guard.clone())
        .unwrap_or_else(DirectoryConfig::load)
}

/// Clear the global configuration
pub fn clear_global_config() {
    if let Ok(mut guard) = GLOBAL_CONFIG.write() {
        *guard = None;
    }
}

/// Builder for customizing configuration
pub struct ConfigBuilder {
    config: DirectoryConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: DirectoryConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: DirectoryConfig) -> Self {
        Self { config }
    }

    /// Set the catalog endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the autocomplete limit (clamped to 1..=3)
    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.config.suggestion_limit = clamp_limit(limit);
        self
    }

    /// Set the request timeout
    pub fn request_timeout_seconds(mut self, timeout: Option<u64>) -> Self {
        self.config.request_timeout_seconds = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    pub fn placeholder_photo(mut self, photo: impl Into<String>) -> Self {
        self.config.placeholder_photo = photo.into();
        self
    }

    /// Set progress spinner enabled
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.config.show_progress = enabled;
        self
    }

    pub fn default_output_format(mut self, format: OutputFormat) -> Self {
        self.config.default_output_format = format;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DirectoryConfig {
        self.config
    }
}
