//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub fixtures: FixturesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// REST base URL, including the version prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Streaming base URL; chat connects to `{ws_url}/chat/{user_id}`
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8000/api/v1/ws".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Persisted session location
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

fn default_storage_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("sammyswipe")
                .join("auth-storage.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./auth-storage.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
        }
    }
}

/// Where synthesized identities come from in superuser mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureSourceKind {
    /// The public randomuser.me generator
    RandomUser,
    /// Offline generator, no network
    Local,
}

impl std::str::FromStr for FixtureSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "randomuser" => Ok(FixtureSourceKind::RandomUser),
            "local" => Ok(FixtureSourceKind::Local),
            other => Err(format!("Unknown fixture source: {}", other)),
        }
    }
}

/// Superuser mock mode
#[derive(Debug, Clone, Deserialize)]
pub struct FixturesConfig {
    /// Superuser login and 401 substitution are refused unless set
    #[serde(default)]
    pub allow_superuser: bool,

    #[serde(default = "default_fixture_source")]
    pub source: FixtureSourceKind,

    #[serde(default = "default_random_user_url")]
    pub random_user_url: String,

    #[serde(default = "default_nationalities")]
    pub nationalities: Vec<String>,

    /// Identities generated per list response
    #[serde(default = "default_fixture_count")]
    pub count: usize,
}

fn default_fixture_source() -> FixtureSourceKind {
    FixtureSourceKind::RandomUser
}

fn default_random_user_url() -> String {
    "https://randomuser.me/api/".to_string()
}

fn default_nationalities() -> Vec<String> {
    ["us", "gb", "ca", "au", "fr", "de"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_fixture_count() -> usize {
    10
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            allow_superuser: false,
            source: default_fixture_source(),
            random_user_url: default_random_user_url(),
            nationalities: default_nationalities(),
            count: default_fixture_count(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sammyswipe").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SAMMYSWIPE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(url) = var("SAMMYSWIPE_WS_URL") {
            self.api.ws_url = url;
        }

        if let Some(path) = var("SAMMYSWIPE_SESSION_FILE") {
            self.session.storage_path = path;
        }

        if let Some(allow) = var("SAMMYSWIPE_ALLOW_SUPERUSER") {
            self.fixtures.allow_superuser = matches!(allow.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(source) = var("SAMMYSWIPE_FIXTURE_SOURCE") {
            match source.parse() {
                Ok(kind) => self.fixtures.source = kind,
                Err(e) => tracing::warn!("Ignoring SAMMYSWIPE_FIXTURE_SOURCE: {}", e),
            }
        }

        if let Some(level) = var("SAMMYSWIPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SAMMYSWIPE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.session.storage_path)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# SammySwipe Configuration
#
# Environment variables override these settings:
# - SAMMYSWIPE_API_URL
# - SAMMYSWIPE_WS_URL
# - SAMMYSWIPE_SESSION_FILE
# - SAMMYSWIPE_ALLOW_SUPERUSER
# - SAMMYSWIPE_FIXTURE_SOURCE
# - SAMMYSWIPE_LOG_LEVEL
# - SAMMYSWIPE_LOG_FORMAT

[api]
# REST API base URL
base_url = "http://localhost:8000/api/v1"

# Streaming base URL (chat connects to <ws_url>/chat/<user_id>)
ws_url = "ws://localhost:8000/api/v1/ws"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# File holding the auth token and superuser flag
# (default: <local data dir>/sammyswipe/auth-storage.json)
# storage_path = "/home/me/.local/share/sammyswipe/auth-storage.json"

[fixtures]
# Allow superuser mode (fabricated login, synthesized responses on 401).
# Intended for development and demos only.
allow_superuser = false

# Identity source: "randomuser" (https://randomuser.me) or "local" (offline)
source = "randomuser"
random_user_url = "https://randomuser.me/api/"
nationalities = ["us", "gb", "ca", "au", "fr", "de"]

# Identities per synthesized list
count = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
