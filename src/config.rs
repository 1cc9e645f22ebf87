//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `AFTERSALES_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ticket server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed browser origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

#[cfg(feature = "server")]
impl ServerConfig {
    pub fn to_api_config(&self) -> crate::api::ApiConfig {
        crate::api::ApiConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

/// SQLite storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("aftersales").join("tickets.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./aftersales_data/tickets.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// API client and CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Where the CLI keeps its session file
    pub session_dir: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            session_dir: None,
        }
    }
}

impl ClientConfig {
    /// Session directory, falling back to the platform data dir
    pub fn session_dir(&self) -> PathBuf {
        match &self.session_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .map(|p| p.join("aftersales"))
                .unwrap_or_else(|| PathBuf::from("./aftersales_data")),
        }
    }
}

#[cfg(feature = "client")]
impl ClientConfig {
    pub fn to_api_client_config(&self) -> crate::client::ApiClientConfig {
        crate::client::ApiClientConfig {
            base_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
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

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// Load from an explicit path, or the default locations, or environment
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        for path in default_config_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `AFTERSALES_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("AFTERSALES_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("AFTERSALES_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid AFTERSALES_PORT: {}", port),
            }
        }
        if let Some(origins) = lookup("AFTERSALES_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        // Storage overrides
        if let Some(path) = lookup("AFTERSALES_DATABASE") {
            self.storage.database_path = path;
        }

        // Client overrides
        if let Some(url) = lookup("AFTERSALES_API_URL") {
            self.client.api_url = url;
        }
        if let Some(timeout) = lookup("AFTERSALES_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => self.client.timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid AFTERSALES_TIMEOUT_MS: {}", timeout),
            }
        }
        if let Some(dir) = lookup("AFTERSALES_SESSION_DIR") {
            self.client.session_dir = Some(dir);
        }

        // Logging overrides
        if let Some(level) = lookup("AFTERSALES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AFTERSALES_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Config file locations, in search order
pub fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|p| p.join("aftersales").join("config.toml")),
        Some(PathBuf::from("/etc/aftersales/config.toml")),
        Some(PathBuf::from("./config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
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
    r#"# Aftersales Desk Configuration
#
# Environment variables override these settings:
# - AFTERSALES_HOST
# - AFTERSALES_PORT
# - AFTERSALES_CORS_ORIGINS (comma separated)
# - AFTERSALES_DATABASE
# - AFTERSALES_API_URL
# - AFTERSALES_TIMEOUT_MS
# - AFTERSALES_SESSION_DIR
# - AFTERSALES_LOG_LEVEL
# - AFTERSALES_LOG_FORMAT

[server]
# Ticket server host
host = "0.0.0.0"

# Ticket server port
port = 8000

# Allowed browser origins (empty allows any)
cors_origins = []

[storage]
# SQLite database file
database_path = "~/.local/share/aftersales/tickets.db"

[client]
# Base URL of the ticket server
api_url = "http://localhost:8000"

# Request timeout in milliseconds
timeout_ms = 10000

# Where the CLI keeps the logged-in session
# session_dir = "~/.local/share/aftersales"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/aftersales/server.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.client.api_url, "http://localhost:8000");
        assert_eq!(config.client.timeout_ms, 10_000);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[server]\nport = 9100\n").unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert!(config.client.session_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("AFTERSALES_PORT", "9001"),
            ("AFTERSALES_CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("AFTERSALES_API_URL", "http://tickets.internal"),
            ("AFTERSALES_TIMEOUT_MS", "not-a-number"),
            ("AFTERSALES_SESSION_DIR", "/tmp/sessions"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9001);
        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.client.api_url, "http://tickets.internal");
        assert_eq!(config.client.timeout_ms, 10_000);
        assert_eq!(config.client.session_dir(), PathBuf::from("/tmp/sessions"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\ndatabase_path = \"/srv/tickets.db\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.database_path, "/srv/tickets.db");
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[server\nport = ").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_search_paths() {
        let paths = default_config_paths();
        assert!(paths.contains(&PathBuf::from("/etc/aftersales/config.toml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("./config.toml")));
    }
}
