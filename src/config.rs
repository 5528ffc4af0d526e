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
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which key-value backend holds user data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    Memory,
    #[default]
    Sqlite,
}

impl std::str::FromStr for StorageBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_app_prefix")]
    pub app_prefix: String,

    /// Byte budget across all keys; unset means unlimited
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("fitlife").to_string_lossy().to_string())
        .unwrap_or_else(|| "./fitlife_data".to_string())
}

fn default_app_prefix() -> String {
    crate::store::DEFAULT_APP_PREFIX.to_string()
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded
    pub fn data_dir_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir_path().join("fitlife.db")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            data_dir: default_data_dir(),
            app_prefix: default_app_prefix(),
            quota_bytes: None,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Generative text service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// When absent the service runs offline and serves canned replies
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    #[serde(default = "default_ai_timeout")]
    pub request_timeout_ms: u64,

    /// Delay before an offline reply, in ms
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,

    #[serde(default = "default_response_language")]
    pub response_language: String,
}

fn default_model() -> String {
    crate::catalog::DEFAULT_TEXT_MODEL.to_string()
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_timeout() -> u64 {
    60_000
}

fn default_simulated_delay() -> u64 {
    1000
}

fn default_response_language() -> String {
    "Brazilian Portuguese".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: default_ai_base_url(),
            request_timeout_ms: default_ai_timeout(),
            simulated_delay_ms: default_simulated_delay(),
            response_language: default_response_language(),
        }
    }
}

/// Simulated sign-in latencies
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_login_delay")]
    pub login_delay_ms: u64,

    #[serde(default = "default_register_delay")]
    pub register_delay_ms: u64,

    #[serde(default = "default_history_load_delay")]
    pub history_load_delay_ms: u64,
}

fn default_login_delay() -> u64 {
    700
}

fn default_register_delay() -> u64 {
    1000
}

fn default_history_load_delay() -> u64 {
    300
}

impl AuthConfig {
    /// All delays zeroed; used by tests and benchmarks
    pub fn instant() -> Self {
        Self {
            login_delay_ms: 0,
            register_delay_ms: 0,
            history_load_delay_ms: 0,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: default_login_delay(),
            register_delay_ms: default_register_delay(),
            history_load_delay_ms: default_history_load_delay(),
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("fitlife").join("config.toml")),
            Some(PathBuf::from("/etc/fitlife/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(data_dir) = var("FITLIFE_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(backend) = var("FITLIFE_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.storage.backend = kind,
                Err(e) => tracing::warn!("Ignoring FITLIFE_STORAGE_BACKEND: {}", e),
            }
        }

        // API overrides
        if let Some(host) = var("FITLIFE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("FITLIFE_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // AI overrides
        if let Some(model) = var("FITLIFE_AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(key) = var("API_KEY").or_else(|| var("GEMINI_API_KEY")) {
            if !key.trim().is_empty() {
                self.ai.api_key = Some(key);
            }
        }

        // Logging overrides
        if let Some(level) = var("FITLIFE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("FITLIFE_LOG_FORMAT") {
            self.logging.format = format;
        }
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
    r#"# FitLife Configuration
#
# Environment variables override these settings:
# - FITLIFE_DATA_DIR
# - FITLIFE_STORAGE_BACKEND
# - FITLIFE_API_HOST
# - FITLIFE_API_PORT
# - FITLIFE_AI_MODEL
# - API_KEY (or GEMINI_API_KEY)
# - FITLIFE_LOG_LEVEL
# - FITLIFE_LOG_FORMAT

[storage]
# Key-value backend: memory or sqlite
backend = "sqlite"

# Directory holding fitlife.db
data_dir = "~/.local/share/fitlife"

# Prefix of every stored key: {app_prefix}{user_id|guest}_{key}
app_prefix = "fitlife_ai_"

# Optional byte quota across all keys
# quota_bytes = 5242880

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins
cors_origins = ["http://localhost:5173", "http://127.0.0.1:5173"]

# Request timeout in seconds
request_timeout_secs = 60

[ai]
# Generative text model
model = "gemini-2.5-flash-preview-04-17"

# API key; leave unset to serve canned offline replies
# api_key = ""

base_url = "https://generativelanguage.googleapis.com/v1beta"

# Per-request timeout (ms)
request_timeout_ms = 60000

# Delay before an offline reply (ms)
simulated_delay_ms = 1000

# Language the model is asked to answer in
response_language = "Brazilian Portuguese"

[auth]
# Simulated latencies (ms)
login_delay_ms = 700
register_delay_ms = 1000
history_load_delay_ms = 300

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_file_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.storage.backend, StorageBackendKind::Sqlite);
        assert_eq!(config.storage.app_prefix, "fitlife_ai_");
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.ai.model, "gemini-2.5-flash-preview-04-17");
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.auth.login_delay_ms, 700);
        assert_eq!(config.auth.register_delay_ms, 1000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse("[api]\nport = 9000\n").unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.ai.simulated_delay_ms, 1000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let missing = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FITLIFE_DATA_DIR", "/tmp/fit"),
            ("FITLIFE_STORAGE_BACKEND", "memory"),
            ("FITLIFE_API_PORT", "not-a-port"),
            ("GEMINI_API_KEY", "secret"),
            ("FITLIFE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/tmp/fit");
        assert_eq!(config.storage.backend, StorageBackendKind::Memory);
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(
            config.storage.database_path(),
            PathBuf::from("/tmp/fit/fitlife.db")
        );
    }

    #[test]
    fn test_data_dir_expands_home() {
        let mut config = Config::default();
        config.storage.data_dir = "~/.local/share/fitlife".to_string();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.storage.data_dir_path(),
                home.join(".local/share/fitlife")
            );
        }
    }

    #[test]
    fn test_blank_api_key_keeps_offline() {
        let mut config = Config::default();
        config.apply_overrides(|name| (name == "API_KEY").then(|| "  ".to_string()));
        assert!(config.ai.api_key.is_none());
    }
}
