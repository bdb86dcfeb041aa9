use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_environment")]
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            environment: default_environment(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_environment() -> Environment {
    Environment::Development
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing key for access tokens. Generated per process if not
    /// configured, which invalidates outstanding tokens on restart.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_expiry_minutes: default_token_expiry_minutes(),
        }
    }
}

fn default_jwt_secret() -> String {
    // Generate a random key if not provided
    uuid::Uuid::new_v4().to_string()
}

fn default_token_expiry_minutes() -> i64 {
    30
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Extra origins allowed in addition to the environment defaults.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// The CORS allow-list for the configured environment.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = match self.server.environment {
            Environment::Development => vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            Environment::Production => Vec::new(),
        };
        origins.extend(self.cors.allowed_origins.iter().cloned());
        origins
    }
}
