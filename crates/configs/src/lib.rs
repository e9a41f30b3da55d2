//! Process configuration, read once at startup.
//!
//! A `config.toml` (path overridable via `CONFIG_PATH`) is optional; every
//! setting falls back to a default and the store-related fields can be
//! overridden from the environment (`MONGODB_URL`, `MONGODB_DATABASE`,
//! `SERVER_HOST`, `SERVER_PORT`). There is no hot reload.

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string.
    #[serde(default)]
    pub url: String,
    /// Database holding the `products` and `orders` collections.
    #[serde(default)]
    pub name: String,
    /// Bounds connection establishment and server selection per operation.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: String::new(), name: String::new(), connect_timeout_secs: default_connect_timeout() }
    }
}

fn default_connect_timeout() -> u64 {
    10
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

impl AppConfig {
    /// Load the file if present, apply environment overrides, validate.
    pub fn load() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be a port number, got {port:?}"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be non-zero"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Environment wins over the TOML file for store settings.
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("MONGODB_URL") {
            self.url = url;
        }
        if let Ok(name) = std::env::var("MONGODB_DATABASE") {
            self.name = name;
        }
        if self.url.trim().is_empty() {
            self.url = "mongodb://localhost:27017".to_string();
        }
        if self.name.trim().is_empty() {
            self.name = "ecommerce".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.url must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name must not be empty"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}
