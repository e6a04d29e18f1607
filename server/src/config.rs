//! Layered configuration: built-in defaults overridden by `TODO_API__*`
//! environment variables, e.g. `TODO_API__SERVER__PORT=8080` or
//! `TODO_API__DATABASE__URL=postgres://...`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Without a URL the service keeps todos in memory.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub filter: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix("TODO_API").prefix_separator("__").separator("__"))
    }

    fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 5)?
            .set_default("log.filter", "info")?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
