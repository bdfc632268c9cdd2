//! Startup configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `mongodb` (default) | `memory`
//! - `MONGODB_URI`: connection string (required when `STORAGE_MODE=mongodb`)
//! - `MONGODB_DATABASE`: database name (default: the one in the URI, else `todo_app`)
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: listening port (default: `3000`)

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;
use todo_core::{MongoStore, TodoError, TodoRepository};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MONGODB_URI must be set when STORAGE_MODE=mongodb")]
    MissingMongoUri,

    #[error("invalid STORAGE_MODE: {0} (expected `mongodb` or `memory`)")]
    InvalidStorageMode(String),

    #[error("invalid PORT: {0}")]
    InvalidPort(String),

    #[error("invalid HOST: {0}")]
    InvalidHost(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    MongoDb,
    Memory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "memory" | "in_memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Where todos are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    MongoDb {
        uri: String,
        database: Option<String>,
    },
    Memory,
}

impl StoreConfig {
    /// Builds the repository, connecting to MongoDB if configured. Fails if
    /// the server cannot be reached.
    pub async fn connect(&self) -> Result<TodoRepository, TodoError> {
        match self {
            StoreConfig::MongoDb { uri, database } => {
                let store = MongoStore::connect(uri, database.as_deref()).await?;
                Ok(TodoRepository::new(store))
            }
            StoreConfig::Memory => {
                tracing::warn!("using in-memory store; todos are lost on restart");
                Ok(TodoRepository::in_memory())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub store: StoreConfig,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };
        let host = match get("HOST") {
            Some(host) => host
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(host))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let mode: StorageMode = match get("STORAGE_MODE") {
            Some(mode) => mode.parse()?,
            None => StorageMode::default(),
        };
        let store = match mode {
            StorageMode::MongoDb => StoreConfig::MongoDb {
                uri: get("MONGODB_URI").ok_or(ConfigError::MissingMongoUri)?,
                database: get("MONGODB_DATABASE"),
            },
            StorageMode::Memory => StoreConfig::Memory,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn mongodb_uri_is_required_by_default() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::MissingMongoUri);
        assert_eq!(
            config(&[("MONGODB_URI", "  ")]).unwrap_err(),
            ConfigError::MissingMongoUri
        );
    }

    #[test]
    fn defaults_to_port_3000_on_all_interfaces() {
        let config = config(&[("MONGODB_URI", "mongodb://localhost:27017/todos")]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.store,
            StoreConfig::MongoDb {
                uri: "mongodb://localhost:27017/todos".to_string(),
                database: None,
            }
        );
    }

    #[test]
    fn memory_mode_needs_no_uri() {
        let config = config(&[
            ("STORAGE_MODE", "memory"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("STORAGE_MODE", "postgres")]).unwrap_err(),
            ConfigError::InvalidStorageMode("postgres".to_string())
        );
        assert_eq!(
            config(&[("STORAGE_MODE", "memory"), ("PORT", "tres mil")]).unwrap_err(),
            ConfigError::InvalidPort("tres mil".to_string())
        );
        assert_eq!(
            config(&[("STORAGE_MODE", "memory"), ("HOST", "localhost:1")]).unwrap_err(),
            ConfigError::InvalidHost("localhost:1".to_string())
        );
    }
}
