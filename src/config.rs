use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub avatars_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup, applying defaults for optional keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let avatars_dir = lookup("AVATARS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("avatars"));
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 3000,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "LOG_LEVEL",
                value,
            })?,
            None => Level::INFO,
        };

        Ok(Self {
            database_url,
            avatars_dir,
            host,
            port,
            log_level,
        })
    }
}
