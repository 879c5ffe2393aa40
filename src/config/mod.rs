use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_DATABASE_URL: &str = "sqlite://church_events.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_STATIC_DIR: &str = ".";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({details})")]
    InvalidValue {
        key: &'static str,
        value: String,
        details: String,
    },
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Comma separated list; `None` permits any origin.
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
            },
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS").filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            key: "HOST",
            value: self.host.clone(),
            details: e.to_string(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
            static_dir: DEFAULT_STATIC_DIR.into(),
            cors_allowed_origins: None,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };

    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::InvalidValue {
            key,
            details: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.database.url, "sqlite://church_events.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.port, 5001);
        assert_eq!(config.static_dir, PathBuf::from("."));
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:5001");
    }

    #[test]
    fn test_custom_values() {
        let config = config_with(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("STATIC_DIR", "public"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(
            config.cors_allowed_origins.as_deref(),
            Some("http://localhost:3000")
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_with(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_blank_cors_origins_means_any() {
        let config = config_with(&[("CORS_ALLOWED_ORIGINS", "  ")]).unwrap();
        assert!(config.cors_allowed_origins.is_none());
    }
}
