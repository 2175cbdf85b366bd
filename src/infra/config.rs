//! Centralized configuration (environment variables + defaults).

use crate::domain::inventory::{
    InvalidThresholds, StockThresholds, DEFAULT_LOW_STOCK_BELOW, DEFAULT_MEDIUM_STOCK_BELOW,
};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_RECENT_PRODUCTS_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Thresholds(#[from] InvalidThresholds),
}

/// Where products, categories and movements are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("expected 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgres => f.write_str("postgres"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: StoreBackend,
    /// Required for the Postgres backend only.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub thresholds: StockThresholds,
    pub recent_products_limit: usize,
    /// Memory backend only: start with the demo catalogue.
    pub seed_demo_data: bool,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = parse_or("STORE_BACKEND", get("STORE_BACKEND"), StoreBackend::Postgres)?;
        let database_url = get("DATABASE_URL");
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let low = parse_or("LOW_STOCK_THRESHOLD", get("LOW_STOCK_THRESHOLD"), DEFAULT_LOW_STOCK_BELOW)?;
        let medium = parse_or(
            "MEDIUM_STOCK_THRESHOLD",
            get("MEDIUM_STOCK_THRESHOLD"),
            DEFAULT_MEDIUM_STOCK_BELOW,
        )?;

        Ok(Self {
            backend,
            database_url,
            bind_addr: parse_value::<SocketAddr>(
                "BIND_ADDR",
                get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            )?,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                get("DB_MAX_CONNECTIONS"),
                DEFAULT_DB_MAX_CONNECTIONS,
            )?
            .max(1),
            thresholds: StockThresholds::new(low, medium)?,
            recent_products_limit: parse_or(
                "RECENT_PRODUCTS_LIMIT",
                get("RECENT_PRODUCTS_LIMIT"),
                DEFAULT_RECENT_PRODUCTS_LIMIT,
            )?,
            seed_demo_data: parse_bool("SEED_DEMO_DATA", get("SEED_DEMO_DATA"), true)?,
        })
    }

    /// Database URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> Result<String, ConfigError> {
    dotenv::dotenv().ok();
    env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing("DATABASE_URL"))
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => parse_value(name, value),
    }
}

fn parse_value<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
        value,
    })
}

fn parse_bool(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                value: v.clone(),
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let cfg = config(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.thresholds, StockThresholds::default());
        assert_eq!(cfg.recent_products_limit, 5);
        assert!(cfg.seed_demo_data);
        assert!(cfg.require_database_url().is_err());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        assert!(matches!(config(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/stock")]).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Postgres);
        assert_eq!(cfg.db_max_connections, 5);
    }

    #[test]
    fn thresholds_are_configurable_and_checked() {
        let cfg = config(&[
            ("STORE_BACKEND", "memory"),
            ("LOW_STOCK_THRESHOLD", "5"),
            ("MEDIUM_STOCK_THRESHOLD", "20"),
        ])
        .unwrap();
        assert_eq!(cfg.thresholds.low_below(), 5);
        assert_eq!(cfg.thresholds.medium_below(), 20);

        let err = config(&[
            ("STORE_BACKEND", "memory"),
            ("LOW_STOCK_THRESHOLD", "60"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Thresholds(_)));
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = config(&[("STORE_BACKEND", "memory"), ("BIND_ADDR", "nope")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
        let cfg = config(&[("STORE_BACKEND", "memory"), ("BIND_ADDR", "127.0.0.1:8080")]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        let err = config(&[("STORE_BACKEND", "sqlite")]).unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
        let err = config(&[("STORE_BACKEND", "memory"), ("SEED_DEMO_DATA", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("SEED_DEMO_DATA"));
    }
}
