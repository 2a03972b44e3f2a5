//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Context};
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL URL. When absent the service runs on an in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    /// Default number of students per listing page.
    pub page_size: u32,
}

impl AppConfig {
    /// Reads configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => positive_u32("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let page_size = match get("PAGE_SIZE") {
            Some(v) => positive_u32("PAGE_SIZE", &v)?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_addr,
            db_max_connections,
            page_size,
        })
    }
}

fn positive_u32(key: &str, value: &str) -> anyhow::Result<u32> {
    let n = value
        .parse::<u32>()
        .with_context(|| format!("{} must be a positive integer, got '{}'", key, value))?;
    if n == 0 {
        return Err(anyhow!("{} must be greater than zero", key));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/students"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("PAGE_SIZE", "25"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/students"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config_from(&[("PAGE_SIZE", "0")]).is_err());
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "many")]).is_err());
    }
}
