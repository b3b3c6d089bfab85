use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_DATABASE_URL: &str = "sqlite:./portfolio.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `None` disables per-IP rate limiting
    pub rate_limit: Option<RateLimit>,
    /// Serve Swagger UI at /docs
    pub enable_docs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_minute: u32,
    pub burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;

        let per_minute = parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 60u32)?;
        let burst = parse_or(&lookup, "RATE_LIMIT_BURST", 10u32)?;
        let rate_limit = (per_minute > 0 && burst > 0).then_some(RateLimit { per_minute, burst });

        let enable_docs = parse_or(&lookup, "ENABLE_DOCS", true)?;

        Ok(Config {
            database_url,
            bind_addr,
            rate_limit,
            enable_docs,
        })
    }
}

impl Default for Config {
    /// In-memory store, no rate limiting, no docs. Used by tests and tools.
    fn default() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            rate_limit: None,
            enable_docs: false,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.rate_limit, Some(RateLimit { per_minute: 60, burst: 10 }));
        assert!(config.enable_docs);
    }

    #[test]
    fn test_zero_rate_disables_limiter() {
        let config = Config::from_lookup(lookup_from(&[("RATE_LIMIT_PER_MINUTE", "0")])).unwrap();
        assert_eq!(config.rate_limit, None);
    }

    #[test]
    fn test_malformed_value_names_variable() {
        let err = Config::from_lookup(lookup_from(&[("ENABLE_DOCS", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("ENABLE_DOCS"));
    }
}
