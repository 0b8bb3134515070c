//! Server configuration read from the environment.

use pagewright_core::{PagewrightError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_POOL_SIZE: usize = 16;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub pool_size: usize,
    pub request_timeout: Duration,
    /// Directory served for any path the API does not claim
    pub static_dir: Option<PathBuf>,
    pub body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. `DATABASE_URL` is required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| PagewrightError::ConfigError("DATABASE_URL is not set".to_string()))?;

        Ok(Self {
            port: parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            database_url,
            pool_size: parse_var(&lookup, "POOL_SIZE")?.unwrap_or(DEFAULT_POOL_SIZE),
            request_timeout: Duration::from_secs(
                parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            static_dir: lookup("STATIC_DIR").filter(|v| !v.is_empty()).map(PathBuf::from),
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }

    /// Database URL with any password masked, for logging.
    pub fn redacted_database_url(&self) -> String {
        match Url::parse(&self.database_url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable>".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PagewrightError::ConfigError(format!("{key} has an invalid value: {raw}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/pages")])).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.pool_size, 16);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.static_dir.is_none());
        assert_eq!(config.body_limit, 50 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/pages"),
            ("PORT", "8080"),
            ("POOL_SIZE", "4"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("STATIC_DIR", "dist"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.static_dir, Some(PathBuf::from("dist")));
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, PagewrightError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/y"), ("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_redacted_database_url() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://app:hunter2@db:5432/pages")])).unwrap();
        let redacted = config.redacted_database_url();
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("app:****@db:5432/pages"));
    }
}
