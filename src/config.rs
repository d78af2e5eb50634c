//! # Process configuration
//!
//! Everything the service needs from the environment is read once at startup.
//! A missing `MONGODB_URI` is fatal: the server is never built without it.
//!
//! - `MONGODB_URI`: MongoDB connection string (required)
//! - `MONGODB_DATABASE`: database name, overriding the one in the URI path
//! - `CRON_SECRET`: bearer token required by the cleanup route when set

use crate::errors::ConfigError;

pub const MONGODB_URI: &str = "MONGODB_URI";
pub const MONGODB_DATABASE: &str = "MONGODB_DATABASE";
pub const CRON_SECRET: &str = "CRON_SECRET";

pub const DEFAULT_DATABASE: &str = "banners";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database: Option<String>,
    pub cron_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mongodb_uri = read(MONGODB_URI).ok_or(ConfigError::MissingVar(MONGODB_URI))?;

        Ok(Self {
            mongodb_uri,
            database: read(MONGODB_DATABASE),
            cron_secret: read(CRON_SECRET),
        })
    }

    /// Database name to use when the client's URI carries none.
    pub fn database_or(&self, from_uri: Option<&str>) -> String {
        self.database
            .as_deref()
            .or(from_uri)
            .unwrap_or(DEFAULT_DATABASE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_uri_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[(CRON_SECRET, "s3cret")]));
        assert!(matches!(result, Err(ConfigError::MissingVar(MONGODB_URI))));
    }

    #[test]
    fn test_blank_uri_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[(MONGODB_URI, "   ")]));
        assert!(matches!(result, Err(ConfigError::MissingVar(MONGODB_URI))));
    }

    #[test]
    fn test_optional_values() {
        let config =
            AppConfig::from_lookup(lookup(&[(MONGODB_URI, "mongodb://localhost:27017")])).unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert!(config.database.is_none());
        assert!(config.cron_secret.is_none());
    }

    #[test]
    fn test_database_resolution_order() {
        let config = AppConfig::from_lookup(lookup(&[
            (MONGODB_URI, "mongodb://localhost/site"),
            (MONGODB_DATABASE, "promo"),
        ]))
        .unwrap();
        assert_eq!(config.database_or(Some("site")), "promo");

        let config = AppConfig::from_lookup(lookup(&[(MONGODB_URI, "mongodb://localhost/site")]))
            .unwrap();
        assert_eq!(config.database_or(Some("site")), "site");
        assert_eq!(config.database_or(None), DEFAULT_DATABASE);
    }
}
