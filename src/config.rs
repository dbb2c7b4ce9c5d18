use std::env;
use std::net::SocketAddr;

use tracing::info;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://feedback.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    /// Single connection string for the feedback database.
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Re-run form validation on the server before inserting.
    pub strict_validation: bool,
}

impl Config {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            info!("DATABASE_URL not set, using default: {}", DEFAULT_DATABASE_URL);
            DEFAULT_DATABASE_URL.to_string()
        });

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("invalid BIND_ADDR: {}", e)))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config(format!("invalid DB_MAX_CONNECTIONS: {:?}", raw)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let strict_validation = match lookup("FEEDBACK_STRICT_VALIDATION") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("invalid FEEDBACK_STRICT_VALIDATION: {:?}", raw))
            })?,
            None => false,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            strict_validation,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(!config.strict_validation);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("FEEDBACK_STRICT_VALIDATION", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 2);
        assert!(config.strict_validation);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(load(&[("BIND_ADDR", "nowhere")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("DB_MAX_CONNECTIONS", "0")]), Err(AppError::Config(_))));
        assert!(matches!(
            load(&[("FEEDBACK_STRICT_VALIDATION", "maybe")]),
            Err(AppError::Config(_))
        ));
    }
}
