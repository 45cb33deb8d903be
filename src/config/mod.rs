//! Configuration module for the guestbook backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Guestbook used when a request names none.
pub const DEFAULT_GUESTBOOK_NAME: &str = "default_guestbook";

/// Number of greetings shown on the guestbook page.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Invalid value in an environment variable.
#[derive(Debug)]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.var, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log line format
    pub log_format: LogFormat,
    /// Guestbook name used when the query parameter is missing or empty
    pub default_guestbook: String,
    /// How many greetings `GET /` returns
    pub recent_limit: u32,
    /// Upper bound on pooled store connections
    pub db_max_connections: u32,
    /// Per-request timeout applied by the HTTP stack
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("GUESTBOOK_DB_PATH")
            .unwrap_or_else(|_| "./data/guestbook.sqlite".to_string())
            .into();

        let bind_addr = parse_var("GUESTBOOK_BIND_ADDR", "127.0.0.1:8080")?;

        let log_level = env::var("GUESTBOOK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = parse_var("GUESTBOOK_LOG_FORMAT", "pretty")?;

        let default_guestbook = env::var("GUESTBOOK_DEFAULT_NAME")
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_GUESTBOOK_NAME.to_string());

        let recent_limit: u32 =
            parse_var("GUESTBOOK_RECENT_LIMIT", &DEFAULT_RECENT_LIMIT.to_string())?;
        if recent_limit == 0 {
            return Err(ConfigError {
                var: "GUESTBOOK_RECENT_LIMIT",
                message: "must be positive".to_string(),
            });
        }

        let db_max_connections = parse_var("GUESTBOOK_DB_MAX_CONNECTIONS", "5")?;
        let timeout_secs: u64 = parse_var("GUESTBOOK_REQUEST_TIMEOUT_SECS", "30")?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            default_guestbook,
            recent_limit,
            db_max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>().map_err(|e| ConfigError {
        var,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("GUESTBOOK_DB_PATH");
        env::remove_var("GUESTBOOK_BIND_ADDR");
        env::remove_var("GUESTBOOK_LOG_LEVEL");
        env::remove_var("GUESTBOOK_LOG_FORMAT");
        env::remove_var("GUESTBOOK_DEFAULT_NAME");
        env::remove_var("GUESTBOOK_RECENT_LIMIT");
        env::remove_var("GUESTBOOK_DB_MAX_CONNECTIONS");
        env::remove_var("GUESTBOOK_REQUEST_TIMEOUT_SECS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/guestbook.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.default_guestbook, "default_guestbook");
        assert_eq!(config.recent_limit, DEFAULT_RECENT_LIMIT);
        assert_eq!(DEFAULT_RECENT_LIMIT, 10);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_var_reports_variable() {
        let err = parse_var::<u32>("GUESTBOOK_TEST_UNSET_VAR", "not-a-number").unwrap_err();
        assert_eq!(err.var, "GUESTBOOK_TEST_UNSET_VAR");
        assert!(err.to_string().starts_with("invalid GUESTBOOK_TEST_UNSET_VAR"));
    }
}
