//! Application configuration.
//!
//! Every value is resolved with the priority `config.toml` > environment
//! (`.env` is loaded first) > built-in default.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::paths;

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 5000;

/// Minutes after local midnight during which the daily reset may run
pub const RESET_WINDOW_MINUTES: u32 = 5;

/// Seconds between checks for the reset window
pub const RESET_CHECK_INTERVAL_SECS: u64 = 3600;

/// Seconds before retrying a failed reset inside the window
pub const RESET_RETRY_SECS: u64 = 60;

/// Default length of the stats history
pub const STATS_HISTORY_DAYS: u32 = 30;

/// Longest stats history a client may request
pub const STATS_HISTORY_MAX_DAYS: u32 = 365;

// ==================== config.toml ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
    reset: Option<ResetSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct ResetSection {
    window_minutes: Option<u32>,
    check_interval_secs: Option<u64>,
    retry_secs: Option<u64>,
    utc_offset_minutes: Option<i32>,
}

// ==================== Resolved configuration ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfig {
    pub window_minutes: u32,
    pub check_interval: Duration,
    pub retry_delay: Duration,
    /// Offset east of UTC defining the local day; None uses the system zone
    pub utc_offset_minutes: Option<i32>,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            window_minutes: RESET_WINDOW_MINUTES,
            check_interval: Duration::from_secs(RESET_CHECK_INTERVAL_SECS),
            retry_delay: Duration::from_secs(RESET_RETRY_SECS),
            utc_offset_minutes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub server: ServerConfig,
    pub reset: ResetConfig,
}

impl AppConfig {
    /// Load from `config.toml` in the working directory and the process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let contents = std::fs::read_to_string("config.toml").ok();
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from the file contents and an environment lookup
    pub fn from_sources(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match file.map(toml::from_str::<FileConfig>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("Ignoring unreadable config.toml: {}", e);
                FileConfig::default()
            }
            None => FileConfig::default(),
        };
        let database = file.database.unwrap_or_default();
        let server = file.server.unwrap_or_default();
        let reset = file.reset.unwrap_or_default();

        let database_path = match database.path {
            Some(path) => {
                tracing::info!("Using database from config.toml: {}", path);
                PathBuf::from(path)
            }
            None => match env("DATABASE_PATH") {
                Some(path) => {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                }
                None => {
                    let default = paths::default_db_path();
                    tracing::info!("Using default database path: {}", default.display());
                    default
                }
            },
        };

        let server = ServerConfig {
            addr: server
                .addr
                .or_else(|| env("SERVER_ADDR"))
                .unwrap_or_else(|| SERVER_ADDR.to_string()),
            port: server
                .port
                .or_else(|| parse_env(&env, "PORT"))
                .unwrap_or(SERVER_PORT),
        };

        let reset = ResetConfig {
            window_minutes: reset
                .window_minutes
                .or_else(|| parse_env(&env, "RESET_WINDOW_MINUTES"))
                .unwrap_or(RESET_WINDOW_MINUTES),
            check_interval: Duration::from_secs(
                reset
                    .check_interval_secs
                    .or_else(|| parse_env(&env, "RESET_CHECK_INTERVAL_SECS"))
                    .unwrap_or(RESET_CHECK_INTERVAL_SECS)
                    .max(1),
            ),
            retry_delay: Duration::from_secs(
                reset
                    .retry_secs
                    .or_else(|| parse_env(&env, "RESET_RETRY_SECS"))
                    .unwrap_or(RESET_RETRY_SECS)
                    .max(1),
            ),
            utc_offset_minutes: reset
                .utc_offset_minutes
                .or_else(|| parse_env(&env, "RESET_UTC_OFFSET_MINUTES")),
        };

        Self {
            database_path,
            server,
            reset,
        }
    }
}

fn parse_env<T: FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(None, env_of(&[]));
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.reset, ResetConfig::default());
        assert!(config.database_path.ends_with("vocab.db"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_of(&[
            ("DATABASE_PATH", "/tmp/words.db"),
            ("PORT", "8080"),
            ("RESET_WINDOW_MINUTES", "10"),
            ("RESET_UTC_OFFSET_MINUTES", "420"),
        ]);
        let config = AppConfig::from_sources(None, env);
        assert_eq!(config.database_path, PathBuf::from("/tmp/words.db"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.reset.window_minutes, 10);
        assert_eq!(config.reset.utc_offset_minutes, Some(420));
    }

    #[test]
    fn test_file_overrides_env() {
        let file = r#"
            [database]
            path = "from-file.db"

            [server]
            port = 7000

            [reset]
            check_interval_secs = 600
        "#;
        let env = env_of(&[("DATABASE_PATH", "from-env.db"), ("PORT", "8080")]);
        let config = AppConfig::from_sources(Some(file), env);
        assert_eq!(config.database_path, PathBuf::from("from-file.db"));
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.reset.check_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let env = env_of(&[("PORT", "not-a-port"), ("RESET_CHECK_INTERVAL_SECS", "0")]);
        let config = AppConfig::from_sources(Some("this is not toml ["), env);
        assert_eq!(config.server.port, SERVER_PORT);
        // A zero interval would spin the scheduler
        assert_eq!(config.reset.check_interval, Duration::from_secs(1));
    }
}
