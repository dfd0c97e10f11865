//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    /// Simulated latency before the mock assistant answers.
    pub reply_delay: Duration,
    /// Delay before the input is focused after opening or switching channel.
    pub focus_delay: Duration,
    pub login_delay: Duration,
    pub demo_email: String,
    pub demo_password: String,
    pub demo_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            allowed_origin: "http://localhost:3000".to_string(),
            reply_delay: Duration::from_millis(1000),
            focus_delay: Duration::from_millis(100),
            login_delay: Duration::from_millis(500),
            demo_email: "student@domain.com".to_string(),
            demo_password: "student123".to_string(),
            demo_name: "Demo User".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        let allowed_origin = lookup("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin);

        // --- Chat Timing ---
        let reply_delay = millis(&lookup, "REPLY_DELAY_MS", defaults.reply_delay)?;
        let focus_delay = millis(&lookup, "FOCUS_DELAY_MS", defaults.focus_delay)?;
        let login_delay = millis(&lookup, "LOGIN_DELAY_MS", defaults.login_delay)?;

        // --- Demo Account ---
        let demo_email = lookup("DEMO_EMAIL").unwrap_or(defaults.demo_email);
        let demo_password = lookup("DEMO_PASSWORD").unwrap_or(defaults.demo_password);
        let demo_name = lookup("DEMO_NAME").unwrap_or(defaults.demo_name);

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            reply_delay,
            focus_delay,
            login_delay,
            demo_email,
            demo_password,
            demo_name,
        })
    }
}

fn millis<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
