// ABOUTME: Environment configuration for the plan editor: API endpoint, credentials, timeouts, polling
// ABOUTME: Reads COACHPLAN_* variables, falling back to defaults for malformed optional values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::constants::{env_config, http, polling};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Deployment environment, used to pick logging defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Test runs
    Testing,
    /// Production deployment
    Production,
}

impl Environment {
    /// Parse from string with fallback to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Whether this is a production deployment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Testing => write!(f, "testing"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Connection settings for the coaching REST API
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl ApiConfig {
    /// Build an API config with default timeouts and no token
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(http::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(http::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Attach a bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Client progress polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Period between automatic fetches
    pub interval: Duration,
    /// Start the poller in automatic mode
    pub auto_start: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(polling::DEFAULT_POLL_INTERVAL_SECS),
            auto_start: true,
        }
    }
}

/// Top-level editor configuration
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// REST API connection
    pub api: ApiConfig,
    /// Progress polling
    pub polling: PollingConfig,
    /// Deployment environment
    pub environment: Environment,
}

impl EditorConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is missing or not a valid absolute URL
    pub fn from_env() -> AppResult<Self> {
        let raw_url = env::var(env_config::API_BASE_URL)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::config_missing(env_config::API_BASE_URL))?;
        let base_url = parse_base_url(&raw_url)?;

        let api = ApiConfig {
            base_url,
            token: env::var(env_config::API_TOKEN)
                .ok()
                .filter(|token| !token.trim().is_empty()),
            timeout: Duration::from_secs(parse_env_or(
                env_config::HTTP_TIMEOUT_SECS,
                http::DEFAULT_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(parse_env_or(
                env_config::HTTP_CONNECT_TIMEOUT_SECS,
                http::DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        };

        let interval_secs = match parse_env_or(
            env_config::POLL_INTERVAL_SECS,
            polling::DEFAULT_POLL_INTERVAL_SECS,
        ) {
            0 => {
                warn!(
                    key = env_config::POLL_INTERVAL_SECS,
                    "Poll interval must be positive, using default"
                );
                polling::DEFAULT_POLL_INTERVAL_SECS
            }
            secs => secs,
        };
        let polling = PollingConfig {
            interval: Duration::from_secs(interval_secs),
            auto_start: parse_flag_or(env_config::AUTO_POLL, true),
        };

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            api,
            polling,
            environment,
        };
        config.summary();
        Ok(config)
    }

    /// Log a one-line summary of the loaded configuration
    pub fn summary(&self) {
        info!(
            api.base_url = %self.api.base_url,
            api.authenticated = self.api.token.is_some(),
            api.timeout_secs = self.api.timeout.as_secs(),
            polling.interval_secs = self.polling.interval.as_secs(),
            polling.auto_start = self.polling.auto_start,
            environment = %self.environment,
            "Editor configuration loaded"
        );
    }
}

/// Parse and validate the API base URL
///
/// # Errors
///
/// Returns `ConfigInvalid` when the value is not an absolute http(s) URL
pub fn parse_base_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        AppError::config_invalid(format!("{}: {e}", env_config::API_BASE_URL)).with_source(e)
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(AppError::config_invalid(format!(
            "{} must be an http(s) URL, got {raw}",
            env_config::API_BASE_URL
        )));
    }
    Ok(url)
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, keeping the default when unset or malformed
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parse a boolean flag accepting true/false, 1/0, yes/no, on/off
fn parse_flag_or(key: &str, default: bool) -> bool {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!(key, value = %raw, default, "Invalid flag, using default");
            default
        }
    }
}
