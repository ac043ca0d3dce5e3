// ABOUTME: Environment-driven configuration tests for the editor
// ABOUTME: Runs serially because every case mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use coachplan_editor::config::{EditorConfig, Environment};
use coachplan_editor::constants::env_config;
use coachplan_editor::errors::{ErrorCode, ErrorPresentation};
use coachplan_editor::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;
use std::time::Duration;

const KEYS: &[&str] = &[
    env_config::API_BASE_URL,
    env_config::API_TOKEN,
    env_config::HTTP_TIMEOUT_SECS,
    env_config::HTTP_CONNECT_TIMEOUT_SECS,
    env_config::POLL_INTERVAL_SECS,
    env_config::AUTO_POLL,
    "ENVIRONMENT",
    "LOG_FORMAT",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_missing_base_url_is_blocking() {
    clear_env();
    let error = EditorConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigMissing);
    assert_eq!(error.presentation(), ErrorPresentation::Blocking);
    assert!(error.message.contains(env_config::API_BASE_URL));
}

#[test]
#[serial]
fn test_invalid_base_url_is_rejected() {
    clear_env();
    env::set_var(env_config::API_BASE_URL, "ftp://files.example.com");
    let error = EditorConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    clear_env();
}

#[test]
#[serial]
fn test_defaults_apply_with_only_base_url() {
    clear_env();
    env::set_var(env_config::API_BASE_URL, "https://coach.example.com/api/");

    let config = EditorConfig::from_env().unwrap();
    assert_eq!(config.api.base_url.as_str(), "https://coach.example.com/api/");
    assert!(config.api.token.is_none());
    assert_eq!(config.api.timeout, Duration::from_secs(30));
    assert_eq!(config.polling.interval, Duration::from_secs(30));
    assert!(config.polling.auto_start);
    assert_eq!(config.environment, Environment::Development);
    clear_env();
}

#[test]
#[serial]
fn test_malformed_numbers_fall_back_to_defaults() {
    clear_env();
    env::set_var(env_config::API_BASE_URL, "http://localhost:8081");
    env::set_var(env_config::HTTP_TIMEOUT_SECS, "soon");
    env::set_var(env_config::POLL_INTERVAL_SECS, "0");

    let config = EditorConfig::from_env().unwrap();
    assert_eq!(config.api.timeout, Duration::from_secs(30));
    assert_eq!(config.polling.interval, Duration::from_secs(30));
    clear_env();
}

#[test]
#[serial]
fn test_overrides_are_read() {
    clear_env();
    env::set_var(env_config::API_BASE_URL, "https://coach.example.com");
    env::set_var(env_config::API_TOKEN, "coach-token");
    env::set_var(env_config::POLL_INTERVAL_SECS, "45");
    env::set_var(env_config::AUTO_POLL, "off");
    env::set_var("ENVIRONMENT", "production");

    let config = EditorConfig::from_env().unwrap();
    assert_eq!(config.api.token.as_deref(), Some("coach-token"));
    assert_eq!(config.polling.interval, Duration::from_secs(45));
    assert!(!config.polling.auto_start);
    assert!(config.environment.is_production());
    assert!(!format!("{:?}", config.api).contains("coach-token"));
    clear_env();
}

#[test]
#[serial]
fn test_unknown_auto_poll_value_keeps_default() {
    clear_env();
    env::set_var(env_config::API_BASE_URL, "https://coach.example.com");
    env::set_var(env_config::AUTO_POLL, "sometimes");

    let config = EditorConfig::from_env().unwrap();
    assert!(config.polling.auto_start);
    clear_env();
}

#[test]
#[serial]
fn test_logging_format_from_env() {
    clear_env();
    env::set_var("LOG_FORMAT", "json");
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Json);

    env::set_var("LOG_FORMAT", "unknown");
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Pretty);
    clear_env();
}
