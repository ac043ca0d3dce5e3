// ABOUTME: Configuration module for the plan editor
// ABOUTME: Re-exports environment-driven API, polling and deployment settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: API endpoint, credentials, HTTP timeouts and polling cadence

/// Environment and editor configuration
pub mod environment;

pub use environment::{parse_base_url, ApiConfig, EditorConfig, Environment, PollingConfig};
