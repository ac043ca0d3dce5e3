// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: One pooled reqwest client per process, configured from the editor's API settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::ApiConfig;
use crate::constants::http;
use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Global shared HTTP client
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared client from API settings
///
/// Only the first call configures the client; later calls are ignored.
pub fn initialize_shared_client(config: &ApiConfig) {
    if SHARED_CLIENT
        .set(create_client_with_timeout(config.timeout, config.connect_timeout))
        .is_ok()
    {
        debug!(
            timeout_secs = config.timeout.as_secs(),
            connect_timeout_secs = config.connect_timeout.as_secs(),
            "Shared HTTP client initialized"
        );
    }
}

/// Get the shared HTTP client, creating it with default timeouts if needed
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        create_client_with_timeout(
            Duration::from_secs(http::DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(http::DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    })
}

/// Create a new HTTP client with custom timeout settings
#[must_use]
pub fn create_client_with_timeout(timeout: Duration, connect_timeout: Duration) -> Client {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .user_agent(concat!("coachplan-editor/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
}
