// ABOUTME: Constants for the plan editor organized by domain
// ABOUTME: Store paths, polling defaults, placeholder messages and env variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Pure data constants grouped by domain.

/// Remote store path segments
pub mod routes {
    /// Root collection of coaching requests (one per client)
    pub const COACHING_REQUESTS: &str = "coaching-requests";
    /// Assigned plan sub-resource
    pub const ASSIGNED_PLAN: &str = "assigned-nutrition-plan";
    /// Client progress sub-resource of an assigned plan
    pub const CLIENT_PROGRESS: &str = "client-progress";
    /// Query parameter carrying the ISO date for progress lookups
    pub const DATE_QUERY_PARAM: &str = "date";
}

/// Progress polling
pub mod polling {
    /// Period between automatic progress fetches
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
    /// Pending manual refresh requests kept by the poller
    pub const REFRESH_CHANNEL_CAPACITY: usize = 4;
}

/// Timeouts for the shared HTTP client
pub mod http {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Maximum number of response body bytes kept in an error
    pub const ERROR_BODY_LIMIT: usize = 512;
}

/// User-facing placeholder messages
pub mod messages {
    /// Shown when the client has not logged anything for the selected date
    pub const NOT_TRACKED_YET: &str = "The client has not started tracking this day yet.";
    /// Shown when progress could not be fetched for any other reason
    pub const PROGRESS_UNAVAILABLE: &str = "Client progress is unavailable right now.";
    /// Shown while the first fetch for a date is in flight
    pub const PROGRESS_LOADING: &str = "Loading client progress...";
}

/// Plan tree defaults
pub mod tree {
    /// Sort key used for meals without a scheduled time
    pub const MISSING_TIME_SORT_KEY: &str = "00:00";
    /// Separator used when ingredients are edited as a single text field
    pub const INGREDIENT_SEPARATOR: char = ',';
    /// Separator used when ingredients are rendered back into the text field
    pub const INGREDIENT_JOIN: &str = ", ";
    /// Name given to days created without an explicit name
    pub const DEFAULT_DAY_PREFIX: &str = "Day";
}

/// Environment variable names
pub mod env_config {
    /// Base URL of the plan store REST API
    pub const API_BASE_URL: &str = "COACHPLAN_API_BASE_URL";
    /// Bearer token forwarded on every request
    pub const API_TOKEN: &str = "COACHPLAN_API_TOKEN";
    /// Request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "COACHPLAN_HTTP_TIMEOUT_SECS";
    /// Connection timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "COACHPLAN_HTTP_CONNECT_TIMEOUT_SECS";
    /// Progress polling period in seconds
    pub const POLL_INTERVAL_SECS: &str = "COACHPLAN_POLL_INTERVAL_SECS";
    /// Whether progress polling starts in automatic mode
    pub const AUTO_POLL: &str = "COACHPLAN_AUTO_POLL";
}

/// Service identity used in logs
pub mod service_names {
    /// Name of the editor service
    pub const PLAN_EDITOR: &str = "coachplan-editor";
}
