// ABOUTME: Unified error type, error codes and presentation policy for the plan editor
// ABOUTME: Every fallible editor operation returns AppResult so callers see one error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Standard error codes, the `AppError` carrier and the mapping from an error
//! to how the editor surfaces it (blocking fault, inline message, or a
//! placeholder).

/// Transport-level errors raised while talking to the remote plan store
pub mod store;

pub use store::StoreError;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "RESOURCE_LOCKED")]
    ResourceLocked = 4002,

    // Session lifecycle (4500-4599)
    #[serde(rename = "LOAD_FAILED")]
    LoadFailed = 4500,
    #[serde(rename = "SAVE_FAILED")]
    SaveFailed = 4501,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// HTTP status code a server would have used for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidFormat => 400,
            Self::ExternalAuthFailed => 401,
            Self::ResourceNotFound => 404,
            Self::ResourceLocked => 409,
            Self::LoadFailed
            | Self::SaveFailed
            | Self::ExternalServiceError
            | Self::ExternalServiceUnavailable => 502,
            Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// User-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceLocked => "The resource is busy and cannot be modified right now",
            Self::LoadFailed => "The plan could not be loaded",
            Self::SaveFailed => "Your changes could not be saved",
            Self::ExternalServiceError => "The plan service encountered an error",
            Self::ExternalServiceUnavailable => "The plan service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with the plan service failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// How the view layer should surface an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Page-level fault state; editing is impossible until a full reload succeeds
    Blocking,
    /// Non-blocking message next to the affordance that failed
    Inline,
    /// No message at all, the affected panel shows a placeholder instead
    Placeholder,
}

/// Unified error type for the editor
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// How this error should be shown to the coach
    #[must_use]
    pub const fn presentation(&self) -> ErrorPresentation {
        match self.code {
            ErrorCode::LoadFailed
            | ErrorCode::ConfigError
            | ErrorCode::ConfigMissing
            | ErrorCode::ConfigInvalid => ErrorPresentation::Blocking,
            _ => ErrorPresentation::Inline,
        }
    }

    /// Input validation failed
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// The initial client or plan fetch failed
    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LoadFailed, message)
    }

    /// The save commit failed
    pub fn save_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SaveFailed, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration is missing
    pub fn config_missing(key: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{} is not set", key.into()),
        )
    }

    /// Configuration is present but invalid
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Re-tag an error as a load failure, keeping the original message
    #[must_use]
    pub fn into_load_failure(self) -> Self {
        Self {
            code: ErrorCode::LoadFailed,
            message: self.message,
            source: self.source,
        }
    }

    /// Re-tag an error as a save failure, keeping the original message
    #[must_use]
    pub fn into_save_failure(self) -> Self {
        Self {
            code: ErrorCode::SaveFailed,
            message: self.message,
            source: self.source,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
