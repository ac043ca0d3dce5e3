// ABOUTME: Transport errors for the remote plan store (request, status, decode failures)
// ABOUTME: Converts into AppError so editor operations keep a single error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by a `PlanStore` implementation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The request never produced a response (DNS, connect, timeout, TLS)
    #[error("request to {endpoint} failed: {reason}")]
    RequestFailed {
        /// Endpoint path that was being called
        endpoint: String,
        /// Transport-level failure description
        reason: String,
    },

    /// The server answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    UnexpectedStatus {
        /// Endpoint path that was being called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, truncated, if one was readable
        body: Option<String>,
    },

    /// The response body did not match the expected wire shape
    #[error("could not decode response from {endpoint}: {reason}")]
    Decode {
        /// Endpoint path that was being called
        endpoint: String,
        /// Decoder error
        reason: String,
    },

    /// The server answered 2xx but flagged the payload as unsuccessful
    #[error("{endpoint} rejected the request: {message}")]
    Rejected {
        /// Endpoint path that was being called
        endpoint: String,
        /// Message carried by the response envelope
        message: String,
    },

    /// A request URL could not be built from the configured base URL
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    /// Whether the server reported the resource as missing
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status: 404, .. })
    }

    /// HTTP status if the server answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        let code = match &error {
            StoreError::RequestFailed { .. } => ErrorCode::ExternalServiceUnavailable,
            StoreError::UnexpectedStatus { status: 401 | 403, .. } => {
                ErrorCode::ExternalAuthFailed
            }
            StoreError::UnexpectedStatus { status: 404, .. } => ErrorCode::ResourceNotFound,
            StoreError::UnexpectedStatus { .. } | StoreError::Rejected { .. } => {
                ErrorCode::ExternalServiceError
            }
            StoreError::Decode { .. } => ErrorCode::SerializationError,
            StoreError::InvalidUrl(_) => ErrorCode::ConfigInvalid,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
