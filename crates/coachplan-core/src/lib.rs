// ABOUTME: Core domain types for the coach nutrition plan editor
// ABOUTME: Foundation crate with the plan tree, wire documents, errors and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coachplan Core
//!
//! I/O-free foundation for the plan editor. Everything here is synchronous and
//! owns no tasks or connections, so it can be reused by any front end that
//! edits an assigned nutrition plan.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and transport errors
//! - **constants**: Defaults and user-facing placeholder messages
//! - **models**: Wire documents, nutrition values, dietary vocabulary, progress snapshots
//! - **tree**: The editable plan tree (days, meals, options) with id-based addressing

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Wire documents and value types shared with the remote store
pub mod models;

/// Editable plan tree with stable identifiers
pub mod tree;
