// ABOUTME: Main library entry point for the coach nutrition plan editor
// ABOUTME: Wires the plan tree to dirty tracking, atomic saves and client progress polling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coachplan Editor
//!
//! Editing core for a nutrition plan that a coach edits while the client is
//! executing it on another device.
//!
//! ## Features
//!
//! - **Plan tree editing**: days, meals and options addressed by position or stable id
//! - **Unsaved-change tracking**: every mutation marks the document dirty in the same call
//! - **Atomic save**: plan tree, notes and supplementation committed as one request, single-flight
//! - **Progress polling**: cancellable periodic fetch of the client's execution for a date
//!
//! ## Architecture
//!
//! - **Store**: `PlanStore` trait over the coaching REST API, `RestPlanStore` implementation
//! - **Session**: `EditSession` state, `DirtyTracker`, `SaveOrchestrator` and the
//!   `PlanEditor` facade used by the view layer
//! - **Progress**: `ProgressPoller` task and its `PollerHandle`
//! - **Config / logging**: environment-driven configuration and tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use coachplan_editor::config::EditorConfig;
//! use coachplan_editor::errors::AppResult;
//! use coachplan_editor::session::EditorLoader;
//! use coachplan_editor::store::{PlanKey, RestPlanStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = EditorConfig::from_env()?;
//!     let store = Arc::new(RestPlanStore::new(&config.api));
//!     let loader = EditorLoader::new(store, PlanKey::new("client-1", "plan-1"));
//!
//!     let editor = loader.load(chrono::Local::now().date_naive()).await?;
//!     editor.set_notes("Drink 3L of water daily");
//!     editor.save().await?;
//!     Ok(())
//! }
//! ```

// Re-export the core crate modules so callers only depend on this crate
pub use coachplan_core::constants;
pub use coachplan_core::errors;
pub use coachplan_core::models;
pub use coachplan_core::tree;

/// Environment-based configuration
pub mod config;

/// Production logging and structured output
pub mod logging;

/// Client progress polling
pub mod progress;

/// Editing session, dirty tracking, saving and the editor facade
pub mod session;

/// Remote plan store abstraction and REST implementation
pub mod store;
