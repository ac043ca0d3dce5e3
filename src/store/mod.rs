// ABOUTME: Remote plan store abstraction: client profile, assigned plan, save commit, client progress
// ABOUTME: The editor and poller depend on this trait so transports can be swapped in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::StoreError;
use crate::models::{AssignedPlanPayload, ClientProfile, ProgressSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

/// Shared HTTP client construction
pub mod http_client;
/// REST implementation over the coaching API
pub mod rest;

pub use rest::RestPlanStore;

/// Identifies the plan being edited
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    /// Coaching request / client identifier
    pub client_id: String,
    /// Assigned plan identifier
    pub plan_id: String,
}

impl PlanKey {
    /// Build a key from client and plan identifiers
    pub fn new(client_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            plan_id: plan_id.into(),
        }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client_id, self.plan_id)
    }
}

/// Result of a progress fetch
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressFetch {
    /// The client has a progress record for the date
    Tracked(ProgressSnapshot),
    /// The server has no record for the date (HTTP 404)
    NotStarted,
}

/// Remote persistence for assigned nutrition plans
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Fetch the client profile shown in the editor header
    async fn fetch_client(&self, client_id: &str) -> Result<ClientProfile, StoreError>;

    /// Fetch the assigned plan with its notes and supplementation text
    async fn load_plan(&self, key: &PlanKey) -> Result<AssignedPlanPayload, StoreError>;

    /// Replace the assigned plan, notes and supplementation in one request
    async fn save_plan(&self, key: &PlanKey, payload: &AssignedPlanPayload)
        -> Result<(), StoreError>;

    /// Fetch the client's progress for a date
    async fn fetch_progress(
        &self,
        key: &PlanKey,
        date: NaiveDate,
    ) -> Result<ProgressFetch, StoreError>;
}
