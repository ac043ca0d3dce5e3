// ABOUTME: Load sequence for an editing session: client profile first, then the assigned plan
// ABOUTME: Any failure is a blocking load failure; retry re-runs the whole sequence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::PlanEditor;
use crate::errors::{AppError, AppResult};
use crate::store::{PlanKey, PlanStore};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Loads editing sessions for one plan
pub struct EditorLoader {
    store: Arc<dyn PlanStore>,
    key: PlanKey,
    attempts: AtomicU32,
}

impl EditorLoader {
    /// Create a loader for a client's assigned plan
    #[must_use]
    pub fn new(store: Arc<dyn PlanStore>, key: PlanKey) -> Self {
        Self {
            store,
            key,
            attempts: AtomicU32::new(0),
        }
    }

    /// Number of load attempts so far
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Fetch the client and plan and open an editor on them
    ///
    /// No partial session is ever produced. Calling this again after a
    /// failure is the retry path.
    ///
    /// # Errors
    ///
    /// Returns a `LoadFailed` error if either fetch fails or returns a
    /// non-success payload.
    pub async fn load(&self, today: NaiveDate) -> AppResult<PlanEditor> {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        info!(plan = %self.key, attempt, "Loading plan editor");

        let client = self
            .store
            .fetch_client(&self.key.client_id)
            .await
            .map_err(|e| self.failure("client profile", e.into()))?;
        let payload = self
            .store
            .load_plan(&self.key)
            .await
            .map_err(|e| self.failure("assigned plan", e.into()))?;

        info!(
            plan = %self.key,
            days = payload.plan_data.days.len(),
            "Plan editor ready"
        );
        Ok(PlanEditor::new(
            Arc::clone(&self.store),
            self.key.clone(),
            client,
            &payload,
            today,
        ))
    }

    fn failure(&self, what: &str, error: AppError) -> AppError {
        warn!(plan = %self.key, resource = what, error = %error, "Plan editor load failed");
        error.into_load_failure()
    }
}
