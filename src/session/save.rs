// ABOUTME: Atomic single-flight save of the plan tree and its notes/supplementation side channels
// ABOUTME: Holds the saving flag through an RAII guard so failures and cancellation always release it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{lock_session, SharedSession};
use crate::errors::{AppError, AppResult};
use crate::store::{PlanKey, PlanStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Result of a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The write succeeded and the document is clean
    Saved,
    /// The write succeeded but edits made during the write are still unsaved
    SavedWithPendingEdits,
    /// Another save was in flight, no request was issued
    AlreadySaving,
}

impl SaveOutcome {
    /// Whether this call issued a successful write
    #[must_use]
    pub const fn wrote(&self) -> bool {
        matches!(self, Self::Saved | Self::SavedWithPendingEdits)
    }
}

/// Releases the in-flight flag when the save finishes, fails or is dropped
struct SavingGuard {
    session: SharedSession,
}

impl Drop for SavingGuard {
    fn drop(&mut self) {
        lock_session(&self.session).end_save();
    }
}

/// Commits the working plan, notes and supplementation as one request
#[derive(Clone)]
pub struct SaveOrchestrator {
    session: SharedSession,
    store: Arc<dyn PlanStore>,
    key: PlanKey,
}

impl SaveOrchestrator {
    /// Create an orchestrator for a session
    #[must_use]
    pub fn new(session: SharedSession, store: Arc<dyn PlanStore>, key: PlanKey) -> Self {
        Self {
            session,
            store,
            key,
        }
    }

    /// Save the current working state
    ///
    /// A call made while another save is pending returns
    /// [`SaveOutcome::AlreadySaving`] without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns a `SaveFailed` error if the store rejects or cannot reach the
    /// write. The document stays dirty and a later call may retry.
    pub async fn save(&self) -> AppResult<SaveOutcome> {
        let (guard, pending) = {
            let mut session = lock_session(&self.session);
            if !session.begin_save() {
                info!(plan = %self.key, "Save already in flight, ignoring request");
                return Ok(SaveOutcome::AlreadySaving);
            }
            let guard = SavingGuard {
                session: Arc::clone(&self.session),
            };
            (guard, session.prepare_save())
        };

        let started = Instant::now();
        let result = self.store.save_plan(&self.key, &pending.payload).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(()) => {
                let revision = pending.revision;
                let clean = lock_session(&self.session).confirm_saved(pending);
                info!(
                    plan = %self.key,
                    revision,
                    clean,
                    duration_ms,
                    "Plan saved"
                );
                if clean {
                    SaveOutcome::Saved
                } else {
                    SaveOutcome::SavedWithPendingEdits
                }
            }
            Err(error) => {
                warn!(
                    plan = %self.key,
                    duration_ms,
                    error = %error,
                    "Plan save failed, changes remain unsaved"
                );
                return Err(AppError::from(error).into_save_failure());
            }
        };
        drop(guard);
        Ok(outcome)
    }

    /// Drop unsaved edits and return to the last saved state
    ///
    /// Ignored while a save is in flight, since the outcome of that write
    /// decides what the saved state is.
    pub fn discard(&self) -> bool {
        let mut session = lock_session(&self.session);
        if session.is_saving() {
            warn!(plan = %self.key, "Discard requested during save, ignoring");
            return false;
        }
        let had_changes = session.is_dirty();
        session.restore_baseline();
        info!(plan = %self.key, had_changes, "Unsaved changes discarded");
        true
    }
}
