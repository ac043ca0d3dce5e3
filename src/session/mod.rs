// ABOUTME: Editing session state: working plan, side channels, dirty/saving flags, selection
// ABOUTME: Keeps the last saved baseline so discard can restore it and selection stays in range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Editing session
//!
//! The session is shared between the [`PlanEditor`] facade and the
//! [`SaveOrchestrator`] behind a single mutex. Mutations only happen through
//! the facade, which marks the [`DirtyTracker`] inside the same lock scope.

use crate::models::{AssignedPlanPayload, ClientProfile};
use crate::tree::PlanTree;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Unsaved-change tracking
pub mod dirty;
/// View-facing editing facade
pub mod editor;
/// Load sequence with retry
pub mod loader;
/// Atomic single-flight save
pub mod save;

pub use dirty::DirtyTracker;
pub use editor::PlanEditor;
pub use loader::EditorLoader;
pub use save::{SaveOrchestrator, SaveOutcome};

/// Session state shared between the facade and the save orchestrator
pub type SharedSession = Arc<Mutex<EditSession>>;

/// Lock the session, recovering the state if a previous holder panicked
pub(crate) fn lock_session(session: &Mutex<EditSession>) -> MutexGuard<'_, EditSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Last successfully saved (or loaded) values
#[derive(Debug, Clone)]
struct Baseline {
    tree: PlanTree,
    notes: String,
    supplementation: String,
}

/// State captured when a save starts
#[derive(Debug)]
pub(crate) struct PendingSave {
    pub(crate) revision: u64,
    pub(crate) payload: AssignedPlanPayload,
    baseline: Baseline,
}

/// Mutable state of one editing session
#[derive(Debug)]
pub struct EditSession {
    client: ClientProfile,
    tree: PlanTree,
    notes: String,
    supplementation: String,
    tracker: DirtyTracker,
    saving: bool,
    selected_day: Option<usize>,
    selected_date: NaiveDate,
    baseline: Baseline,
}

impl EditSession {
    /// Start a session from a loaded payload
    #[must_use]
    pub fn new(client: ClientProfile, payload: &AssignedPlanPayload, today: NaiveDate) -> Self {
        let tree = PlanTree::from_document(&payload.plan_data);
        let selected_day = (tree.day_count() > 0).then_some(0);
        let baseline = Baseline {
            tree: tree.clone(),
            notes: payload.notes.clone(),
            supplementation: payload.supplementation.clone(),
        };
        Self {
            client,
            tree,
            notes: payload.notes.clone(),
            supplementation: payload.supplementation.clone(),
            tracker: DirtyTracker::new(),
            saving: false,
            selected_day,
            selected_date: today,
            baseline,
        }
    }

    /// Client shown in the editor header
    #[must_use]
    pub const fn client(&self) -> &ClientProfile {
        &self.client
    }

    /// Working copy of the plan
    #[must_use]
    pub const fn tree(&self) -> &PlanTree {
        &self.tree
    }

    /// Trainer notes
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Supplementation text
    #[must_use]
    pub fn supplementation(&self) -> &str {
        &self.supplementation
    }

    /// Whether there are unsaved changes
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Whether a save is in flight
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Selected day index, `None` when the plan has no days
    #[must_use]
    pub const fn selected_day(&self) -> Option<usize> {
        self.selected_day
    }

    /// Date whose progress is displayed
    #[must_use]
    pub const fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Whether the working values equal the last saved ones
    #[must_use]
    pub fn matches_baseline(&self) -> bool {
        self.tree == self.baseline.tree
            && self.notes == self.baseline.notes
            && self.supplementation == self.baseline.supplementation
    }

    /// Wire payload for the current working values
    #[must_use]
    pub fn payload(&self) -> AssignedPlanPayload {
        AssignedPlanPayload {
            plan_data: self.tree.to_document(),
            notes: self.notes.clone(),
            supplementation: self.supplementation.clone(),
        }
    }

    pub(crate) const fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    pub(crate) fn tree_mut(&mut self) -> &mut PlanTree {
        &mut self.tree
    }

    pub(crate) fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }

    pub(crate) fn supplementation_mut(&mut self) -> &mut String {
        &mut self.supplementation
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.tracker.mark_dirty();
        self.clamp_selection();
    }

    /// Claim the in-flight slot; false if a save is already running
    pub(crate) fn begin_save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.saving = true;
        true
    }

    pub(crate) fn end_save(&mut self) {
        self.saving = false;
    }

    /// Capture what a save will send, together with the current revision
    pub(crate) fn prepare_save(&self) -> PendingSave {
        PendingSave {
            revision: self.tracker.revision(),
            payload: self.payload(),
            baseline: Baseline {
                tree: self.tree.clone(),
                notes: self.notes.clone(),
                supplementation: self.supplementation.clone(),
            },
        }
    }

    /// Record a confirmed write of a prepared save
    ///
    /// The baseline always moves to what the server now holds. The dirty flag
    /// is cleared only when no edit landed while the write was in flight.
    pub(crate) fn confirm_saved(&mut self, pending: PendingSave) -> bool {
        self.baseline = pending.baseline;
        self.tracker.clear_if_unchanged(pending.revision)
    }

    /// Throw away unsaved edits and return to the last saved values
    pub(crate) fn restore_baseline(&mut self) {
        self.tree = self.baseline.tree.clone();
        self.notes = self.baseline.notes.clone();
        self.supplementation = self.baseline.supplementation.clone();
        self.tracker.clear();
        self.clamp_selection();
    }

    pub(crate) fn select_day(&mut self, day_index: usize) -> bool {
        if day_index >= self.tree.day_count() {
            return false;
        }
        self.selected_day = Some(day_index);
        true
    }

    pub(crate) fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.selected_date == date {
            return false;
        }
        self.selected_date = date;
        true
    }

    /// Keep the selected day valid after the day list changed
    fn clamp_selection(&mut self) {
        let count = self.tree.day_count();
        self.selected_day = match (count, self.selected_day) {
            (0, _) => None,
            (_, None) => Some(0),
            (count, Some(index)) => Some(index.min(count - 1)),
        };
    }
}
