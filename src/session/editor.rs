// ABOUTME: PlanEditor facade: the only mutation surface for the view layer
// ABOUTME: Every applied tree or side-channel edit marks the session dirty inside the same lock scope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::save::{SaveOrchestrator, SaveOutcome};
use super::{lock_session, EditSession, SharedSession};
use crate::config::PollingConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{
    AssignedPlanPayload, ClientProfile, DietaryTag, MacroTargets, MealDocument, OptionDocument,
};
use crate::progress::{PollerHandle, ProgressDisplay, ProgressPoller};
use crate::store::{PlanKey, PlanStore};
use crate::tree::{DayField, DayId, MealField, MealId, OptionField, OptionId, PlanTree};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info};

/// Whether a tree operation actually changed something
trait Applied {
    fn applied(&self) -> bool;
}

impl Applied for bool {
    fn applied(&self) -> bool {
        *self
    }
}

impl<T> Applied for Option<T> {
    fn applied(&self) -> bool {
        self.is_some()
    }
}

/// Editing surface used by the view layer
///
/// Position-addressed operations are no-ops returning `false`/`None` when an
/// index is out of range; they never panic. Id-addressed variants exist for
/// callers that hold handles across inserts and removals.
pub struct PlanEditor {
    session: SharedSession,
    saver: SaveOrchestrator,
    store: Arc<dyn PlanStore>,
    key: PlanKey,
    poller: Option<PollerHandle>,
}

impl std::fmt::Debug for PlanEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanEditor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PlanEditor {
    /// Build an editor over a freshly loaded plan
    #[must_use]
    pub fn new(
        store: Arc<dyn PlanStore>,
        key: PlanKey,
        client: ClientProfile,
        payload: &AssignedPlanPayload,
        today: NaiveDate,
    ) -> Self {
        let session = Arc::new(Mutex::new(EditSession::new(client, payload, today)));
        let saver = SaveOrchestrator::new(Arc::clone(&session), Arc::clone(&store), key.clone());
        Self {
            session,
            saver,
            store,
            key,
            poller: None,
        }
    }

    /// Apply a tree mutation and mark dirty when it took effect
    fn mutate<R: Applied>(
        &self,
        operation: &'static str,
        edit: impl FnOnce(&mut PlanTree) -> R,
    ) -> R {
        let mut session = lock_session(&self.session);
        let result = edit(session.tree_mut());
        if result.applied() {
            session.mark_dirty();
        } else {
            debug!(operation, plan = %self.key, "Edit did not match any element");
        }
        result
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Run a closure against the current session state
    pub fn read<R>(&self, view: impl FnOnce(&EditSession) -> R) -> R {
        let session = lock_session(&self.session);
        view(&session)
    }

    /// Clone of the working plan
    #[must_use]
    pub fn tree(&self) -> PlanTree {
        self.read(|session| session.tree().clone())
    }

    /// Identifies the plan being edited
    #[must_use]
    pub const fn key(&self) -> &PlanKey {
        &self.key
    }

    /// Client shown in the header
    #[must_use]
    pub fn client(&self) -> ClientProfile {
        self.read(|session| session.client().clone())
    }

    /// Whether there are unsaved changes
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.read(EditSession::is_dirty)
    }

    /// Whether a save is in flight
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.read(EditSession::is_saving)
    }

    /// Watch the unsaved-changes flag
    #[must_use]
    pub fn subscribe_dirty(&self) -> watch::Receiver<bool> {
        self.read(|session| session.tracker().subscribe())
    }

    /// Trainer notes
    #[must_use]
    pub fn notes(&self) -> String {
        self.read(|session| session.notes().to_owned())
    }

    /// Supplementation text
    #[must_use]
    pub fn supplementation(&self) -> String {
        self.read(|session| session.supplementation().to_owned())
    }

    /// Selected day index, `None` when the plan has no days
    #[must_use]
    pub fn selected_day(&self) -> Option<usize> {
        self.read(EditSession::selected_day)
    }

    /// Date whose progress is displayed
    #[must_use]
    pub fn selected_date(&self) -> NaiveDate {
        self.read(EditSession::selected_date)
    }

    /// Meals of a day in display order
    ///
    /// Scheduled-time order while the document is clean, stored order while
    /// it is dirty.
    #[must_use]
    pub fn meals_for_display(&self, day_index: usize) -> Vec<MealId> {
        self.read(|session| {
            let tree = session.tree();
            let Some(day) = tree.day_at(day_index) else {
                return Vec::new();
            };
            if session.is_dirty() {
                day.meal_ids().to_vec()
            } else {
                tree.meal_ids_in_time_order(day.id)
            }
        })
    }

    // ── Plan-level edits ────────────────────────────────────────────────

    /// Rename the plan
    pub fn set_title(&self, title: &str) {
        self.mutate("set_title", |tree| {
            tree.set_title(title);
            true
        });
    }

    /// Replace the target macro summary
    pub fn set_target_macros(&self, targets: MacroTargets) {
        self.mutate("set_target_macros", |tree| {
            tree.set_target_macros(targets);
            true
        });
    }

    /// Replace the trainer notes
    pub fn set_notes(&self, text: &str) {
        let mut session = lock_session(&self.session);
        text.clone_into(session.notes_mut());
        session.mark_dirty();
    }

    /// Replace the supplementation text
    pub fn set_supplementation(&self, text: &str) {
        let mut session = lock_session(&self.session);
        text.clone_into(session.supplementation_mut());
        session.mark_dirty();
    }

    // ── Days ────────────────────────────────────────────────────────────

    /// Append a day; a blank name becomes "Day N"
    pub fn add_day(&self, name: &str) -> DayId {
        let mut session = lock_session(&self.session);
        let day_id = session.tree_mut().add_day(name);
        session.mark_dirty();
        day_id
    }

    /// Remove the day at a position with all its meals
    pub fn remove_day(&self, day_index: usize) -> bool {
        self.mutate("remove_day", |tree| {
            tree.day_id_at(day_index)
                .is_some_and(|day_id| tree.remove_day(day_id))
        })
    }

    /// Copy the day at a position and insert the copy after it
    pub fn duplicate_day(&self, day_index: usize) -> Option<DayId> {
        self.mutate("duplicate_day", |tree| {
            tree.day_id_at(day_index)
                .and_then(|day_id| tree.duplicate_day(day_id))
        })
    }

    /// Edit one field of the day at a position
    ///
    /// Turning a day into a rest day keeps its meals; they are ignored by
    /// completion counters but come back if the flag is cleared.
    pub fn set_day_field(&self, day_index: usize, field: DayField, value: &str) -> bool {
        self.mutate("set_day_field", |tree| {
            tree.day_id_at(day_index)
                .is_some_and(|day_id| tree.set_day_field(day_id, field, value))
        })
    }

    /// Select a day; out-of-range indices leave the selection unchanged
    pub fn select_day(&self, day_index: usize) -> bool {
        lock_session(&self.session).select_day(day_index)
    }

    /// Change the date whose progress is displayed
    ///
    /// A running progress poller is told immediately. Selection changes do
    /// not dirty the document.
    pub fn select_date(&self, date: NaiveDate) {
        let changed = lock_session(&self.session).select_date(date);
        if changed {
            if let Some(poller) = &self.poller {
                poller.set_date(date);
            }
        }
    }

    // ── Meals ───────────────────────────────────────────────────────────

    /// Append a meal to the day at `day_index`
    pub fn add_meal(&self, day_index: usize, meal: &MealDocument) -> Option<MealId> {
        self.mutate("add_meal", |tree| tree.add_meal(day_index, meal))
    }

    /// Remove the meal at a position
    pub fn remove_meal(&self, day_index: usize, meal_index: usize) -> bool {
        self.mutate("remove_meal", |tree| tree.remove_meal(day_index, meal_index))
    }

    /// Replace the meal at a position with new content
    pub fn replace_meal(&self, day_index: usize, meal_index: usize, meal: &MealDocument) -> bool {
        self.mutate("replace_meal", |tree| {
            tree.replace_meal(day_index, meal_index, meal)
        })
    }

    /// Edit one field of the meal at a position
    pub fn set_meal_field(
        &self,
        day_index: usize,
        meal_index: usize,
        field: MealField,
        value: &str,
    ) -> bool {
        self.mutate("set_meal_field", |tree| {
            tree.set_meal_field(day_index, meal_index, field, value)
        })
    }

    /// Remove a meal by id
    pub fn remove_meal_by_id(&self, meal_id: MealId) -> bool {
        self.mutate("remove_meal", |tree| tree.remove_meal_by_id(meal_id))
    }

    /// Replace a meal by id, keeping its slot
    pub fn replace_meal_by_id(&self, meal_id: MealId, meal: &MealDocument) -> bool {
        self.mutate("replace_meal", |tree| tree.replace_meal_by_id(meal_id, meal))
    }

    /// Edit one field of a meal by id
    pub fn set_meal_field_by_id(&self, meal_id: MealId, field: MealField, value: &str) -> bool {
        self.mutate("set_meal_field", |tree| {
            tree.set_meal_field_by_id(meal_id, field, value)
        })
    }

    /// Sort a day's meals by scheduled time
    ///
    /// Only allowed on a clean document. Returns whether the order changed,
    /// and marks the document dirty only in that case.
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while there are unsaved changes and
    /// `ResourceNotFound` for an out-of-range day.
    pub fn sort_meals_by_time(&self, day_index: usize) -> AppResult<bool> {
        let mut session = lock_session(&self.session);
        if session.is_dirty() {
            return Err(AppError::new(
                ErrorCode::ResourceLocked,
                "save or discard changes before sorting meals",
            ));
        }
        if day_index >= session.tree().day_count() {
            return Err(AppError::not_found(format!("day {day_index}")));
        }
        let changed = session.tree_mut().sort_meals_by_time(day_index);
        if changed {
            session.mark_dirty();
        }
        Ok(changed)
    }

    // ── Options ─────────────────────────────────────────────────────────

    /// Append an option to the meal at a position
    pub fn add_option(
        &self,
        day_index: usize,
        meal_index: usize,
        option: &OptionDocument,
    ) -> Option<OptionId> {
        self.mutate("add_option", |tree| {
            tree.add_option(day_index, meal_index, option)
        })
    }

    /// Remove the option at a position
    pub fn remove_option(&self, day_index: usize, meal_index: usize, option_index: usize) -> bool {
        self.mutate("remove_option", |tree| {
            tree.remove_option(day_index, meal_index, option_index)
        })
    }

    /// Edit one field of the option at a position
    ///
    /// Nutrition fields coerce malformed text to 0 rather than failing.
    pub fn set_option_field(
        &self,
        day_index: usize,
        meal_index: usize,
        option_index: usize,
        field: OptionField,
        value: &str,
    ) -> bool {
        self.mutate("set_option_field", |tree| {
            tree.set_option_field(day_index, meal_index, option_index, field, value)
        })
    }

    /// Append an option to a meal by id
    pub fn add_option_to(&self, meal_id: MealId, option: &OptionDocument) -> Option<OptionId> {
        self.mutate("add_option", |tree| tree.add_option_to(meal_id, option))
    }

    /// Remove an option by id
    pub fn remove_option_by_id(&self, option_id: OptionId) -> bool {
        self.mutate("remove_option", |tree| tree.remove_option_by_id(option_id))
    }

    /// Edit one field of an option by id
    pub fn set_option_field_by_id(
        &self,
        option_id: OptionId,
        field: OptionField,
        value: &str,
    ) -> bool {
        self.mutate("set_option_field", |tree| {
            tree.set_option_field_by_id(option_id, field, value)
        })
    }

    /// Add a dietary tag to an option
    pub fn add_dietary_tag(&self, option_id: OptionId, tag: DietaryTag) -> bool {
        self.mutate("add_dietary_tag", |tree| {
            tree.set_dietary_tag(option_id, tag, true)
        })
    }

    /// Remove a dietary tag from an option
    pub fn remove_dietary_tag(&self, option_id: OptionId, tag: DietaryTag) -> bool {
        self.mutate("remove_dietary_tag", |tree| {
            tree.set_dietary_tag(option_id, tag, false)
        })
    }

    /// Flip a dietary tag on an option
    pub fn toggle_dietary_tag(&self, option_id: OptionId, tag: DietaryTag) -> bool {
        self.mutate("toggle_dietary_tag", |tree| {
            tree.toggle_dietary_tag(option_id, tag)
        })
    }

    // ── Save / discard ──────────────────────────────────────────────────

    /// Commit the working plan, notes and supplementation
    ///
    /// # Errors
    ///
    /// Returns a `SaveFailed` error when the write fails; the document stays dirty.
    pub async fn save(&self) -> AppResult<SaveOutcome> {
        self.saver.save().await
    }

    /// Restore the last saved state; ignored while a save is in flight
    pub fn discard(&self) -> bool {
        self.saver.discard()
    }

    /// Orchestrator handle, for callers that save from another task
    #[must_use]
    pub fn saver(&self) -> SaveOrchestrator {
        self.saver.clone()
    }

    // ── Progress ────────────────────────────────────────────────────────

    /// Start polling client progress for the selected date
    ///
    /// Replaces (and thereby cancels) any poller started earlier. Must be
    /// called from within a Tokio runtime.
    pub fn start_progress(&mut self, config: &PollingConfig) -> watch::Receiver<ProgressDisplay> {
        let date = self.selected_date();
        let handle = ProgressPoller::new(Arc::clone(&self.store), self.key.clone(), config)
            .start(date);
        let display = handle.subscribe();
        info!(plan = %self.key, %date, "Progress polling attached to editor");
        self.poller = Some(handle);
        display
    }

    /// Running progress poller, if any
    #[must_use]
    pub const fn progress(&self) -> Option<&PollerHandle> {
        self.poller.as_ref()
    }

    /// Cancel progress polling
    pub fn stop_progress(&mut self) {
        if self.poller.take().is_some() {
            info!(plan = %self.key, "Progress polling stopped");
        }
    }
}
