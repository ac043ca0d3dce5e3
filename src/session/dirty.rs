// ABOUTME: Unsaved-change tracking for the editing session
// ABOUTME: Revision counter plus a watch channel feeding the unsaved-changes indicator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tokio::sync::watch;
use tracing::debug;

/// Tracks whether the working document differs from the last saved one
///
/// Every mutation bumps the revision. A save captures the revision it sent and
/// only clears the flag if no edit happened while the write was in flight.
#[derive(Debug)]
pub struct DirtyTracker {
    dirty: bool,
    revision: u64,
    state: watch::Sender<bool>,
}

impl DirtyTracker {
    /// Create a clean tracker
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            dirty: false,
            revision: 0,
            state,
        }
    }

    /// Record a mutation; idempotent with respect to the flag
    pub fn mark_dirty(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        if !self.dirty {
            debug!(revision = self.revision, "Document has unsaved changes");
        }
        self.set(true);
    }

    /// Mark the document as matching the last saved state
    pub fn clear(&mut self) {
        self.set(false);
    }

    /// Clear only if nothing changed since `revision` was captured
    ///
    /// Returns whether the flag was cleared.
    pub fn clear_if_unchanged(&mut self, revision: u64) -> bool {
        if self.revision != revision {
            debug!(
                saved = revision,
                current = self.revision,
                "Edits landed during save, keeping unsaved state"
            );
            return false;
        }
        self.clear();
        true
    }

    /// Whether there are unsaved changes
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Monotonic mutation counter
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribe to flag changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    fn set(&mut self, dirty: bool) {
        self.dirty = dirty;
        self.state.send_if_modified(|current| {
            if *current == dirty {
                return false;
            }
            *current = dirty;
            true
        });
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_clear() {
        let mut tracker = DirtyTracker::new();
        assert!(!tracker.is_dirty());

        tracker.mark_dirty();
        tracker.mark_dirty();
        assert!(tracker.is_dirty());
        assert_eq!(tracker.revision(), 2);

        tracker.clear();
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn test_clear_if_unchanged_detects_concurrent_edit() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        let sent = tracker.revision();

        tracker.mark_dirty();
        assert!(!tracker.clear_if_unchanged(sent));
        assert!(tracker.is_dirty());

        assert!(tracker.clear_if_unchanged(tracker.revision()));
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn test_subscribers_see_transitions() {
        let mut tracker = DirtyTracker::new();
        let mut receiver = tracker.subscribe();
        assert!(!*receiver.borrow_and_update());

        tracker.mark_dirty();
        assert!(receiver.has_changed().unwrap());
        assert!(*receiver.borrow_and_update());

        tracker.mark_dirty();
        assert!(!receiver.has_changed().unwrap());
    }
}
