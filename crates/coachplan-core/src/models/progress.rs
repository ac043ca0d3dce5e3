// ABOUTME: Read-only client progress projection for a single date
// ABOUTME: Snapshot wire type plus the "not tracked yet" and "unavailable" placeholders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::Macros;
use crate::constants::messages;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressAvailability {
    /// Fetched from the store
    #[default]
    Tracked,
    /// Store answered 404: the client has not started this date
    NotStarted,
    /// Fetch failed for any other reason
    Unavailable,
}

/// Water intake for the date
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntake {
    /// Litres consumed so far
    #[serde(default)]
    pub current: f64,
    /// Daily goal in litres
    #[serde(default)]
    pub goal: f64,
}

/// A meal option the client marked as done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedMeal {
    /// Meal name as it appeared in the plan
    #[serde(default)]
    pub meal_name: String,
    /// Option the client picked
    #[serde(default)]
    pub option_name: String,
    /// When it was ticked off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Macros of the picked option
    #[serde(flatten)]
    pub macros: Macros,
}

/// Something the client ate outside the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnackEntry {
    /// What was eaten
    #[serde(default)]
    pub name: String,
    /// When it was logged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_at: Option<DateTime<Utc>>,
    /// Logged macros
    #[serde(flatten)]
    pub macros: Macros,
}

const fn default_true() -> bool {
    true
}

/// Client execution summary for one date
///
/// Replaced wholesale on every poll; never merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Date the snapshot describes
    pub date: NaiveDate,
    /// False for both placeholders
    #[serde(default = "default_true")]
    pub has_active_tracking: bool,
    /// Human-readable status; always set on placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Origin of this snapshot
    #[serde(default)]
    pub availability: ProgressAvailability,
    /// Completion percentage as reported by the store (0-100)
    #[serde(default)]
    pub completion_rate: f64,
    /// Meal options completed
    #[serde(default)]
    pub completed_count: u32,
    /// Meal options planned for the date
    #[serde(default)]
    pub total_count: u32,
    /// Nutrition consumed so far
    #[serde(default)]
    pub consumed: Macros,
    /// Water intake
    #[serde(default)]
    pub water: WaterIntake,
    /// Completed meals with timestamps
    #[serde(default)]
    pub completed_meals: Vec<CompletedMeal>,
    /// Off-plan snacks
    #[serde(default)]
    pub snacks: Vec<SnackEntry>,
}

impl ProgressSnapshot {
    fn placeholder(date: NaiveDate, availability: ProgressAvailability, message: &str) -> Self {
        Self {
            date,
            has_active_tracking: false,
            message: Some(message.to_owned()),
            availability,
            completion_rate: 0.0,
            completed_count: 0,
            total_count: 0,
            consumed: Macros::default(),
            water: WaterIntake::default(),
            completed_meals: Vec::new(),
            snacks: Vec::new(),
        }
    }

    /// Placeholder for a date the client has not started (HTTP 404)
    #[must_use]
    pub fn not_tracked(date: NaiveDate) -> Self {
        Self::placeholder(
            date,
            ProgressAvailability::NotStarted,
            messages::NOT_TRACKED_YET,
        )
    }

    /// Placeholder for any other fetch failure
    #[must_use]
    pub fn unavailable(date: NaiveDate) -> Self {
        Self::placeholder(
            date,
            ProgressAvailability::Unavailable,
            messages::PROGRESS_UNAVAILABLE,
        )
    }

    /// Completion percentage clamped to 0-100
    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        if self.completion_rate.is_finite() {
            self.completion_rate.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// Names of meals the client completed, for matching against the plan
    pub fn completed_meal_names(&self) -> impl Iterator<Item = &str> {
        self.completed_meals.iter().map(|meal| meal.meal_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_placeholders_are_distinct() {
        let missing = ProgressSnapshot::not_tracked(date());
        let failed = ProgressSnapshot::unavailable(date());

        assert!(!missing.has_active_tracking);
        assert!(!failed.has_active_tracking);
        assert!(!missing.message.as_deref().unwrap_or_default().is_empty());
        assert_ne!(missing.message, failed.message);
        assert_ne!(missing.availability, failed.availability);
    }

    #[test]
    fn test_snapshot_from_wire() {
        let snapshot: ProgressSnapshot = serde_json::from_str(
            r#"{
                "date": "2025-03-14",
                "completionRate": 50.0,
                "completedCount": 2,
                "totalCount": 4,
                "consumed": {"calories": 900, "protein": 60, "carbs": 80, "fat": 30},
                "water": {"current": 1.5, "goal": 3.0},
                "completedMeals": [{"mealName": "Breakfast", "optionName": "Oats", "completedAt": "2025-03-14T08:12:00Z", "calories": 400}],
                "snacks": [{"name": "Apple", "calories": 80}]
            }"#,
        )
        .unwrap();

        assert!(snapshot.has_active_tracking);
        assert_eq!(snapshot.availability, ProgressAvailability::Tracked);
        assert_eq!(snapshot.completed_meals[0].macros.calories, 400);
        assert_eq!(snapshot.snacks[0].macros.calories, 80);
        assert_eq!(snapshot.completed_meal_names().collect::<Vec<_>>(), ["Breakfast"]);
    }

    #[test]
    fn test_completion_percent_is_clamped() {
        let mut snapshot = ProgressSnapshot::not_tracked(date());
        snapshot.completion_rate = 140.0;
        assert!((snapshot.completion_percent() - 100.0).abs() < f64::EPSILON);
        snapshot.completion_rate = f64::NAN;
        assert!(snapshot.completion_percent().abs() < f64::EPSILON);
    }
}
