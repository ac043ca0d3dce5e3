// ABOUTME: Data models shared between the plan tree, the store client and the poller
// ABOUTME: Re-exports wire documents, nutrition values and progress snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Wire documents for the assigned plan and client profile
pub mod document;
/// Macro quad, numeric coercion and dietary vocabulary
pub mod nutrition;
/// Client progress snapshot and placeholders
pub mod progress;

pub use document::{
    AssignedPlanPayload, ClientProfile, DayDocument, MacroTargets, MealDocument, OptionDocument,
    PlanDocument,
};
pub use nutrition::{coerce_nutrient, DietaryTag, Macros, UnknownDietaryTag};
pub use progress::{
    CompletedMeal, ProgressAvailability, ProgressSnapshot, SnackEntry, WaterIntake,
};
