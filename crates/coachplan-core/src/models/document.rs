// ABOUTME: Wire documents exchanged with the plan store (plan data, side channels, client profile)
// ABOUTME: Positional JSON shape; the editable tree converts to and from these at the boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::{deserialize_nutrient, Macros};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept element identifiers sent as strings or numbers
///
/// Numbers are kept in their decimal text form so they serialise back as the
/// same digits; `null` and other shapes read as a missing id.
///
/// # Errors
///
/// Fails only when the underlying JSON is malformed.
pub fn deserialize_wire_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn deserialize_plan_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_wire_id(deserializer).map(Option::unwrap_or_default)
}

/// Target daily macros the coach set for the plan
pub type MacroTargets = Macros;

/// Serialized plan tree (`planData` on the wire)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    /// Plan identifier assigned by the store
    #[serde(default, deserialize_with = "deserialize_plan_id")]
    pub id: String,
    /// Plan title
    #[serde(default)]
    pub title: String,
    /// Target daily macros
    #[serde(default)]
    pub target_macros: MacroTargets,
    /// Days in display order
    #[serde(default)]
    pub days: Vec<DayDocument>,
}

/// Serialized day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDocument {
    /// Day identifier, string or numeric on the wire
    #[serde(
        default,
        deserialize_with = "deserialize_wire_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Display name ("Monday", "Training day A", ...)
    #[serde(default)]
    pub name: String,
    /// Rest days are excluded from completion counters
    #[serde(default)]
    pub is_rest_day: bool,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Meals in position order
    #[serde(default)]
    pub meals: Vec<MealDocument>,
}

/// Serialized meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDocument {
    /// Meal identifier, string or numeric on the wire
    #[serde(
        default,
        deserialize_with = "deserialize_wire_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Meal name
    #[serde(default)]
    pub name: String,
    /// Scheduled time as `HH:MM`, empty when unscheduled
    #[serde(default)]
    pub time: String,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
    /// Alternatives the client can pick from
    #[serde(default)]
    pub options: Vec<OptionDocument>,
}

/// Serialized meal option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDocument {
    /// Option identifier, string or numeric on the wire
    #[serde(
        default,
        deserialize_with = "deserialize_wire_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Option name
    #[serde(default)]
    pub name: String,
    /// Energy in kcal
    #[serde(default, deserialize_with = "deserialize_nutrient")]
    pub calories: u32,
    /// Protein in grams
    #[serde(default, deserialize_with = "deserialize_nutrient")]
    pub protein: u32,
    /// Carbohydrates in grams
    #[serde(default, deserialize_with = "deserialize_nutrient")]
    pub carbs: u32,
    /// Fat in grams
    #[serde(default, deserialize_with = "deserialize_nutrient")]
    pub fat: u32,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Trainer recommendation shown to the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Dietary tag identifiers
    #[serde(default)]
    pub dietary: Vec<String>,
    /// Ingredient list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    /// Image reference (URL or upload key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body of the assigned-plan resource, used for both load and save
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedPlanPayload {
    /// The plan tree
    pub plan_data: PlanDocument,
    /// Trainer notes side channel
    #[serde(default)]
    pub notes: String,
    /// Supplementation side channel
    #[serde(default)]
    pub supplementation: String,
}

/// Client identity shown in the editor header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    /// Coaching request / client identifier
    #[serde(default)]
    pub id: String,
    /// Client display name
    #[serde(default)]
    pub name: String,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Client's stated goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// Remaining profile fields, kept for display only
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
