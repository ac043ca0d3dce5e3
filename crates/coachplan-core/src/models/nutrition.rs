// ABOUTME: Nutrition value types for plan options: macro quad, targets and dietary vocabulary
// ABOUTME: Includes lossy numeric coercion so malformed input becomes 0 instead of an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Coerce free text typed into a nutrition field to a whole number
///
/// Anything that is not a finite, non-negative number becomes `0`.
/// Fractions are truncated, so `"12.9"` stores `12`.
#[must_use]
pub fn coerce_nutrient(text: &str) -> u32 {
    text.trim().parse::<f64>().map_or(0, coerce_nutrient_f64)
}

/// Coerce a floating point amount to a whole number of grams/kcal
#[must_use]
pub fn coerce_nutrient_f64(value: f64) -> u32 {
    if !value.is_finite() || value < 0.0 {
        return 0;
    }
    if value >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    value.trunc() as u32
}

/// Serde helper accepting numbers or numeric strings for a nutrition field
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce a JSON value.
pub fn deserialize_nutrient<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64().map_or(0, coerce_nutrient_f64),
        Value::String(text) => coerce_nutrient(&text),
        _ => 0,
    })
}

/// Calories, protein, carbs and fat of a single option or an aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
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
}

impl Macros {
    /// Build a macro quad
    #[must_use]
    pub const fn new(calories: u32, protein: u32, carbs: u32, fat: u32) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Integer mean of `count` summed quads; zero when `count` is zero
    #[must_use]
    pub const fn average(self, count: u32) -> Self {
        if count == 0 {
            return Self::new(0, 0, 0, 0);
        }
        Self {
            calories: self.calories / count,
            protein: self.protein / count,
            carbs: self.carbs / count,
            fat: self.fat / count,
        }
    }
}

impl Add for Macros {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories.saturating_add(rhs.calories),
            protein: self.protein.saturating_add(rhs.protein),
            carbs: self.carbs.saturating_add(rhs.carbs),
            fat: self.fat.saturating_add(rhs.fat),
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Closed vocabulary of dietary tags a coach may attach to an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryTag {
    /// No meat or fish
    Vegetarian,
    /// No animal products
    Vegan,
    /// No gluten-containing grains
    GlutenFree,
    /// No dairy
    DairyFree,
    /// No lactose
    LactoseFree,
    /// No tree nuts or peanuts
    NutFree,
    /// Reduced carbohydrates
    LowCarb,
    /// Protein-dense option
    HighProtein,
    /// Ketogenic
    Keto,
    /// Paleo
    Paleo,
}

impl DietaryTag {
    /// Every tag, in display order
    pub const ALL: [Self; 10] = [
        Self::Vegetarian,
        Self::Vegan,
        Self::GlutenFree,
        Self::DairyFree,
        Self::LactoseFree,
        Self::NutFree,
        Self::LowCarb,
        Self::HighProtein,
        Self::Keto,
        Self::Paleo,
    ];

    /// Stable identifier used on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten_free",
            Self::DairyFree => "dairy_free",
            Self::LactoseFree => "lactose_free",
            Self::NutFree => "nut_free",
            Self::LowCarb => "low_carb",
            Self::HighProtein => "high_protein",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::GlutenFree => "Gluten-free",
            Self::DairyFree => "Dairy-free",
            Self::LactoseFree => "Lactose-free",
            Self::NutFree => "Nut-free",
            Self::LowCarb => "Low carb",
            Self::HighProtein => "High protein",
            Self::Keto => "Keto",
            Self::Paleo => "Paleo",
        }
    }
}

impl fmt::Display for DietaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a tag id is not part of the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dietary tag '{0}'")]
pub struct UnknownDietaryTag(pub String);

impl FromStr for DietaryTag {
    type Err = UnknownDietaryTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == normalized)
            .ok_or_else(|| UnknownDietaryTag(s.to_owned()))
    }
}
