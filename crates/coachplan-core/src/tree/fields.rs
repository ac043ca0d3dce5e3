// ABOUTME: Editable field selectors for days, meals and options plus text normalisation
// ABOUTME: Ingredient splitting, time normalisation and boolean flag parsing live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::tree::{INGREDIENT_JOIN, INGREDIENT_SEPARATOR};
use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

/// Editable fields of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayField {
    /// Display name
    Name,
    /// Free-text description
    Description,
    /// Rest-day flag, parsed from `true`/`false` text
    RestDay,
}

/// Editable fields of a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealField {
    /// Meal name
    Name,
    /// Scheduled time (`HH:MM` or empty)
    Time,
    /// Free-text notes
    Notes,
}

/// Editable fields of a meal option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    /// Option name
    Name,
    /// kcal, coerced to a whole number
    Calories,
    /// Protein grams, coerced to a whole number
    Protein,
    /// Carbohydrate grams, coerced to a whole number
    Carbs,
    /// Fat grams, coerced to a whole number
    Fat,
    /// Free-text description
    Description,
    /// Trainer recommendation; empty text clears it
    Recommendation,
    /// Comma-delimited ingredient list
    Ingredients,
    /// Toggles the dietary tag named by the value
    Dietary,
    /// Image reference; empty text clears it
    Image,
}

/// Raised when a view hands over a field name that does not exist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

macro_rules! field_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Field name as used by the view layer
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(UnknownField(other.to_owned())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

field_names!(DayField {
    Name => "name",
    Description => "description",
    RestDay => "isRestDay",
});

field_names!(MealField {
    Name => "name",
    Time => "time",
    Notes => "notes",
});

field_names!(OptionField {
    Name => "name",
    Calories => "calories",
    Protein => "protein",
    Carbs => "carbs",
    Fat => "fat",
    Description => "description",
    Recommendation => "recommendation",
    Ingredients => "ingredients",
    Dietary => "dietary",
    Image => "image",
});

/// Split a comma-delimited ingredient field into trimmed, non-empty entries
#[must_use]
pub fn parse_ingredients(text: &str) -> Vec<String> {
    text.split(INGREDIENT_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Render an ingredient list back into the single-line edit field
#[must_use]
pub fn join_ingredients(ingredients: &[String]) -> String {
    ingredients.join(INGREDIENT_JOIN)
}

/// Normalise a meal time to zero-padded `HH:MM`
///
/// Unparseable text is kept as typed (trimmed) so the coach does not lose input.
#[must_use]
pub fn normalize_time(text: &str) -> String {
    let trimmed = text.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_or_else(|_| trimmed.to_owned(), |time| time.format("%H:%M").to_string())
}

/// Parse a checkbox-style flag value
#[must_use]
pub fn parse_flag(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Map empty text to `None`
#[must_use]
pub fn optional_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
