// ABOUTME: Stable identifiers for days, meals and options in the plan tree
// ABOUTME: UUID newtypes so handles held by the view survive inserts and removals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! tree_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh identifier
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Reuse a wire identifier when it is a UUID, otherwise generate one
            #[must_use]
            pub fn from_wire(raw: Option<&str>) -> Self {
                raw.and_then(|value| Uuid::parse_str(value.trim()).ok())
                    .map_or_else(Self::new, $name)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

tree_id!(
    /// Identifier of a day in the plan
    DayId
);
tree_id!(
    /// Identifier of a meal, stable across reordering
    MealId
);
tree_id!(
    /// Identifier of a meal option
    OptionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_reuses_uuid() {
        let raw = "8f14e45f-ceea-467a-9af0-2b1c4c7a3e11";
        assert_eq!(MealId::from_wire(Some(raw)).to_string(), raw);
    }

    #[test]
    fn test_from_wire_generates_for_legacy_ids() {
        let first = MealId::from_wire(Some("meal-3"));
        let second = MealId::from_wire(Some("meal-3"));
        assert_ne!(first, second);
        assert_ne!(OptionId::from_wire(None), OptionId::from_wire(None));
    }
}
