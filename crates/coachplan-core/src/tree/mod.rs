// ABOUTME: Editable plan tree (days -> meals -> options) backed by an id-keyed arena
// ABOUTME: Index and id addressed mutations; positional order is produced only when serialising
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Tree
//!
//! The working copy of an assigned nutrition plan. Days are kept in a vector
//! (there are only ever a handful), while meals and options live in id maps and
//! are referenced from their parent by id. A handle captured by the view
//! (`MealId`, `OptionId`) therefore keeps pointing at the same element after a
//! sibling above it is removed.
//!
//! Two addressing styles are offered:
//!
//! - **By position** (`add_meal(day_index, ..)`, `remove_option(day, meal, option)`),
//!   the shape the view layer works with. Positions are resolved to ids on entry.
//! - **By id** (`remove_meal_by_id`, `set_option_field_by_id`, ..), which is what
//!   long-lived handles such as an open edit dialog should use.
//!
//! Out-of-range positions and unknown ids are silent no-ops: mutators return
//! `false`/`None` and leave the tree untouched. The tree performs no I/O and
//! knows nothing about dirtiness; see the editor facade for that.

/// Editable field selectors and text normalisation helpers
pub mod fields;
/// Stable identifiers for tree elements
pub mod ids;
/// Counters, planned macros and completion math
pub mod summary;

pub use fields::{
    join_ingredients, normalize_time, parse_ingredients, DayField, MealField, OptionField,
    UnknownField,
};
pub use ids::{DayId, MealId, OptionId};
pub use summary::{DayCompletion, PlanCounters};

use crate::constants::tree::{DEFAULT_DAY_PREFIX, MISSING_TIME_SORT_KEY};
use crate::models::{
    coerce_nutrient, DayDocument, DietaryTag, MacroTargets, Macros, MealDocument, OptionDocument,
    PlanDocument,
};
use fields::{optional_text, parse_flag};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// A day of the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    /// Stable identifier
    pub id: DayId,
    /// Identifier written back to the store, kept verbatim from the loaded document
    pub wire_id: String,
    /// Display name
    pub name: String,
    /// Rest days keep their meals but are skipped by completion counters
    pub is_rest_day: bool,
    /// Free-text description
    pub description: String,
    meals: Vec<MealId>,
}

impl Day {
    /// Meal ids in position order
    #[must_use]
    pub fn meal_ids(&self) -> &[MealId] {
        &self.meals
    }
}

/// A meal slot within a day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    /// Stable identifier
    pub id: MealId,
    /// Identifier written back to the store, kept verbatim from the loaded document
    pub wire_id: String,
    /// Owning day
    pub day: DayId,
    /// Meal name
    pub name: String,
    /// Scheduled time, `HH:MM` or empty
    pub time: String,
    /// Free-text notes
    pub notes: String,
    options: Vec<OptionId>,
}

impl Meal {
    /// Option ids in position order
    #[must_use]
    pub fn option_ids(&self) -> &[OptionId] {
        &self.options
    }

    fn sort_key(&self) -> &str {
        if self.time.is_empty() {
            MISSING_TIME_SORT_KEY
        } else {
            &self.time
        }
    }
}

/// One alternative the client may choose for a meal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealOption {
    /// Stable identifier
    pub id: OptionId,
    /// Identifier written back to the store, kept verbatim from the loaded document
    pub wire_id: String,
    /// Owning meal
    pub meal: MealId,
    /// Option name
    pub name: String,
    /// Nutrition quad
    pub macros: Macros,
    /// Free-text description
    pub description: String,
    /// Trainer recommendation
    pub recommendation: Option<String>,
    /// Dietary tags from the closed vocabulary
    pub dietary: BTreeSet<DietaryTag>,
    /// Ingredient list
    pub ingredients: Option<Vec<String>>,
    /// Image reference
    pub image: Option<String>,
}

/// The editable plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanTree {
    id: String,
    title: String,
    target_macros: MacroTargets,
    days: Vec<Day>,
    meals: HashMap<MealId, Meal>,
    options: HashMap<OptionId, MealOption>,
}

impl PlanTree {
    /// Create an empty plan
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Build a tree from its wire document
    ///
    /// Every element keeps its wire identifier for the next save. UUID wire ids
    /// double as the element's handle; any other id gets a fresh handle.
    #[must_use]
    pub fn from_document(document: &PlanDocument) -> Self {
        let mut tree = Self {
            id: document.id.clone(),
            title: document.title.clone(),
            target_macros: document.target_macros,
            ..Self::default()
        };
        for day in &document.days {
            let day = tree.build_day(day, true);
            tree.days.push(day);
        }
        tree
    }

    /// Serialise the tree in position order
    #[must_use]
    pub fn to_document(&self) -> PlanDocument {
        PlanDocument {
            id: self.id.clone(),
            title: self.title.clone(),
            target_macros: self.target_macros,
            days: self.days.iter().map(|day| self.day_document(day)).collect(),
        }
    }

    // ── Read access ─────────────────────────────────────────────────────

    /// Plan identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Plan title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Target daily macros
    #[must_use]
    pub const fn target_macros(&self) -> MacroTargets {
        self.target_macros
    }

    /// Days in order
    #[must_use]
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Number of days
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Day at a position
    #[must_use]
    pub fn day_at(&self, day_index: usize) -> Option<&Day> {
        self.days.get(day_index)
    }

    /// Day by id
    #[must_use]
    pub fn day(&self, day_id: DayId) -> Option<&Day> {
        self.days.iter().find(|day| day.id == day_id)
    }

    /// Position of a day
    #[must_use]
    pub fn day_index(&self, day_id: DayId) -> Option<usize> {
        self.days.iter().position(|day| day.id == day_id)
    }

    /// Meal by id
    #[must_use]
    pub fn meal(&self, meal_id: MealId) -> Option<&Meal> {
        self.meals.get(&meal_id)
    }

    /// Option by id
    #[must_use]
    pub fn option(&self, option_id: OptionId) -> Option<&MealOption> {
        self.options.get(&option_id)
    }

    /// Meals of a day in position order
    pub fn meals_of(&self, day_id: DayId) -> impl Iterator<Item = &Meal> + '_ {
        self.day(day_id)
            .map(|day| day.meals.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|meal_id| self.meals.get(meal_id))
    }

    /// Options of a meal in position order
    pub fn options_of(&self, meal_id: MealId) -> impl Iterator<Item = &MealOption> + '_ {
        self.meals
            .get(&meal_id)
            .map(|meal| meal.options.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|option_id| self.options.get(option_id))
    }

    /// Id of the day at a position
    #[must_use]
    pub fn day_id_at(&self, day_index: usize) -> Option<DayId> {
        self.days.get(day_index).map(|day| day.id)
    }

    /// Id of the meal at a position
    #[must_use]
    pub fn meal_id_at(&self, day_index: usize, meal_index: usize) -> Option<MealId> {
        self.days.get(day_index)?.meals.get(meal_index).copied()
    }

    /// Id of the option at a position
    #[must_use]
    pub fn option_id_at(
        &self,
        day_index: usize,
        meal_index: usize,
        option_index: usize,
    ) -> Option<OptionId> {
        let meal_id = self.meal_id_at(day_index, meal_index)?;
        self.meals.get(&meal_id)?.options.get(option_index).copied()
    }

    /// Current `(day_index, meal_index)` of a meal
    #[must_use]
    pub fn meal_position(&self, meal_id: MealId) -> Option<(usize, usize)> {
        let meal = self.meals.get(&meal_id)?;
        let day_index = self.day_index(meal.day)?;
        let meal_index = self.days[day_index]
            .meals
            .iter()
            .position(|id| *id == meal_id)?;
        Some((day_index, meal_index))
    }

    /// Ingredients of an option rendered for the single-line edit field
    #[must_use]
    pub fn ingredients_text(&self, option_id: OptionId) -> Option<String> {
        self.options
            .get(&option_id)?
            .ingredients
            .as_deref()
            .map(join_ingredients)
    }

    /// Meals of a day ordered by scheduled time without touching stored order
    #[must_use]
    pub fn meal_ids_in_time_order(&self, day_id: DayId) -> Vec<MealId> {
        self.day(day_id)
            .map(|day| self.sorted_by_time(&day.meals))
            .unwrap_or_default()
    }

    // ── Plan-level edits ────────────────────────────────────────────────

    /// Rename the plan
    pub fn set_title(&mut self, title: &str) {
        title.trim().clone_into(&mut self.title);
    }

    /// Replace the target macro summary
    pub fn set_target_macros(&mut self, targets: MacroTargets) {
        self.target_macros = targets;
    }

    // ── Day edits ───────────────────────────────────────────────────────

    /// Append an empty day; a blank name becomes "Day N"
    pub fn add_day(&mut self, name: &str) -> DayId {
        let name = optional_text(name)
            .unwrap_or_else(|| format!("{DEFAULT_DAY_PREFIX} {}", self.days.len() + 1));
        let id = DayId::new();
        let day = Day {
            id,
            wire_id: id.to_string(),
            name,
            is_rest_day: false,
            description: String::new(),
            meals: Vec::new(),
        };
        self.days.push(day);
        id
    }

    /// Remove a day together with its meals and options
    pub fn remove_day(&mut self, day_id: DayId) -> bool {
        let Some(day_index) = self.day_index(day_id) else {
            return false;
        };
        let day = self.days.remove(day_index);
        for meal_id in day.meals {
            self.drop_meal(meal_id);
        }
        true
    }

    /// Deep-copy a day (fresh ids) and insert it right after the source
    pub fn duplicate_day(&mut self, day_id: DayId) -> Option<DayId> {
        let day_index = self.day_index(day_id)?;
        let mut document = self.day_document(&self.days[day_index]);
        document.name = format!("{} (copy)", document.name);
        let copy = self.build_day(&document, false);
        let copy_id = copy.id;
        self.days.insert(day_index + 1, copy);
        Some(copy_id)
    }

    /// Edit one field of a day
    pub fn set_day_field(&mut self, day_id: DayId, field: DayField, value: &str) -> bool {
        let Some(day) = self.days.iter_mut().find(|day| day.id == day_id) else {
            return false;
        };
        match field {
            DayField::Name => value.clone_into(&mut day.name),
            DayField::Description => value.clone_into(&mut day.description),
            DayField::RestDay => day.is_rest_day = parse_flag(value),
        }
        true
    }

    // ── Meal edits by position ──────────────────────────────────────────

    /// Append a meal to the day at `day_index`; no-op when out of range
    pub fn add_meal(&mut self, day_index: usize, meal: &MealDocument) -> Option<MealId> {
        let day_id = self.day_id_at(day_index)?;
        self.add_meal_to(day_id, meal)
    }

    /// Remove the meal at a position; later meals shift up by one
    pub fn remove_meal(&mut self, day_index: usize, meal_index: usize) -> bool {
        self.meal_id_at(day_index, meal_index)
            .is_some_and(|meal_id| self.remove_meal_by_id(meal_id))
    }

    /// Swap the meal at a position for new content, keeping its slot
    pub fn replace_meal(&mut self, day_index: usize, meal_index: usize, meal: &MealDocument) -> bool {
        self.meal_id_at(day_index, meal_index)
            .is_some_and(|meal_id| self.replace_meal_by_id(meal_id, meal))
    }

    /// Edit one field of the meal at a position
    pub fn set_meal_field(
        &mut self,
        day_index: usize,
        meal_index: usize,
        field: MealField,
        value: &str,
    ) -> bool {
        self.meal_id_at(day_index, meal_index)
            .is_some_and(|meal_id| self.set_meal_field_by_id(meal_id, field, value))
    }

    /// Stable-sort a day's meals by `HH:MM`, unscheduled meals sorting as "00:00"
    ///
    /// Returns whether the stored order changed.
    pub fn sort_meals_by_time(&mut self, day_index: usize) -> bool {
        let Some(day) = self.days.get(day_index) else {
            return false;
        };
        let sorted = self.sorted_by_time(&day.meals);
        if sorted == day.meals {
            return false;
        }
        self.days[day_index].meals = sorted;
        true
    }

    // ── Meal edits by id ────────────────────────────────────────────────

    /// Append a meal to a day, assigning fresh ids to it and its options
    pub fn add_meal_to(&mut self, day_id: DayId, meal: &MealDocument) -> Option<MealId> {
        let day_index = self.day_index(day_id)?;
        let meal_id = self.build_meal(day_id, meal, false);
        self.days[day_index].meals.push(meal_id);
        Some(meal_id)
    }

    /// Remove a meal and its options
    pub fn remove_meal_by_id(&mut self, meal_id: MealId) -> bool {
        let Some(day_id) = self.meals.get(&meal_id).map(|meal| meal.day) else {
            return false;
        };
        if let Some(day) = self.days.iter_mut().find(|day| day.id == day_id) {
            day.meals.retain(|id| *id != meal_id);
        }
        self.drop_meal(meal_id);
        true
    }

    /// Replace a meal's content in place; the meal keeps its id and slot
    pub fn replace_meal_by_id(&mut self, meal_id: MealId, meal: &MealDocument) -> bool {
        let Some(old_options) = self
            .meals
            .get_mut(&meal_id)
            .map(|existing| std::mem::take(&mut existing.options))
        else {
            return false;
        };
        for option_id in old_options {
            self.options.remove(&option_id);
        }
        let options: Vec<OptionId> = meal
            .options
            .iter()
            .map(|option| self.build_option(meal_id, option, false))
            .collect();
        if let Some(existing) = self.meals.get_mut(&meal_id) {
            existing.name.clone_from(&meal.name);
            existing.time = normalize_time(&meal.time);
            existing.notes.clone_from(&meal.notes);
            existing.options = options;
        }
        true
    }

    /// Edit one field of a meal
    pub fn set_meal_field_by_id(&mut self, meal_id: MealId, field: MealField, value: &str) -> bool {
        let Some(meal) = self.meals.get_mut(&meal_id) else {
            return false;
        };
        match field {
            MealField::Name => value.clone_into(&mut meal.name),
            MealField::Time => meal.time = normalize_time(value),
            MealField::Notes => value.clone_into(&mut meal.notes),
        }
        true
    }

    // ── Option edits by position ────────────────────────────────────────

    /// Append an option to the meal at a position
    pub fn add_option(
        &mut self,
        day_index: usize,
        meal_index: usize,
        option: &OptionDocument,
    ) -> Option<OptionId> {
        let meal_id = self.meal_id_at(day_index, meal_index)?;
        self.add_option_to(meal_id, option)
    }

    /// Remove the option at a position
    pub fn remove_option(&mut self, day_index: usize, meal_index: usize, option_index: usize) -> bool {
        self.option_id_at(day_index, meal_index, option_index)
            .is_some_and(|option_id| self.remove_option_by_id(option_id))
    }

    /// Edit one field of the option at a position
    pub fn set_option_field(
        &mut self,
        day_index: usize,
        meal_index: usize,
        option_index: usize,
        field: OptionField,
        value: &str,
    ) -> bool {
        self.option_id_at(day_index, meal_index, option_index)
            .is_some_and(|option_id| self.set_option_field_by_id(option_id, field, value))
    }

    // ── Option edits by id ──────────────────────────────────────────────

    /// Append an option to a meal with a fresh id
    pub fn add_option_to(&mut self, meal_id: MealId, option: &OptionDocument) -> Option<OptionId> {
        if !self.meals.contains_key(&meal_id) {
            return None;
        }
        let option_id = self.build_option(meal_id, option, false);
        if let Some(meal) = self.meals.get_mut(&meal_id) {
            meal.options.push(option_id);
        }
        Some(option_id)
    }

    /// Remove an option
    pub fn remove_option_by_id(&mut self, option_id: OptionId) -> bool {
        let Some(option) = self.options.remove(&option_id) else {
            return false;
        };
        if let Some(meal) = self.meals.get_mut(&option.meal) {
            meal.options.retain(|id| *id != option_id);
        }
        true
    }

    /// Edit one field of an option
    ///
    /// Numeric fields coerce malformed text to 0. `Dietary` toggles the tag
    /// named by `value`; an id outside the vocabulary leaves the option untouched
    /// and returns `false`.
    pub fn set_option_field_by_id(
        &mut self,
        option_id: OptionId,
        field: OptionField,
        value: &str,
    ) -> bool {
        let Some(option) = self.options.get_mut(&option_id) else {
            return false;
        };
        match field {
            OptionField::Name => value.clone_into(&mut option.name),
            OptionField::Calories => option.macros.calories = coerce_nutrient(value),
            OptionField::Protein => option.macros.protein = coerce_nutrient(value),
            OptionField::Carbs => option.macros.carbs = coerce_nutrient(value),
            OptionField::Fat => option.macros.fat = coerce_nutrient(value),
            OptionField::Description => value.clone_into(&mut option.description),
            OptionField::Recommendation => option.recommendation = optional_text(value),
            OptionField::Ingredients => {
                let parsed = parse_ingredients(value);
                option.ingredients = (!parsed.is_empty()).then_some(parsed);
            }
            OptionField::Image => option.image = optional_text(value),
            OptionField::Dietary => match value.parse::<DietaryTag>() {
                Ok(tag) => flip_tag(&mut option.dietary, tag),
                Err(error) => {
                    warn!(option_id = %option_id, %error, "ignoring dietary toggle");
                    return false;
                }
            },
        }
        true
    }

    /// Flip a dietary tag on an option
    pub fn toggle_dietary_tag(&mut self, option_id: OptionId, tag: DietaryTag) -> bool {
        let Some(option) = self.options.get_mut(&option_id) else {
            return false;
        };
        flip_tag(&mut option.dietary, tag);
        true
    }

    /// Set or clear a dietary tag explicitly
    pub fn set_dietary_tag(&mut self, option_id: OptionId, tag: DietaryTag, present: bool) -> bool {
        let Some(option) = self.options.get_mut(&option_id) else {
            return false;
        };
        if present {
            option.dietary.insert(tag);
        } else {
            option.dietary.remove(&tag);
        }
        true
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn sorted_by_time(&self, meal_ids: &[MealId]) -> Vec<MealId> {
        let mut sorted = meal_ids.to_vec();
        sorted.sort_by(|a, b| {
            let a = self.meals.get(a).map_or(MISSING_TIME_SORT_KEY, Meal::sort_key);
            let b = self.meals.get(b).map_or(MISSING_TIME_SORT_KEY, Meal::sort_key);
            a.cmp(b)
        });
        sorted
    }

    fn has_day_wire_id(&self, raw: Option<&str>) -> bool {
        raw.is_some_and(|raw| self.days.iter().any(|day| day.wire_id == raw))
    }

    fn drop_meal(&mut self, meal_id: MealId) {
        if let Some(meal) = self.meals.remove(&meal_id) {
            for option_id in meal.options {
                self.options.remove(&option_id);
            }
        }
    }

    fn build_day(&mut self, document: &DayDocument, reuse_ids: bool) -> Day {
        let mut wire_id = document.id.clone().filter(|_| reuse_ids);
        let mut id = DayId::from_wire(wire_id.as_deref());
        if self.day(id).is_some() || self.has_day_wire_id(wire_id.as_deref()) {
            warn!(day_id = %id, "duplicate day id in plan document, assigning a new one");
            id = DayId::new();
            wire_id = None;
        }
        let wire_id = wire_id.unwrap_or_else(|| id.to_string());
        let meals = document
            .meals
            .iter()
            .map(|meal| self.build_meal(id, meal, reuse_ids))
            .collect();
        Day {
            id,
            wire_id,
            name: document.name.clone(),
            is_rest_day: document.is_rest_day,
            description: document.description.clone(),
            meals,
        }
    }

    fn build_meal(&mut self, day: DayId, document: &MealDocument, reuse_ids: bool) -> MealId {
        let mut wire_id = document.id.clone().filter(|_| reuse_ids);
        let mut id = MealId::from_wire(wire_id.as_deref());
        let taken = wire_id
            .as_deref()
            .is_some_and(|raw| self.meals.values().any(|meal| meal.wire_id == raw));
        if self.meals.contains_key(&id) || taken {
            warn!(meal_id = %id, "duplicate meal id in plan document, assigning a new one");
            id = MealId::new();
            wire_id = None;
        }
        let wire_id = wire_id.unwrap_or_else(|| id.to_string());
        let options = document
            .options
            .iter()
            .map(|option| self.build_option(id, option, reuse_ids))
            .collect();
        self.meals.insert(
            id,
            Meal {
                id,
                wire_id,
                day,
                name: document.name.clone(),
                time: normalize_time(&document.time),
                notes: document.notes.clone(),
                options,
            },
        );
        id
    }

    fn build_option(&mut self, meal: MealId, document: &OptionDocument, reuse_ids: bool) -> OptionId {
        let mut wire_id = document.id.clone().filter(|_| reuse_ids);
        let mut id = OptionId::from_wire(wire_id.as_deref());
        let taken = wire_id
            .as_deref()
            .is_some_and(|raw| self.options.values().any(|option| option.wire_id == raw));
        if self.options.contains_key(&id) || taken {
            warn!(option_id = %id, "duplicate option id in plan document, assigning a new one");
            id = OptionId::new();
            wire_id = None;
        }
        let wire_id = wire_id.unwrap_or_else(|| id.to_string());
        let dietary = document
            .dietary
            .iter()
            .filter_map(|raw| match raw.parse::<DietaryTag>() {
                Ok(tag) => Some(tag),
                Err(error) => {
                    warn!(option_id = %id, %error, "dropping dietary tag outside the vocabulary");
                    None
                }
            })
            .collect();
        let ingredients = document.ingredients.as_ref().map(|items| {
            items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect()
        });
        self.options.insert(
            id,
            MealOption {
                id,
                wire_id,
                meal,
                name: document.name.clone(),
                macros: Macros::new(document.calories, document.protein, document.carbs, document.fat),
                description: document.description.clone(),
                recommendation: document.recommendation.as_deref().and_then(optional_text),
                dietary,
                ingredients,
                image: document.image.as_deref().and_then(optional_text),
            },
        );
        id
    }

    fn day_document(&self, day: &Day) -> DayDocument {
        DayDocument {
            id: Some(day.wire_id.clone()),
            name: day.name.clone(),
            is_rest_day: day.is_rest_day,
            description: day.description.clone(),
            meals: day
                .meals
                .iter()
                .filter_map(|meal_id| self.meals.get(meal_id))
                .map(|meal| self.meal_document(meal))
                .collect(),
        }
    }

    fn meal_document(&self, meal: &Meal) -> MealDocument {
        MealDocument {
            id: Some(meal.wire_id.clone()),
            name: meal.name.clone(),
            time: meal.time.clone(),
            notes: meal.notes.clone(),
            options: meal
                .options
                .iter()
                .filter_map(|option_id| self.options.get(option_id))
                .map(option_document)
                .collect(),
        }
    }
}

fn flip_tag(tags: &mut BTreeSet<DietaryTag>, tag: DietaryTag) {
    if !tags.remove(&tag) {
        tags.insert(tag);
    }
}

fn option_document(option: &MealOption) -> OptionDocument {
    OptionDocument {
        id: Some(option.wire_id.clone()),
        name: option.name.clone(),
        calories: option.macros.calories,
        protein: option.macros.protein,
        carbs: option.macros.carbs,
        fat: option.macros.fat,
        description: option.description.clone(),
        recommendation: option.recommendation.clone(),
        dietary: option
            .dietary
            .iter()
            .map(|tag| tag.as_str().to_owned())
            .collect(),
        ingredients: option.ingredients.clone(),
        image: option.image.clone(),
    }
}
