// ABOUTME: Read-only aggregates over the plan tree: counters, planned macros, completion
// ABOUTME: Rest days are excluded from every meal-count based figure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{DayId, MealId, PlanTree};
use crate::models::{Macros, ProgressSnapshot};
use std::collections::HashSet;

/// Plan-wide structure counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanCounters {
    /// Days that are not rest days
    pub training_days: usize,
    /// Rest days
    pub rest_days: usize,
    /// Meals on training days
    pub meals: usize,
    /// Options on training days
    pub options: usize,
}

/// How much of a day's plan the client has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCompletion {
    /// Planned meals with at least one completed entry
    pub completed: usize,
    /// Planned meals
    pub total: usize,
}

impl DayCompletion {
    /// Completion percentage (0-100); an empty day counts as 0
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }
}

impl PlanTree {
    /// Count days, meals and options; rest-day meals are not counted
    #[must_use]
    pub fn counters(&self) -> PlanCounters {
        let mut counters = PlanCounters::default();
        for day in &self.days {
            if day.is_rest_day {
                counters.rest_days += 1;
                continue;
            }
            counters.training_days += 1;
            counters.meals += day.meals.len();
            counters.options += day
                .meals
                .iter()
                .filter_map(|meal_id| self.meals.get(meal_id))
                .map(|meal| meal.options.len())
                .sum::<usize>();
        }
        counters
    }

    /// Average macros across a meal's options (the client eats one of them)
    #[must_use]
    pub fn meal_macros(&self, meal_id: MealId) -> Macros {
        let mut count = 0u32;
        let total: Macros = self
            .options_of(meal_id)
            .inspect(|_| count += 1)
            .map(|option| option.macros)
            .sum();
        total.average(count)
    }

    /// Planned macros for a day: sum of per-meal averages
    #[must_use]
    pub fn day_macros(&self, day_id: DayId) -> Macros {
        self.day(day_id)
            .map(|day| day.meals.iter().map(|meal_id| self.meal_macros(*meal_id)).sum::<Macros>())
            .unwrap_or_default()
    }

    /// Completion of a day against a progress snapshot
    ///
    /// Returns `None` for rest days and unknown ids: no completion math is shown
    /// for them. Meals are matched by name against the snapshot's completed meals.
    #[must_use]
    pub fn day_completion(&self, day_id: DayId, snapshot: &ProgressSnapshot) -> Option<DayCompletion> {
        let day = self.day(day_id)?;
        if day.is_rest_day {
            return None;
        }
        let done: HashSet<&str> = snapshot.completed_meal_names().collect();
        let completed = self
            .meals_of(day_id)
            .filter(|meal| done.contains(meal.name.as_str()))
            .count();
        Some(DayCompletion {
            completed,
            total: day.meals.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompletedMeal, MealDocument, OptionDocument};
    use crate::tree::DayField;
    use chrono::NaiveDate;

    fn option(calories: u32, protein: u32) -> OptionDocument {
        OptionDocument {
            name: format!("{calories} kcal"),
            calories,
            protein,
            ..OptionDocument::default()
        }
    }

    fn sample() -> PlanTree {
        let mut tree = PlanTree::new("p1", "Plan");
        tree.add_day("Training");
        tree.add_day("Rest");
        for day_index in 0..2 {
            for name in ["Breakfast", "Lunch"] {
                let meal = MealDocument {
                    name: name.into(),
                    options: vec![option(400, 30), option(600, 50)],
                    ..MealDocument::default()
                };
                tree.add_meal(day_index, &meal).unwrap();
            }
        }
        let rest = tree.day_id_at(1).unwrap();
        tree.set_day_field(rest, DayField::RestDay, "true");
        tree
    }

    fn snapshot(meals: &[&str]) -> ProgressSnapshot {
        let mut snapshot =
            ProgressSnapshot::not_tracked(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        snapshot.has_active_tracking = true;
        snapshot.completed_meals = meals
            .iter()
            .map(|name| CompletedMeal {
                meal_name: (*name).to_owned(),
                option_name: String::new(),
                completed_at: None,
                macros: Macros::default(),
            })
            .collect();
        snapshot
    }

    #[test]
    fn test_counters_skip_rest_days() {
        let counters = sample().counters();
        assert_eq!(
            counters,
            PlanCounters {
                training_days: 1,
                rest_days: 1,
                meals: 2,
                options: 4,
            }
        );
    }

    #[test]
    fn test_planned_macros_average_options() {
        let tree = sample();
        let day = tree.day_id_at(0).unwrap();
        let meal = tree.meal_id_at(0, 0).unwrap();
        assert_eq!(tree.meal_macros(meal), Macros::new(500, 40, 0, 0));
        assert_eq!(tree.day_macros(day), Macros::new(1000, 80, 0, 0));
    }

    #[test]
    fn test_rest_day_has_no_completion() {
        let tree = sample();
        let progress = snapshot(&["Breakfast", "Lunch"]);
        assert!(tree
            .day_completion(tree.day_id_at(1).unwrap(), &progress)
            .is_none());
    }

    #[test]
    fn test_training_day_completion() {
        let tree = sample();
        let completion = tree
            .day_completion(tree.day_id_at(0).unwrap(), &snapshot(&["Breakfast"]))
            .unwrap();
        assert_eq!(completion, DayCompletion { completed: 1, total: 2 });
        assert!((completion.percent() - 50.0).abs() < f64::EPSILON);
    }
}
