// ABOUTME: Integration tests for the PlanEditor facade
// ABOUTME: Covers the dirty invariant, index safety, coercion, sorting policy, selection and discard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use coachplan_editor::errors::ErrorCode;
use coachplan_editor::models::DietaryTag;
use coachplan_editor::session::{EditSession, SaveOutcome};
use coachplan_editor::tree::{DayField, MealField, OptionField};
use common::{
    empty_payload, init_test_logging, meal, open_editor, option, sample_payload, MockStore,
};
use std::sync::Arc;

fn setup(payload: coachplan_editor::models::AssignedPlanPayload) -> Arc<MockStore> {
    init_test_logging();
    Arc::new(MockStore::new(payload))
}

#[tokio::test]
async fn test_empty_plan_scenario_round_trips_through_save() {
    let store = setup(empty_payload());
    let editor = open_editor(&store);
    assert!(!editor.is_dirty());
    assert_eq!(editor.selected_day(), None);

    editor.add_day("Day 1");
    editor.add_meal(0, &meal("Breakfast", "08:00", Vec::new())).unwrap();
    editor.add_option(0, 0, &option("Omelette", 400, 30)).unwrap();

    assert!(editor.is_dirty());
    let tree = editor.tree();
    let option_id = tree.option_id_at(0, 0, 0).unwrap();
    assert_eq!(tree.option(option_id).unwrap().macros.calories, 400);

    let outcome = editor.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert!(!editor.is_dirty());

    let sent = serde_json::to_value(store.last_save().unwrap()).unwrap();
    assert_eq!(sent["planData"]["days"][0]["meals"][0]["options"][0]["calories"], 400);
    assert_eq!(sent["planData"]["days"][0]["meals"][0]["time"], "08:00");
}

#[test]
fn test_every_applied_operation_dirties_until_discard() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let mut dirty = editor.subscribe_dirty();
    assert!(!*dirty.borrow_and_update());

    assert!(editor.set_meal_field(0, 1, MealField::Name, "Early breakfast"));
    assert!(editor.is_dirty());
    assert!(dirty.has_changed().unwrap());
    assert!(*dirty.borrow_and_update());

    let option_id = editor.add_option(1, 0, &option("Granola", 250, 8)).unwrap();
    assert!(editor.add_dietary_tag(option_id, DietaryTag::Vegetarian));
    assert!(editor.remove_option(0, 0, 0));
    let brunch = meal("Brunch", "10:00", vec![option("Pancakes", 500, 15)]);
    assert!(editor.replace_meal(1, 0, &brunch));
    assert!(editor.remove_meal(0, 2));
    assert!(editor.is_dirty());

    assert!(editor.discard());
    assert!(!editor.is_dirty());
    assert!(!*dirty.borrow_and_update());
}

#[test]
fn test_out_of_range_edits_are_noops() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);

    assert!(editor.add_meal(9, &meal("Ghost", "", Vec::new())).is_none());
    assert!(!editor.remove_meal(0, 3));
    assert!(!editor.remove_option(0, 0, 5));
    assert!(!editor.set_option_field(4, 0, 0, OptionField::Calories, "100"));
    assert!(!editor.remove_day(3));
    assert!(!editor.is_dirty());
}

#[test]
fn test_remove_first_and_last_meal() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let before = editor.tree().day_at(0).unwrap().meal_ids().to_vec();

    assert!(editor.remove_meal(0, 2));
    assert!(editor.remove_meal(0, 0));

    let after = editor.tree().day_at(0).unwrap().meal_ids().to_vec();
    assert_eq!(after, vec![before[1]]);
}

#[test]
fn test_nutrition_input_is_coerced() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);

    assert!(editor.set_option_field(0, 1, 0, OptionField::Calories, "abc"));
    assert!(editor.set_option_field(0, 1, 0, OptionField::Protein, "12.9"));

    let tree = editor.tree();
    let option = tree.option(tree.option_id_at(0, 1, 0).unwrap()).unwrap();
    assert_eq!(option.macros.calories, 0);
    assert_eq!(option.macros.protein, 12);
}

#[test]
fn test_ingredients_are_trimmed_and_rejoined() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let option_id = editor.tree().option_id_at(0, 0, 0).unwrap();

    assert!(editor.set_option_field_by_id(
        option_id,
        OptionField::Ingredients,
        "egg, spinach ,  toast"
    ));
    let tree = editor.tree();
    assert_eq!(
        tree.option(option_id).unwrap().ingredients.as_deref(),
        Some(&["egg".to_owned(), "spinach".to_owned(), "toast".to_owned()][..])
    );

    let joined = tree.ingredients_text(option_id).unwrap();
    assert!(editor.set_option_field_by_id(option_id, OptionField::Ingredients, &joined));
    assert_eq!(editor.tree().ingredients_text(option_id).unwrap(), joined);
}

#[test]
fn test_display_order_follows_time_only_while_clean() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let names = |ids: Vec<coachplan_editor::tree::MealId>| -> Vec<String> {
        let tree = editor.tree();
        ids.into_iter()
            .map(|id| tree.meal(id).unwrap().name.clone())
            .collect()
    };

    assert_eq!(names(editor.meals_for_display(0)), ["Breakfast", "Lunch", "Dinner"]);

    editor.set_notes("Adjusted portions");
    assert_eq!(names(editor.meals_for_display(0)), ["Lunch", "Breakfast", "Dinner"]);
}

#[test]
fn test_sort_requires_clean_document() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);

    assert!(!editor.sort_meals_by_time(1).unwrap());
    assert!(!editor.is_dirty());

    assert!(editor.sort_meals_by_time(0).unwrap());
    assert!(editor.is_dirty());
    let tree = editor.tree();
    let first = tree.meal(tree.meal_id_at(0, 0).unwrap()).unwrap();
    assert_eq!(first.name, "Breakfast");

    let error = editor.sort_meals_by_time(0).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceLocked);
}

#[test]
fn test_sort_unknown_day() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let error = editor.sort_meals_by_time(7).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_selected_day_stays_in_range() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    assert_eq!(editor.selected_day(), Some(0));

    assert!(editor.select_day(2));
    assert!(!editor.select_day(3));
    assert_eq!(editor.selected_day(), Some(2));

    assert!(editor.remove_day(2));
    assert_eq!(editor.selected_day(), Some(1));

    assert!(editor.remove_day(0));
    assert!(editor.remove_day(0));
    assert_eq!(editor.selected_day(), None);

    editor.add_day("  ");
    assert_eq!(editor.selected_day(), Some(0));
    assert_eq!(editor.tree().day_at(0).unwrap().name, "Day 1");
}

#[test]
fn test_discard_restores_last_saved_state() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let original = editor.tree();

    editor.set_supplementation("Magnesium 300mg");
    editor.duplicate_day(0).unwrap();
    editor.set_day_field(1, DayField::Name, "Renamed");
    assert!(editor.is_dirty());
    assert!(!editor.read(EditSession::matches_baseline));

    assert!(editor.discard());
    assert!(!editor.is_dirty());
    assert_eq!(editor.tree(), original);
    assert_eq!(editor.supplementation(), "Creatine 5g");
    assert!(editor.read(EditSession::matches_baseline));
}

#[tokio::test]
async fn test_discard_after_save_keeps_saved_edits() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);

    editor.set_notes("Saved notes");
    editor.save().await.unwrap();
    editor.set_notes("Unsaved notes");

    assert!(editor.discard());
    assert_eq!(editor.notes(), "Saved notes");
    assert!(!editor.is_dirty());
}

#[test]
fn test_rest_day_toggle_keeps_meals() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);

    assert!(editor.set_day_field(0, DayField::RestDay, "true"));
    let tree = editor.tree();
    assert_eq!(tree.day_at(0).unwrap().meal_ids().len(), 3);

    let counters = tree.counters();
    assert_eq!(counters.training_days, 1);
    assert_eq!(counters.rest_days, 2);
    assert_eq!(counters.meals, 1);

    assert!(editor.set_day_field(0, DayField::RestDay, "false"));
    assert_eq!(editor.tree().counters().meals, 4);
}

#[test]
fn test_dietary_tags_add_and_remove() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let option_id = editor.tree().option_id_at(0, 1, 1).unwrap();

    assert!(editor.add_dietary_tag(option_id, DietaryTag::GlutenFree));
    assert!(editor.toggle_dietary_tag(option_id, DietaryTag::HighProtein));
    assert!(editor.remove_dietary_tag(option_id, DietaryTag::GlutenFree));

    let tree = editor.tree();
    let tags: Vec<DietaryTag> = tree.option(option_id).unwrap().dietary.iter().copied().collect();
    assert_eq!(tags, vec![DietaryTag::HighProtein]);
}

#[test]
fn test_held_ids_survive_earlier_removals() {
    let store = setup(sample_payload());
    let editor = open_editor(&store);
    let dinner = editor.tree().meal_id_at(0, 2).unwrap();

    assert!(editor.remove_meal(0, 0));
    assert!(editor.set_meal_field_by_id(dinner, MealField::Time, "7:05"));

    let tree = editor.tree();
    let meal = tree.meal(dinner).unwrap();
    assert_eq!(meal.name, "Dinner");
    assert_eq!(meal.time, "07:05");
    assert_eq!(tree.meal_position(dinner), Some((0, 1)));
}

#[tokio::test]
async fn test_save_writes_back_loaded_element_ids() {
    let mut payload = empty_payload();
    payload.plan_data = serde_json::from_str(
        r#"{"id":"plan-7","days":[{"id":"day-1","name":"Mon","meals":[{"id":"meal-3","name":"Lunch","time":"12:00","options":[{"id":7,"name":"Bowl"}]}]}]}"#,
    )
    .unwrap();
    let store = setup(payload);
    let editor = open_editor(&store);

    assert!(editor.set_meal_field(0, 0, MealField::Notes, "No sauce"));
    editor.add_meal(0, &meal("Dinner", "19:00", Vec::new())).unwrap();
    editor.save().await.unwrap();

    let saved = store.last_save().unwrap().plan_data;
    let day = &saved.days[0];
    assert_eq!(day.id.as_deref(), Some("day-1"));
    assert_eq!(day.meals[0].id.as_deref(), Some("meal-3"));
    assert_eq!(day.meals[0].notes, "No sauce");
    assert_eq!(day.meals[0].options[0].id.as_deref(), Some("7"));
    assert!(day.meals[1].id.as_deref().is_some_and(|id| id != "meal-3"));
}
