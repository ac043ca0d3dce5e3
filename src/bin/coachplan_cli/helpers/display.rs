// ABOUTME: Output formatting helpers for coachplan-cli
// ABOUTME: Renders the plan tree, planned macros, save outcomes and progress placeholders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use coachplan_editor::{
    models::Macros,
    progress::ProgressDisplay,
    session::{PlanEditor, SaveOutcome},
};

fn format_macros(macros: Macros) -> String {
    format!(
        "{} kcal | P {}g | C {}g | F {}g",
        macros.calories, macros.protein, macros.carbs, macros.fat
    )
}

/// Print the plan header, days, meals and options
pub fn display_plan(editor: &PlanEditor) {
    let client = editor.client();
    let notes = editor.notes();
    let supplementation = editor.supplementation();
    let tree = editor.tree();

    println!("\n{} ({})", tree.title(), client.name);
    println!("{}", "=".repeat(60));
    println!("Target: {}", format_macros(tree.target_macros()));

    let counters = tree.counters();
    println!(
        "Days: {} training, {} rest | Meals: {} | Options: {}",
        counters.training_days, counters.rest_days, counters.meals, counters.options
    );

    for (day_index, day) in tree.days().iter().enumerate() {
        println!();
        if day.is_rest_day {
            println!("[{day_index}] {} (rest day)", day.name);
            continue;
        }
        println!(
            "[{day_index}] {} - planned {}",
            day.name,
            format_macros(tree.day_macros(day.id))
        );
        for meal_id in editor.meals_for_display(day_index) {
            let Some(meal) = tree.meal(meal_id) else {
                continue;
            };
            let time = if meal.time.is_empty() { "--:--" } else { meal.time.as_str() };
            println!("    {time}  {}", meal.name);
            for option in tree.options_of(meal_id) {
                println!("        - {} ({})", option.name, format_macros(option.macros));
                if !option.dietary.is_empty() {
                    let tags: Vec<&str> = option.dietary.iter().map(|tag| tag.label()).collect();
                    println!("          {}", tags.join(", "));
                }
                if let Some(ingredients) = tree.ingredients_text(option.id) {
                    println!("          Ingredients: {ingredients}");
                }
            }
        }
    }

    println!("\nNotes:");
    println!("{}", if notes.is_empty() { "(none)" } else { notes.as_str() });
    println!("\nSupplementation:");
    println!(
        "{}",
        if supplementation.is_empty() {
            "(none)"
        } else {
            supplementation.as_str()
        }
    );
}

/// Print the result of a save
pub fn display_save_outcome(what: &str, outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Saved => println!("Saved {what}."),
        SaveOutcome::SavedWithPendingEdits => {
            println!("Saved {what}; newer edits are still unsaved.");
        }
        SaveOutcome::AlreadySaving => println!("A save is already in progress."),
    }
}

/// Print progress, or the placeholder message when there is none
pub fn display_progress(display: &ProgressDisplay) {
    println!("\nProgress for {}", display.date().format("%Y-%m-%d"));
    println!("{}", "-".repeat(40));
    match display {
        ProgressDisplay::Tracked(snapshot) => {
            println!(
                "Completion: {:.0}% ({}/{})",
                snapshot.completion_percent(),
                snapshot.completed_count,
                snapshot.total_count
            );
            println!("Consumed: {}", format_macros(snapshot.consumed));
            println!(
                "Water: {:.1} / {:.1}",
                snapshot.water.current, snapshot.water.goal
            );
            for meal in &snapshot.completed_meals {
                let at = meal
                    .completed_at
                    .map(|time| time.format("%H:%M").to_string())
                    .unwrap_or_default();
                println!("  done {at:>5}  {} - {}", meal.meal_name, meal.option_name);
            }
            for snack in &snapshot.snacks {
                println!("  snack       {} ({} kcal)", snack.name, snack.macros.calories);
            }
        }
        other => println!("{}", other.message().unwrap_or_default()),
    }
}
