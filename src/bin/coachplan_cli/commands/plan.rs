// ABOUTME: Plan commands for coachplan-cli: show, side-channel edits and meal sorting
// ABOUTME: Every edit goes through the PlanEditor facade and is committed with one save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use coachplan_editor::{
    errors::AppResult,
    session::{PlanEditor, SaveOutcome},
};
use tracing::info;

use crate::helpers::display::{display_plan, display_save_outcome};

/// Print the plan as the editor would show it
pub fn show(editor: &PlanEditor) {
    display_plan(editor);
}

/// Replace the trainer notes and save
pub async fn set_notes(editor: &PlanEditor, text: &str) -> AppResult<()> {
    editor.set_notes(text);
    save(editor, "notes").await
}

/// Replace the supplementation text and save
pub async fn set_supplementation(editor: &PlanEditor, text: &str) -> AppResult<()> {
    editor.set_supplementation(text);
    save(editor, "supplementation").await
}

/// Sort a day's meals by time, saving only if the order changed
pub async fn sort(editor: &PlanEditor, day_index: usize) -> AppResult<()> {
    if !editor.sort_meals_by_time(day_index)? {
        println!("Meals of day {day_index} are already in time order.");
        return Ok(());
    }
    save(editor, "meal order").await
}

async fn save(editor: &PlanEditor, what: &str) -> AppResult<()> {
    info!(plan = %editor.key(), what, "Saving plan");
    let outcome = editor.save().await?;
    display_save_outcome(what, outcome);
    if outcome == SaveOutcome::AlreadySaving {
        info!("A save was already in flight");
    }
    Ok(())
}
