// ABOUTME: coachplan-cli - command-line access to a client's assigned nutrition plan
// ABOUTME: Shows the plan, watches client progress and edits the notes/supplementation side channels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! export COACHPLAN_API_BASE_URL=https://api.example.com/v1
//! export COACHPLAN_API_TOKEN=...
//!
//! # Print the plan with per-day macros
//! coachplan-cli --client c-42 --plan p-7 show
//!
//! # Show today's progress once, or keep polling until Ctrl-C
//! coachplan-cli --client c-42 --plan p-7 progress
//! coachplan-cli --client c-42 --plan p-7 progress --date 2025-03-14 --watch
//!
//! # Replace the trainer notes and save
//! coachplan-cli --client c-42 --plan p-7 notes "Drink 3L of water daily"
//!
//! # Sort a day's meals by time and save
//! coachplan-cli --client c-42 --plan p-7 sort --day 0
//! ```

mod commands;
mod helpers;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use coachplan_editor::{
    config::EditorConfig,
    errors::{AppError, AppResult},
    logging::LoggingConfig,
    session::EditorLoader,
    store::{PlanKey, RestPlanStore},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "coachplan-cli",
    about = "Coach nutrition plan editor CLI",
    long_about = "Inspect and edit a client's assigned nutrition plan and follow their progress."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Coaching request (client) identifier
    #[arg(long, global = true)]
    client: Option<String>,

    /// Assigned plan identifier
    #[arg(long, global = true)]
    plan: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plan tree, side channels and planned macros
    Show,

    /// Show the client's progress for a date
    Progress {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Keep polling and print every update until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Replace the trainer notes and save
    Notes {
        /// New notes text
        text: String,
    },

    /// Replace the supplementation text and save
    Supplementation {
        /// New supplementation text
        text: String,
    },

    /// Sort a day's meals by scheduled time and save
    Sort {
        /// Day index (0-based)
        #[arg(long)]
        day: usize,
    },
}

fn plan_key(cli: &Cli) -> AppResult<PlanKey> {
    let client = cli
        .client
        .clone()
        .ok_or_else(|| AppError::invalid_input("--client is required"))?;
    let plan = cli
        .plan
        .clone()
        .ok_or_else(|| AppError::invalid_input("--plan is required"))?;
    Ok(PlanKey::new(client, plan))
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose)
        .init()
        .map_err(|e| AppError::internal(format!("logging initialization failed: {e}")))?;

    let config = EditorConfig::from_env()?;
    let key = plan_key(&cli)?;
    let store = Arc::new(RestPlanStore::new(&config.api));
    let today = chrono::Local::now().date_naive();
    info!(plan = %key, "coachplan-cli");

    match cli.command {
        Command::Show => {
            let editor = EditorLoader::new(store, key).load(today).await?;
            commands::plan::show(&editor);
        }
        Command::Progress { date, watch } => {
            let date = date.unwrap_or(today);
            if watch {
                commands::progress::watch(store, key, date, &config.polling).await?;
            } else {
                commands::progress::once(store.as_ref(), &key, date).await;
            }
        }
        Command::Notes { text } => {
            let editor = EditorLoader::new(store, key).load(today).await?;
            commands::plan::set_notes(&editor, &text).await?;
        }
        Command::Supplementation { text } => {
            let editor = EditorLoader::new(store, key).load(today).await?;
            commands::plan::set_supplementation(&editor, &text).await?;
        }
        Command::Sort { day } => {
            let editor = EditorLoader::new(store, key).load(today).await?;
            commands::plan::sort(&editor, day).await?;
        }
    }

    Ok(())
}
