// ABOUTME: Progress commands for coachplan-cli: one-shot fetch and a polling watch loop
// ABOUTME: Watch stops on Ctrl-C and shuts the poller down before exiting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use coachplan_editor::{
    config::PollingConfig,
    errors::{AppError, AppResult},
    progress::ProgressPoller,
    store::{PlanKey, PlanStore},
};
use std::sync::Arc;
use tracing::info;

use crate::helpers::display::display_progress;

/// Fetch and print progress once
pub async fn once(store: &dyn PlanStore, key: &PlanKey, date: NaiveDate) {
    let display = ProgressPoller::fetch_once(store, key, date).await;
    display_progress(&display);
}

/// Poll progress and print each update until Ctrl-C
pub async fn watch(
    store: Arc<dyn PlanStore>,
    key: PlanKey,
    date: NaiveDate,
    polling: &PollingConfig,
) -> AppResult<()> {
    let handle = ProgressPoller::new(store, key, polling).start(date);
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let display = updates.borrow_and_update().clone();
                if display.is_settled() {
                    display_progress(&display);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|e| AppError::internal(format!("signal handler failed: {e}")))?;
                info!("Stopping progress watch");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
