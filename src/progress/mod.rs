// ABOUTME: Cancellable periodic poller for the client's progress on the selected date
// ABOUTME: Publishes display state over a watch channel; 404 and failures become distinct placeholders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Client progress polling
//!
//! [`ProgressPoller::start`] spawns one task per editing view. The returned
//! [`PollerHandle`] is the only way to drive it; dropping the handle aborts the
//! task, so a torn-down view can never leave a timer running.
//!
//! Fetches run one at a time inside the task loop, so a slow response for an
//! old date can never overwrite the display for a newer one. The selected date
//! and mode travel on a watch channel: changes made while a fetch is in flight
//! collapse into the latest value and are picked up as soon as it completes.

use crate::config::PollingConfig;
use crate::constants::{messages, polling};
use crate::errors::StoreError;
use crate::models::ProgressSnapshot;
use crate::store::{PlanKey, PlanStore, ProgressFetch};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Whether progress is refreshed on a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// Fetch on start, on date change and every interval
    #[default]
    Automatic,
    /// Fetch on start, on date change and on explicit refresh only
    Manual,
}

/// What the progress panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressDisplay {
    /// A fetch for this date has not completed yet
    Loading {
        /// Date being fetched
        date: NaiveDate,
    },
    /// The client is tracking this date
    Tracked(ProgressSnapshot),
    /// The client has not started this date
    NotTracked(ProgressSnapshot),
    /// The fetch failed; editing is unaffected
    Unavailable(ProgressSnapshot),
}

impl ProgressDisplay {
    /// Date the display refers to
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Loading { date } => *date,
            Self::Tracked(snapshot) | Self::NotTracked(snapshot) | Self::Unavailable(snapshot) => {
                snapshot.date
            }
        }
    }

    /// Snapshot backing the display, placeholders included
    #[must_use]
    pub const fn snapshot(&self) -> Option<&ProgressSnapshot> {
        match self {
            Self::Loading { .. } => None,
            Self::Tracked(snapshot) | Self::NotTracked(snapshot) | Self::Unavailable(snapshot) => {
                Some(snapshot)
            }
        }
    }

    /// Status line for placeholders
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Loading { .. } => Some(messages::PROGRESS_LOADING),
            Self::Tracked(_) => None,
            Self::NotTracked(snapshot) | Self::Unavailable(snapshot) => snapshot.message.as_deref(),
        }
    }

    /// Whether a fetch for the current date has completed
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading { .. })
    }
}

/// Map a fetch result to display state
fn display_for(date: NaiveDate, fetched: Result<ProgressFetch, StoreError>) -> ProgressDisplay {
    match fetched {
        Ok(ProgressFetch::Tracked(snapshot)) if snapshot.has_active_tracking => {
            ProgressDisplay::Tracked(snapshot)
        }
        Ok(ProgressFetch::Tracked(mut snapshot)) => {
            if snapshot.message.as_deref().is_none_or(|text| text.trim().is_empty()) {
                snapshot.message = Some(messages::NOT_TRACKED_YET.to_owned());
            }
            ProgressDisplay::NotTracked(snapshot)
        }
        Ok(ProgressFetch::NotStarted) => {
            ProgressDisplay::NotTracked(ProgressSnapshot::not_tracked(date))
        }
        Err(error) => {
            warn!(%date, error = %error, "Progress fetch failed, showing placeholder");
            ProgressDisplay::Unavailable(ProgressSnapshot::unavailable(date))
        }
    }
}

/// Date and mode the task should be polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PollTarget {
    date: NaiveDate,
    mode: PollMode,
}

/// Builder for a progress polling task
pub struct ProgressPoller {
    store: Arc<dyn PlanStore>,
    key: PlanKey,
    interval: Duration,
    mode: PollMode,
}

impl ProgressPoller {
    /// Configure a poller from polling settings
    #[must_use]
    pub fn new(store: Arc<dyn PlanStore>, key: PlanKey, config: &PollingConfig) -> Self {
        let interval = if config.interval.is_zero() {
            Duration::from_secs(polling::DEFAULT_POLL_INTERVAL_SECS)
        } else {
            config.interval
        };
        Self {
            store,
            key,
            interval,
            mode: if config.auto_start {
                PollMode::Automatic
            } else {
                PollMode::Manual
            },
        }
    }

    /// Override the initial mode
    #[must_use]
    pub const fn with_mode(mut self, mode: PollMode) -> Self {
        self.mode = mode;
        self
    }

    /// One fetch outside any polling task
    pub async fn fetch_once(
        store: &dyn PlanStore,
        key: &PlanKey,
        date: NaiveDate,
    ) -> ProgressDisplay {
        display_for(date, store.fetch_progress(key, date).await)
    }

    /// Spawn the polling task for `date`
    ///
    /// The first fetch starts immediately. Must be called within a Tokio runtime.
    #[must_use]
    pub fn start(self, date: NaiveDate) -> PollerHandle {
        let (refresh_tx, refresh_rx) = mpsc::channel(polling::REFRESH_CHANNEL_CAPACITY);
        let (target_tx, target_rx) = watch::channel(PollTarget {
            date,
            mode: self.mode,
        });
        let (display_tx, display_rx) = watch::channel(ProgressDisplay::Loading { date });

        info!(
            plan = %self.key,
            %date,
            mode = ?self.mode,
            interval_secs = self.interval.as_secs(),
            "Starting progress poller"
        );

        let task = PollerTask {
            store: self.store,
            key: self.key,
            date,
            mode: self.mode,
            interval: self.interval,
            refresh: refresh_rx,
            target: target_rx,
            display: display_tx,
        };
        let join = tokio::spawn(task.run());

        PollerHandle {
            refresh: refresh_tx,
            target: target_tx,
            display: display_rx,
            task: Some(join),
        }
    }
}

struct PollerTask {
    store: Arc<dyn PlanStore>,
    key: PlanKey,
    date: NaiveDate,
    mode: PollMode,
    interval: Duration,
    refresh: mpsc::Receiver<()>,
    target: watch::Receiver<PollTarget>,
    display: watch::Sender<ProgressDisplay>,
}

impl PollerTask {
    async fn run(mut self) {
        self.fetch().await;
        let mut ticker = self.new_ticker();

        loop {
            tokio::select! {
                changed = self.target.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let target = *self.target.borrow_and_update();
                    self.retarget(target, &mut ticker).await;
                }
                request = self.refresh.recv() => {
                    if request.is_none() {
                        break;
                    }
                    self.fetch().await;
                    ticker.reset();
                }
                _ = ticker.tick(), if self.mode == PollMode::Automatic => {
                    self.fetch().await;
                }
            }
        }
        debug!(plan = %self.key, "Progress poller stopped");
    }

    async fn retarget(&mut self, target: PollTarget, ticker: &mut time::Interval) {
        let mode_changed = target.mode != self.mode;
        if mode_changed {
            debug!(plan = %self.key, mode = ?target.mode, "Progress poll mode changed");
            self.mode = target.mode;
            *ticker = self.new_ticker();
        }
        if target.date != self.date {
            self.date = target.date;
            self.display.send_replace(ProgressDisplay::Loading { date: target.date });
            self.fetch().await;
            ticker.reset();
        } else if mode_changed && target.mode == PollMode::Automatic {
            self.fetch().await;
        }
    }

    fn new_ticker(&self) -> time::Interval {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    async fn fetch(&self) {
        let date = self.date;
        let fetched = self.store.fetch_progress(&self.key, date).await;
        let display = display_for(date, fetched);
        debug!(plan = %self.key, %date, "Progress refreshed");
        self.display.send_replace(display);
    }
}

/// Owner handle for a running poller; dropping it cancels polling
#[derive(Debug)]
pub struct PollerHandle {
    refresh: mpsc::Sender<()>,
    target: watch::Sender<PollTarget>,
    display: watch::Receiver<ProgressDisplay>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    fn retarget(&self, update: impl FnOnce(&mut PollTarget)) -> bool {
        if self.target.is_closed() {
            warn!("Progress poller is not running, selection change not delivered");
            return false;
        }
        self.target.send_modify(update);
        true
    }

    /// Fetch now, regardless of mode
    ///
    /// A refresh requested while others are still queued is folded into them.
    pub fn refresh(&self) -> bool {
        match self.refresh.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => {
                warn!("Progress poller is not running, refresh not delivered");
                false
            }
        }
    }

    /// Switch to another date; fetches immediately
    ///
    /// Rapid changes collapse into the latest date. Returns `false` only when
    /// the polling task has stopped.
    pub fn set_date(&self, date: NaiveDate) -> bool {
        self.retarget(|target| target.date = date)
    }

    /// Switch between automatic and manual refresh
    pub fn set_mode(&self, mode: PollMode) -> bool {
        self.retarget(|target| target.mode = mode)
    }

    /// Watch display state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressDisplay> {
        self.display.clone()
    }

    /// Latest display state
    #[must_use]
    pub fn current(&self) -> ProgressDisplay {
        self.display.borrow().clone()
    }

    /// Whether the task is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(error) = task.await {
                if error.is_panic() {
                    warn!(error = %error, "Progress poller task panicked");
                }
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
