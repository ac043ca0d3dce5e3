// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, an in-memory PlanStore with scripted responses, and sample plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs
)]
//! Shared test utilities for `coachplan_editor`

use async_trait::async_trait;
use chrono::NaiveDate;
use coachplan_editor::{
    errors::StoreError,
    models::{
        AssignedPlanPayload, ClientProfile, DayDocument, Macros, MealDocument, OptionDocument,
        PlanDocument, ProgressAvailability, ProgressSnapshot,
    },
    session::PlanEditor,
    store::{PlanKey, PlanStore, ProgressFetch},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::Semaphore;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn today() -> NaiveDate {
    date(2025, 3, 14)
}

pub fn plan_key() -> PlanKey {
    PlanKey::new("client-42", "plan-7")
}

pub fn client_profile() -> ClientProfile {
    ClientProfile {
        id: "client-42".into(),
        name: "Alex Client".into(),
        ..ClientProfile::default()
    }
}

pub fn option(name: &str, calories: u32, protein: u32) -> OptionDocument {
    OptionDocument {
        name: name.into(),
        calories,
        protein,
        ..OptionDocument::default()
    }
}

pub fn meal(name: &str, time: &str, options: Vec<OptionDocument>) -> MealDocument {
    MealDocument {
        name: name.into(),
        time: time.into(),
        options,
        ..MealDocument::default()
    }
}

/// Plan with no days
pub fn empty_payload() -> AssignedPlanPayload {
    AssignedPlanPayload {
        plan_data: PlanDocument {
            id: "plan-7".into(),
            title: "Lean bulk".into(),
            target_macros: Macros::new(2600, 180, 300, 80),
            days: Vec::new(),
        },
        notes: String::new(),
        supplementation: String::new(),
    }
}

/// Two training days with meals deliberately stored out of time order, plus a rest day
pub fn sample_payload() -> AssignedPlanPayload {
    let mut payload = empty_payload();
    payload.plan_data.days = vec![
        DayDocument {
            name: "Monday".into(),
            meals: vec![
                meal("Lunch", "12:30", vec![option("Chicken rice", 650, 45)]),
                meal(
                    "Breakfast",
                    "07:30",
                    vec![option("Oats", 400, 20), option("Eggs", 350, 25)],
                ),
                meal("Dinner", "19:00", vec![option("Salmon", 700, 50)]),
            ],
            ..DayDocument::default()
        },
        DayDocument {
            name: "Tuesday".into(),
            meals: vec![meal("Breakfast", "08:00", vec![option("Yogurt", 300, 20)])],
            ..DayDocument::default()
        },
        DayDocument {
            name: "Rest".into(),
            is_rest_day: true,
            ..DayDocument::default()
        },
    ];
    payload.notes = "Hit protein first".into();
    payload.supplementation = "Creatine 5g".into();
    payload
}

/// Scripted progress answer for one date
#[derive(Debug, Clone)]
pub enum ProgressResponse {
    Snapshot(ProgressSnapshot),
    NotFound,
    ServerError,
}

/// In-memory `PlanStore` with scripted failures, an optional save gate and progress latency
pub struct MockStore {
    pub plan: Mutex<AssignedPlanPayload>,
    pub fail_client: AtomicBool,
    pub fail_load: AtomicBool,
    pub fail_save: AtomicBool,
    pub saves: Mutex<Vec<AssignedPlanPayload>>,
    pub save_calls: AtomicUsize,
    pub progress: Mutex<HashMap<NaiveDate, ProgressResponse>>,
    pub progress_requests: Mutex<Vec<NaiveDate>>,
    save_gate: Option<Arc<Semaphore>>,
    progress_delay: Option<Duration>,
}

impl MockStore {
    pub fn new(plan: AssignedPlanPayload) -> Self {
        Self {
            plan: Mutex::new(plan),
            fail_client: AtomicBool::new(false),
            fail_load: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            saves: Mutex::new(Vec::new()),
            save_calls: AtomicUsize::new(0),
            progress: Mutex::new(HashMap::new()),
            progress_requests: Mutex::new(Vec::new()),
            save_gate: None,
            progress_delay: None,
        }
    }

    /// Saves block until `gate` receives a permit
    pub fn with_save_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.save_gate = Some(gate);
        self
    }

    /// Progress fetches take `delay` to answer
    pub const fn with_progress_delay(mut self, delay: Duration) -> Self {
        self.progress_delay = Some(delay);
        self
    }

    pub fn set_progress(&self, date: NaiveDate, response: ProgressResponse) {
        self.progress.lock().unwrap().insert(date, response);
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn last_save(&self) -> Option<AssignedPlanPayload> {
        self.saves.lock().unwrap().last().cloned()
    }

    pub fn progress_fetches(&self) -> usize {
        self.progress_requests.lock().unwrap().len()
    }

    pub fn progress_dates(&self) -> Vec<NaiveDate> {
        self.progress_requests.lock().unwrap().clone()
    }

    fn failure(endpoint: &str, status: u16) -> StoreError {
        StoreError::UnexpectedStatus {
            endpoint: endpoint.to_owned(),
            status,
            body: Some("scripted failure".into()),
        }
    }
}

#[async_trait]
impl PlanStore for MockStore {
    async fn fetch_client(&self, client_id: &str) -> Result<ClientProfile, StoreError> {
        if self.fail_client.load(Ordering::SeqCst) {
            return Err(StoreError::RequestFailed {
                endpoint: format!("/coaching-requests/{client_id}"),
                reason: "connection refused".into(),
            });
        }
        Ok(ClientProfile {
            id: client_id.to_owned(),
            ..client_profile()
        })
    }

    async fn load_plan(&self, _key: &PlanKey) -> Result<AssignedPlanPayload, StoreError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(Self::failure("/assigned-nutrition-plan", 500));
        }
        Ok(self.plan.lock().unwrap().clone())
    }

    async fn save_plan(
        &self,
        _key: &PlanKey,
        payload: &AssignedPlanPayload,
    ) -> Result<(), StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.save_gate {
            gate.acquire().await.expect("gate open").forget();
        }
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Self::failure("/assigned-nutrition-plan", 503));
        }
        self.saves.lock().unwrap().push(payload.clone());
        *self.plan.lock().unwrap() = payload.clone();
        Ok(())
    }

    async fn fetch_progress(
        &self,
        _key: &PlanKey,
        date: NaiveDate,
    ) -> Result<ProgressFetch, StoreError> {
        self.progress_requests.lock().unwrap().push(date);
        if let Some(delay) = self.progress_delay {
            tokio::time::sleep(delay).await;
        }
        let response = self
            .progress
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or(ProgressResponse::NotFound);
        match response {
            ProgressResponse::Snapshot(snapshot) => Ok(ProgressFetch::Tracked(snapshot)),
            ProgressResponse::NotFound => Ok(ProgressFetch::NotStarted),
            ProgressResponse::ServerError => Err(Self::failure("/client-progress", 500)),
        }
    }
}

/// Editor over the store's current plan
pub fn open_editor(store: &Arc<MockStore>) -> PlanEditor {
    let payload = store.plan.lock().unwrap().clone();
    let store: Arc<dyn PlanStore> = store.clone();
    PlanEditor::new(store, plan_key(), client_profile(), &payload, today())
}

/// Tracked snapshot for a date
pub fn tracked_snapshot(date: NaiveDate, completed: u32, total: u32) -> ProgressSnapshot {
    let mut snapshot = ProgressSnapshot::not_tracked(date);
    snapshot.has_active_tracking = true;
    snapshot.message = None;
    snapshot.availability = ProgressAvailability::Tracked;
    snapshot.completed_count = completed;
    snapshot.total_count = total;
    snapshot.completion_rate = if total == 0 {
        0.0
    } else {
        f64::from(completed) / f64::from(total) * 100.0
    };
    snapshot
}
