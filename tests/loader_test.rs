// ABOUTME: Tests for the editor load sequence and its blocking failure mode
// ABOUTME: Covers client and plan fetch failures, retry and the freshly loaded session state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use coachplan_editor::errors::{ErrorCode, ErrorPresentation};
use coachplan_editor::session::EditorLoader;
use coachplan_editor::store::PlanStore;
use common::{init_test_logging, plan_key, sample_payload, today, MockStore};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn loader(store: &Arc<MockStore>) -> EditorLoader {
    init_test_logging();
    let store: Arc<dyn PlanStore> = store.clone();
    EditorLoader::new(store, plan_key())
}

#[tokio::test]
async fn test_load_opens_clean_session() {
    let store = Arc::new(MockStore::new(sample_payload()));
    let editor = loader(&store).load(today()).await.unwrap();

    assert!(!editor.is_dirty());
    assert!(!editor.is_saving());
    assert_eq!(editor.client().id, "client-42");
    assert_eq!(editor.tree().days().len(), 3);
    assert_eq!(editor.notes(), "Hit protein first");
    assert_eq!(editor.selected_day(), Some(0));
    assert_eq!(editor.selected_date(), today());
}

#[tokio::test]
async fn test_client_failure_blocks_and_retry_recovers() {
    let store = Arc::new(MockStore::new(sample_payload()));
    store.fail_client.store(true, Ordering::SeqCst);
    let loader = loader(&store);

    let error = loader.load(today()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::LoadFailed);
    assert_eq!(error.presentation(), ErrorPresentation::Blocking);

    store.fail_client.store(false, Ordering::SeqCst);
    let editor = loader.load(today()).await.unwrap();
    assert_eq!(loader.attempts(), 2);
    assert!(!editor.is_dirty());
}

#[tokio::test]
async fn test_plan_failure_after_client_success_is_blocking() {
    let store = Arc::new(MockStore::new(sample_payload()));
    store.fail_load.store(true, Ordering::SeqCst);

    let error = loader(&store).load(today()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::LoadFailed);
    assert_eq!(error.presentation(), ErrorPresentation::Blocking);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_reload_reflects_saved_plan() {
    let store = Arc::new(MockStore::new(sample_payload()));
    let loader = loader(&store);

    let editor = loader.load(today()).await.unwrap();
    editor.set_title("Maintenance");
    editor.save().await.unwrap();

    let reloaded = loader.load(today()).await.unwrap();
    assert_eq!(reloaded.tree().title(), "Maintenance");
    assert!(!reloaded.is_dirty());
}
