// ABOUTME: REST implementation of PlanStore over the coaching-requests API
// ABOUTME: Handles bearer auth, response envelopes, 404-as-not-started progress and error body capture
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::http_client::{initialize_shared_client, shared_client};
use super::{PlanKey, PlanStore, ProgressFetch};
use crate::config::ApiConfig;
use crate::constants::{http, routes};
use crate::errors::StoreError;
use crate::models::{AssignedPlanPayload, ClientProfile, ProgressSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// `PlanStore` backed by the coaching REST API
#[derive(Clone)]
pub struct RestPlanStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RestPlanStore {
    /// Create a store using the process-wide shared HTTP client
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        initialize_shared_client(config);
        Self::with_client(shared_client().clone(), config)
    }

    /// Create a store with an explicit HTTP client
    #[must_use]
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn client_url(&self, client_id: &str) -> Result<Url, StoreError> {
        self.endpoint(&[routes::COACHING_REQUESTS, client_id])
    }

    fn plan_url(&self, key: &PlanKey) -> Result<Url, StoreError> {
        self.endpoint(&[
            routes::COACHING_REQUESTS,
            &key.client_id,
            routes::ASSIGNED_PLAN,
            &key.plan_id,
        ])
    }

    fn progress_url(&self, key: &PlanKey, date: NaiveDate) -> Result<Url, StoreError> {
        let mut url = self.endpoint(&[
            routes::COACHING_REQUESTS,
            &key.client_id,
            routes::ASSIGNED_PLAN,
            &key.plan_id,
            routes::CLIENT_PROGRESS,
        ])?;
        url.query_pairs_mut()
            .append_pair(routes::DATE_QUERY_PARAM, &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, mapping transport failures and non-success statuses
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, StoreError> {
        let endpoint = url.path().to_owned();
        let started = Instant::now();
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        debug!(
            http.path = %endpoint,
            http.status = status.as_u16(),
            http.duration_ms = started.elapsed().as_millis() as u64,
            "Plan store request completed"
        );

        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .ok()
            .filter(|body| !body.trim().is_empty())
            .map(|body| truncate_body(&body));
        Err(StoreError::UnexpectedStatus {
            endpoint,
            status: status.as_u16(),
            body,
        })
    }

    async fn get_value(&self, url: &Url) -> Result<Value, StoreError> {
        let response = self.send(self.client.get(url.clone()), url).await?;
        let value = response.json::<Value>().await.map_err(|e| StoreError::Decode {
            endpoint: url.path().to_owned(),
            reason: e.to_string(),
        })?;
        unwrap_envelope(value, url.path())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, StoreError> {
        let value = self.get_value(url).await?;
        decode(value, url.path())
    }
}

#[async_trait]
impl PlanStore for RestPlanStore {
    async fn fetch_client(&self, client_id: &str) -> Result<ClientProfile, StoreError> {
        let url = self.client_url(client_id)?;
        self.get_json(&url).await
    }

    async fn load_plan(&self, key: &PlanKey) -> Result<AssignedPlanPayload, StoreError> {
        let url = self.plan_url(key)?;
        self.get_json(&url).await
    }

    async fn save_plan(
        &self,
        key: &PlanKey,
        payload: &AssignedPlanPayload,
    ) -> Result<(), StoreError> {
        let url = self.plan_url(key)?;
        let response = self.send(self.client.put(url.clone()).json(payload), &url).await?;

        // Some deployments answer 200 with an envelope whose success flag is false
        if response.status() != StatusCode::NO_CONTENT {
            if let Ok(value) = response.json::<Value>().await {
                unwrap_envelope(value, url.path())?;
            }
        }
        Ok(())
    }

    async fn fetch_progress(
        &self,
        key: &PlanKey,
        date: NaiveDate,
    ) -> Result<ProgressFetch, StoreError> {
        let url = self.progress_url(key, date)?;
        let mut value = match self.get_value(&url).await {
            Ok(value) => value,
            Err(error) if error.is_not_found() => {
                debug!(plan = %key, %date, "No progress record for date");
                return Ok(ProgressFetch::NotStarted);
            }
            Err(error) => return Err(error),
        };
        if let Value::Object(fields) = &mut value {
            fields
                .entry("date")
                .or_insert_with(|| Value::String(date.format("%Y-%m-%d").to_string()));
        }
        let snapshot: ProgressSnapshot = decode(value, url.path())?;
        if snapshot.date != date {
            warn!(
                requested = %date,
                received = %snapshot.date,
                "Progress snapshot date differs from requested date"
            );
        }
        Ok(ProgressFetch::Tracked(snapshot))
    }
}

/// Strip an optional `{success, data, message}` envelope
///
/// Bare payloads pass through unchanged. An envelope with `success: false`
/// becomes `StoreError::Rejected`.
fn unwrap_envelope(value: Value, endpoint: &str) -> Result<Value, StoreError> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => return Ok(other),
    };
    match fields.get("success").and_then(Value::as_bool) {
        Some(false) => {
            let message = fields
                .get("message")
                .or_else(|| fields.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("request was not successful")
                .to_owned();
            Err(StoreError::Rejected {
                endpoint: endpoint.to_owned(),
                message,
            })
        }
        Some(true) => Ok(fields.remove("data").unwrap_or(Value::Null)),
        None => Ok(Value::Object(fields)),
    }
}

fn decode<T: DeserializeOwned>(value: Value, endpoint: &str) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Decode {
        endpoint: endpoint.to_owned(),
        reason: e.to_string(),
    })
}

/// Keep error bodies short enough for log lines
fn truncate_body(body: &str) -> String {
    if body.len() <= http::ERROR_BODY_LIMIT {
        return body.to_owned();
    }
    let mut end = http::ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
