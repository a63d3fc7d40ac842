// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST client for the hosted table store.
//!
//! Requests carry the project API key plus the user's access token, so the
//! store's row-level security policies see the signed-in user.

use crate::db::{tables, RunStore, StoreError, StoreResult};
use crate::models::{NewRun, Run, RunStatsRow, Session};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Hosted store client.
#[derive(Clone)]
pub struct RestStore {
    http: reqwest::Client,
    rest_url: String,
    api_key: String,
}

impl RestStore {
    /// Create a client for the project at `base_url`.
    ///
    /// Every request is bounded by `timeout`; a timed-out call is reported
    /// as a [`StoreError`] like any other failure.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(
        &self,
        method: reqwest::Method,
        table: &str,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
    }

    /// Select rows of the user's runs with the given column list.
    async fn select<T: DeserializeOwned>(
        &self,
        session: &Session,
        columns: &str,
        order: Option<&str>,
    ) -> StoreResult<Vec<T>> {
        let mut query = vec![
            ("select", columns.to_string()),
            ("user_id", format!("eq.{}", session.user_id)),
        ];
        if let Some(order) = order {
            query.push(("order", order.to_string()));
        }

        let response = self
            .request(reqwest::Method::GET, tables::RUNS, session)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::new(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl RunStore for RestStore {
    async fn insert_run(&self, session: &Session, run: &NewRun) -> StoreResult<()> {
        let response = self
            .request(reqwest::Method::POST, tables::RUNS, session)
            .header("Prefer", "return=minimal")
            .json(run)
            .send()
            .await
            .map_err(transport_error)?;

        check_response(response).await?;
        tracing::info!(user_id = %session.user_id, "Run inserted");
        Ok(())
    }

    async fn list_runs(&self, session: &Session) -> StoreResult<Vec<Run>> {
        let runs: Vec<Run> = self.select(session, "*", Some("date.desc")).await?;
        tracing::debug!(user_id = %session.user_id, count = runs.len(), "Fetched runs");
        Ok(runs)
    }

    async fn stats_rows(&self, session: &Session) -> StoreResult<Vec<RunStatsRow>> {
        let rows: Vec<RunStatsRow> = self.select(session, "distance,duration,pace", None).await?;
        tracing::debug!(user_id = %session.user_id, count = rows.len(), "Fetched stats rows");
        Ok(rows)
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        tracing::warn!(error = %err, "Store request timed out");
        StoreError::new("Store request timed out").with_code("timeout")
    } else {
        StoreError::new(err.to_string()).with_code("transport")
    }
}

/// Check response status and turn the store's error body into a [`StoreError`].
async fn check_response(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(parse_error_body(status, &body))
}

fn parse_error_body(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<StoreError>(body) {
        Ok(err) if !err.message.is_empty() => err,
        _ => StoreError::new(format!("HTTP {}: {}", status, body)).with_code(status.as_str()),
    }
}
