// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::session_token;
use crate::models::{stats_cards, Notice, RunStats, Session, StatsCard};
use crate::services::dashboard::{
    DashboardController, DashboardUpdate, MountOutcome, RunAdded, AUTH_ROUTE, RUNS_ROUTE,
};
use crate::services::run_form::{RunForm, RunFormFields, SubmitOutcome};
use crate::services::run_list::{format_runs, RunListView};
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use dashmap::{mapref::entry::Entry, DashMap};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route(RUNS_ROUTE, get(get_runs).post(create_run))
        .route("/api/dashboard/events", get(dashboard_events))
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    pub stats: RunStats,
    pub cards: Vec<StatsCard>,
}

/// Aggregate statistics over all of the user's runs.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<StatsResponse>> {
    let rows = state.store.stats_rows(&session).await?;
    let stats = RunStats::from_rows(&rows);

    Ok(Json(StatsResponse {
        cards: stats_cards(&stats, state.config.locale),
        stats,
    }))
}

// ─── Runs ────────────────────────────────────────────────────

/// Run history, newest first.
async fn get_runs(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<RunListView>> {
    let runs = state.store.list_runs(&session).await?;
    Ok(Json(format_runs(&runs, state.config.locale)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateRunResponse {
    pub notice: Option<Notice>,
}

/// Marks a user's submission as in flight until dropped.
struct InFlight<'a> {
    submissions: &'a DashMap<String, ()>,
    user_id: String,
}

impl<'a> InFlight<'a> {
    fn begin(submissions: &'a DashMap<String, ()>, user_id: &str) -> Option<Self> {
        match submissions.entry(user_id.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self {
                    submissions,
                    user_id: user_id.to_string(),
                })
            }
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.submissions.remove(&self.user_id);
    }
}

/// Validate and store a new run, then signal mounted dashboards.
async fn create_run(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(fields): Json<RunFormFields>,
) -> Result<(StatusCode, Json<CreateRunResponse>)> {
    let Some(_in_flight) = InFlight::begin(&state.submissions, &session.user_id) else {
        tracing::warn!(user_id = %session.user_id, "Rejected concurrent run submission");
        return Err(AppError::Conflict(
            "A run submission is already in progress".to_string(),
        ));
    };

    let locale = state.config.locale;
    let mut form = RunForm::with_fields(fields, locale);
    let user_id = session.user_id.clone();

    let outcome = form
        .submit(state.store.as_ref(), &session, || {
            state.run_events.emit(&RunAdded { user_id });
        })
        .await;

    match outcome {
        SubmitOutcome::Added => Ok((
            StatusCode::CREATED,
            Json(CreateRunResponse {
                notice: form.notice().cloned(),
            }),
        )),
        SubmitOutcome::Rejected(err) => {
            Err(AppError::Validation(err.message(locale).to_string()))
        }
        SubmitOutcome::Failed(err) => Err(AppError::Store(err)),
    }
}

// ─── Live Dashboard ──────────────────────────────────────────

fn page_event(dashboard: &DashboardController) -> Event {
    let Some(page) = dashboard.page() else {
        return Event::default().event("redirect").data(AUTH_ROUTE);
    };

    Event::default()
        .event("page")
        .json_data(&page)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize dashboard page");
            Event::default().event("error").data("render_failed")
        })
}

/// Server-sent events for one mounted dashboard.
///
/// Sends the page on connect and after every refresh, then `redirect` on
/// sign-out. The controller (and its subscriptions) lives as long as the
/// connection.
async fn dashboard_events(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let token = session_token(&jar, &headers);
    let mut dashboard = state.dashboard();

    if let MountOutcome::Redirect(_) = dashboard.mount(token.as_deref()).await {
        return Err(AppError::Unauthorized);
    }

    let first = page_event(&dashboard);
    let updates = stream::unfold(Some(dashboard), |dashboard| async move {
        let mut dashboard = dashboard?;
        match dashboard.next_update().await? {
            DashboardUpdate::Refreshed => {
                let event = page_event(&dashboard);
                Some((Ok::<_, Infallible>(event), Some(dashboard)))
            }
            DashboardUpdate::Redirect(to) => {
                Some((Ok(Event::default().event("redirect").data(to)), None))
            }
        }
    });

    let events = stream::once(async move { Ok::<_, Infallible>(first) }).chain(updates);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
