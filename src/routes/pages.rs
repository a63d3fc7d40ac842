// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Top-level pages: the root redirect and the composed dashboard.

use crate::middleware::auth::session_token;
use crate::services::dashboard::{MountOutcome, AUTH_ROUTE, DASHBOARD_ROUTE};
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route(DASHBOARD_ROUTE, get(dashboard))
}

/// Send signed-in users to the dashboard and everyone else to sign-in.
async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Redirect {
    let token = session_token(&jar, &headers);
    match state.auth.current_session(token.as_deref()) {
        Some(_) => Redirect::to(DASHBOARD_ROUTE),
        None => Redirect::to(AUTH_ROUTE),
    }
}

/// Mount a dashboard for this request and return the composed page.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let token = session_token(&jar, &headers);
    let mut dashboard = state.dashboard();

    match dashboard.mount(token.as_deref()).await {
        MountOutcome::Redirect(to) => Redirect::to(to).into_response(),
        MountOutcome::Ready => match dashboard.page() {
            Some(page) => Json(page).into_response(),
            None => Redirect::to(AUTH_ROUTE).into_response(),
        },
    }
}
