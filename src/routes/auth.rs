// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes.
//!
//! Sign-in itself happens in the hosted authentication UI; these routes
//! accept the resulting access token and manage the session cookie.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{session_token, SESSION_COOKIE};
use crate::models::Notice;
use crate::services::dashboard::{AUTH_ROUTE, DASHBOARD_ROUTE, LOGOUT_ROUTE};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

const SESSION_ROUTE: &str = "/auth/session";
/// Where logout lands; the flag shows the farewell notice once.
const SIGNED_OUT_ROUTE: &str = "/auth?signed_out=true";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(AUTH_ROUTE, get(auth_entry))
        .route(SESSION_ROUTE, post(create_session))
        .route(LOGOUT_ROUTE, post(logout))
}

/// Where the client should send the access token after sign-in.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthEntryResponse {
    pub session_endpoint: String,
    pub redirect_to: String,
    pub notice: Option<Notice>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AuthEntryQuery {
    signed_out: bool,
}

/// Auth entry point. Signed-in users go straight to the dashboard.
async fn auth_entry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthEntryQuery>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let token = session_token(&jar, &headers);
    if state.auth.current_session(token.as_deref()).is_some() {
        return Redirect::to(DASHBOARD_ROUTE).into_response();
    }

    Json(AuthEntryResponse {
        session_endpoint: SESSION_ROUTE.to_string(),
        redirect_to: DASHBOARD_ROUTE.to_string(),
        notice: query.signed_out.then(|| {
            let locale = state.config.locale;
            Notice::info(locale.signed_out_title(), locale.signed_out_farewell())
        }),
    })
    .into_response()
}

#[derive(Deserialize)]
pub struct SessionRequest {
    access_token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub expires_at: String,
    pub redirect_to: String,
}

/// Accept an access token from the authentication service.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SessionRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = body.access_token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("access_token is required".to_string()));
    }

    let session = state.auth.sign_in(token)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.secure_cookies())
        .same_site(SameSite::Lax);

    tracing::info!(user_id = %session.user_id, "Session established");

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            expires_at: format_utc_rfc3339(session.expires_at),
            redirect_to: DASHBOARD_ROUTE.to_string(),
        }),
    ))
}

/// Sign out: revoke the token, clear the cookie, go back to sign-in.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Redirect) {
    let token = session_token(&jar, &headers);
    let Some(session) = state.auth.current_session(token.as_deref()) else {
        let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        return (jar, Redirect::to(AUTH_ROUTE));
    };

    state.auth.sign_out(&session);
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(SIGNED_OUT_ROUTE))
}
