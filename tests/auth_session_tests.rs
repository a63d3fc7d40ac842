// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie and sign-out tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use run_tracker::config::Config;
use run_tracker::db::MemoryStore;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn session_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "access_token": token }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_session_sets_http_only_cookie() {
    let (app, _, _) = common::create_test_app();
    let token = common::create_test_jwt("user-1", Some("ana@example.com"));

    let response = app.oneshot(session_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    let cookie = cookies
        .iter()
        .find(|c| c.starts_with("run_tracker_token="))
        .expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    // Local frontend is plain http.
    assert!(!cookie.contains("Secure"));

    let body = common::body_json(response).await;
    assert_eq!(body["user_id"], "user-1");
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["redirect_to"], "/dashboard");
}

#[tokio::test]
async fn test_session_cookie_is_secure_behind_https_frontend() {
    let mut config = Config::test_default();
    config.frontend_url = "https://runs.example.com".to_string();
    let (app, _) = common::create_test_app_with_config(config, Arc::new(MemoryStore::new()));

    let token = common::create_test_jwt("user-1", None);
    let response = app.oneshot(session_request(&token)).await.unwrap();

    let cookies = set_cookie_headers(&response);
    assert!(cookies.iter().any(|c| c.contains("Secure")));
}

#[tokio::test]
async fn test_session_with_invalid_token_is_rejected() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(session_request("garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_headers(&response).is_empty());

    let response = app.oneshot(session_request("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_root_redirects_by_session() {
    let (app, _, _) = common::create_test_app();
    let token = common::create_test_jwt("user-1", None);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, format!("run_tracker_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_auth_entry_point() {
    let (app, _, _) = common::create_test_app();
    let token = common::create_test_jwt("user-1", None);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/auth").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["session_endpoint"], "/auth/session");
    assert!(body["notice"].is_null());

    // Already signed in: straight to the dashboard.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_logout_revokes_token_and_clears_cookie() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt("user-1", None);
    state.auth.sign_in(&token).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, format!("run_tracker_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth?signed_out=true");

    let cookies = set_cookie_headers(&response);
    let removal = cookies
        .iter()
        .find(|c| c.starts_with("run_tracker_token="))
        .expect("removal cookie");
    assert!(removal.contains("Max-Age=0"));
    assert!(removal.contains("Path=/"));

    // The revoked token no longer opens protected routes.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth");
}

#[tokio::test]
async fn test_signed_out_entry_shows_farewell_notice() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth?signed_out=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["notice"]["title"], "Выход выполнен");
    assert_eq!(body["notice"]["description"], "До скорой встречи!");
    assert_eq!(body["notice"]["variant"], "default");
}
