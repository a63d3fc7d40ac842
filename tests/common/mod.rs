// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::response::Response;
use run_tracker::config::Config;
use run_tracker::db::{MemoryStore, RunStore};
use run_tracker::routes::create_router;
use run_tracker::services::auth::create_jwt;
use run_tracker::AppState;
use std::sync::Arc;

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let (app, state) = create_test_app_with_store(Arc::new(store.clone()));
    (app, state, store)
}

/// Create a test app around any store implementation.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Arc<dyn RunStore>) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default(), store)
}

#[allow(dead_code)]
pub fn create_test_app_with_config(
    config: Config,
    store: Arc<dyn RunStore>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, store));
    (create_router(state.clone()), state)
}

/// Create an access token signed with the test key, valid for a day.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, email: Option<&str>) -> String {
    create_jwt(
        user_id,
        email,
        &Config::test_default().jwt_signing_key,
        chrono::Duration::days(1),
    )
    .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
