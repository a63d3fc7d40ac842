// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use run_tracker::db::StoreError;
use run_tracker::error::AppError;

mod common;

#[tokio::test]
async fn test_validation_error_response() {
    let response =
        AppError::Validation("Укажите продолжительность пробежки".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "Укажите продолжительность пробежки");
}

#[tokio::test]
async fn test_store_error_shows_store_message() {
    let err = StoreError::new("duplicate key value violates unique constraint").with_code("23505");
    let response = AppError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "store_error");
    assert_eq!(
        body["details"],
        "duplicate key value violates unique constraint"
    );
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let response = AppError::Internal(anyhow::anyhow!("secret detail")).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::Conflict("busy".to_string()).to_string(),
        "Conflict: busy"
    );
    assert_eq!(
        AppError::Store(StoreError::new("offline")).to_string(),
        "Store error: offline"
    );
}
