// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use spotify_status::error::{AppError, SyncError};
use spotify_status::services::CryptoError;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (status, json) = render(AppError::user_not_found("U1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["details"], "User U1");

    let (status, json) = render(AppError::Conflict("User U1".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "conflict");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, json) = render(AppError::Database("connection refused".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());

    let (status, json) = render(AppError::Crypto(CryptoError::Authentication)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal_error");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_unauthorized_has_no_details() {
    let (status, json) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
    assert!(json.get("details").is_none());
}

#[test]
fn test_sync_error_kinds() {
    assert_eq!(SyncError::from(CryptoError::Authentication).kind(), "crypto");
    assert_eq!(SyncError::MusicFetch("x".into()).kind(), "music_fetch");
    assert_eq!(SyncError::ChatProfile("x".into()).kind(), "chat_profile");
    assert_eq!(SyncError::ChatWrite("x".into()).kind(), "chat_write");
}
