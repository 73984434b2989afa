// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Slack Web API client for reading and writing a user's custom status.
//!
//! Slack answers most API errors with `200 {"ok": false, "error": ...}`,
//! so the `ok` flag is checked on every response in addition to the HTTP
//! status.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::models::ChatStatus;
use crate::services::vault::SlackCredential;

/// Reads and writes a Slack user's custom status.
#[async_trait]
pub trait ChatStatusWriter: Send + Sync {
    async fn get_profile_status(
        &self,
        credential: &SlackCredential,
        slack_user_id: &str,
    ) -> Result<ChatStatus, SyncError>;

    /// Empty `text` and `emoji` clear the status.
    async fn set_status(
        &self,
        credential: &SlackCredential,
        slack_user_id: &str,
        text: &str,
        emoji: &str,
    ) -> Result<(), SyncError>;
}

/// Slack API client.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
}

impl SlackClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Turn a Slack response into its payload, or a message describing why it failed.
    async fn read_envelope<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, String> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Slack rate limit hit (429)");
            }
            return Err(format!("HTTP {}: {}", status, body));
        }

        let envelope: SlackEnvelope<T> = response
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))?;

        match envelope {
            SlackEnvelope {
                ok: true,
                payload: Some(payload),
                ..
            } => Ok(payload),
            SlackEnvelope { ok: true, .. } => Err("response missing payload".to_string()),
            SlackEnvelope { error, .. } => Err(error.unwrap_or_else(|| "unknown_error".to_string())),
        }
    }
}

#[async_trait]
impl ChatStatusWriter for SlackClient {
    async fn get_profile_status(
        &self,
        credential: &SlackCredential,
        slack_user_id: &str,
    ) -> Result<ChatStatus, SyncError> {
        let url = format!("{}/users.profile.get", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.access_token)
            .query(&[("user", slack_user_id)])
            .send()
            .await
            .map_err(|e| SyncError::ChatProfile(e.to_string()))?;

        let body: ProfileBody = Self::read_envelope(response)
            .await
            .map_err(SyncError::ChatProfile)?;

        Ok(ChatStatus {
            emoji: body.profile.status_emoji,
            text: body.profile.status_text,
        })
    }

    async fn set_status(
        &self,
        credential: &SlackCredential,
        slack_user_id: &str,
        text: &str,
        emoji: &str,
    ) -> Result<(), SyncError> {
        let url = format!("{}/users.profile.set", self.base_url);

        let body = SetProfileRequest {
            user: slack_user_id,
            profile: StatusProfile {
                status_text: text,
                status_emoji: emoji,
                status_expiration: 0,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&credential.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::ChatWrite(e.to_string()))?;

        let _: serde_json::Value = Self::read_envelope(response)
            .await
            .map_err(SyncError::ChatWrite)?;
        Ok(())
    }
}

/// `{"ok": bool, "error": "...", ...payload}`
#[derive(Debug, Deserialize)]
struct SlackEnvelope<T> {
    ok: bool,
    error: Option<String>,
    #[serde(flatten)]
    payload: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ProfileBody {
    profile: SlackProfile,
}

#[derive(Debug, Deserialize)]
struct SlackProfile {
    #[serde(default)]
    status_text: String,
    #[serde(default)]
    status_emoji: String,
}

#[derive(Serialize)]
struct SetProfileRequest<'a> {
    user: &'a str,
    profile: StatusProfile<'a>,
}

#[derive(Serialize)]
struct StatusProfile<'a> {
    status_text: &'a str,
    status_emoji: &'a str,
    status_expiration: i64,
}
