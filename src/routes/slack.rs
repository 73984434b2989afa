// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Slack slash command handlers.
//!
//! Slack posts `application/x-www-form-urlencoded` bodies; only `user_id`
//! is used. Replies are plain text shown to the invoking user.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    routing::post,
    Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::AppState;

const SLACK_AUTHORIZE_URL: &str = "https://slack.com/oauth/v2/authorize";
const BOT_SCOPES: &str = "commands,chat:write";
const USER_SCOPES: &str = "users.profile:read,users.profile:write";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/slack/commands/opt-in", post(opt_in))
        .route("/slack/commands/opt-out", post(opt_out))
        .route("/slack/commands/enable", post(enable))
        .route("/slack/commands/disable", post(disable))
}

/// The fields of a slash command payload we care about.
#[derive(Debug, Deserialize)]
pub struct SlashCommand {
    pub user_id: String,
}

/// URL that starts the Slack side of account linking.
pub fn authorize_url(client_id: &str) -> String {
    format!(
        "{}?client_id={}&scope={}&user_scope={}",
        SLACK_AUTHORIZE_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(BOT_SCOPES),
        urlencoding::encode(USER_SCOPES)
    )
}

async fn opt_in(State(state): State<Arc<AppState>>) -> String {
    format!(
        "Please visit: {}",
        authorize_url(&state.config.slack_client_id)
    )
}

async fn opt_out(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<&'static str> {
    state.user_service.remove(&command.user_id).await?;
    Ok("All your data has been removed from Spotify Status")
}

async fn enable(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<&'static str> {
    state
        .user_service
        .set_enabled(&command.user_id, true)
        .await?;
    Ok("Spotify Status has been enabled")
}

async fn disable(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<&'static str> {
    state
        .user_service
        .set_enabled(&command.user_id, false)
        .await?;
    Ok("Spotify Status has been disabled")
}
