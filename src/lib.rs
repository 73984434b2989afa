// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Spotify Status: mirror what you're listening to on Spotify into your
//! Slack status.
//!
//! A scheduler periodically walks every enabled user, reads their current
//! Spotify playback and sets (or clears) their Slack custom status, without
//! ever overwriting a status this service did not set.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::UserService;

/// Shared application state for HTTP handlers.
pub struct AppState {
    pub config: Config,
    pub user_service: UserService,
}
