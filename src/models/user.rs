// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A linked Slack/Spotify account, as stored.
///
/// Every `*_encrypted` field holds vault ciphertext; plaintext tokens only
/// exist in [`crate::services::vault::UserCredentials`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque record ID (also used as document ID)
    pub id: String,
    /// Slack user ID; unique across records
    pub slack_user_id: String,
    pub slack_access_token_encrypted: String,
    pub spotify_access_token_encrypted: String,
    pub spotify_refresh_token_encrypted: String,
    /// Stored for the OAuth layer; sync does not refresh tokens
    pub spotify_token_expiry: DateTime<Utc>,
    /// Usually "Bearer"
    pub spotify_token_type: String,
    /// Only enabled users are synced
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Plaintext tokens handed over by the OAuth flow, before encryption.
#[derive(Clone)]
pub struct NewUser {
    pub slack_user_id: String,
    pub slack_access_token: String,
    pub spotify_access_token: String,
    pub spotify_refresh_token: String,
    pub spotify_token_expiry: DateTime<Utc>,
    pub spotify_token_type: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("slack_user_id", &self.slack_user_id)
            .field("spotify_token_expiry", &self.spotify_token_expiry)
            .field("spotify_token_type", &self.spotify_token_type)
            .finish_non_exhaustive()
    }
}
