// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User linking and lifecycle: register, enable/disable, remove.

use std::sync::Arc;

use chrono::Utc;

use crate::db::UserDirectory;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::services::vault::{encrypt_tokens, Vault};

/// Writes to the user directory on behalf of the OAuth flow and slash commands.
#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
    vault: Arc<Vault>,
}

impl UserService {
    pub fn new(directory: Arc<dyn UserDirectory>, vault: Arc<Vault>) -> Self {
        Self { directory, vault }
    }

    /// Encrypt and store a freshly linked account.
    ///
    /// Fails with `Conflict` if the Slack user is already linked.
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        if self
            .directory
            .get_user_by_slack_id(&new_user.slack_user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User {}",
                new_user.slack_user_id
            )));
        }

        let tokens = encrypt_tokens(&self.vault, &new_user)?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            slack_user_id: new_user.slack_user_id,
            slack_access_token_encrypted: tokens.slack_access_token,
            spotify_access_token_encrypted: tokens.spotify_access_token,
            spotify_refresh_token_encrypted: tokens.spotify_refresh_token,
            spotify_token_expiry: new_user.spotify_token_expiry,
            spotify_token_type: new_user.spotify_token_type,
            enabled: true,
            created_at: Utc::now(),
        };

        self.directory.create_user(&user).await?;

        tracing::info!(
            user_id = %user.id,
            slack_user_id = %user.slack_user_id,
            "User linked"
        );
        Ok(user)
    }

    pub async fn set_enabled(&self, slack_user_id: &str, enabled: bool) -> Result<()> {
        if !self.directory.set_enabled(slack_user_id, enabled).await? {
            return Err(AppError::user_not_found(slack_user_id));
        }
        tracing::info!(slack_user_id, enabled, "User sync toggled");
        Ok(())
    }

    /// Delete every stored trace of the user.
    pub async fn remove(&self, slack_user_id: &str) -> Result<()> {
        if !self.directory.delete_user_by_slack_id(slack_user_id).await? {
            return Err(AppError::user_not_found(slack_user_id));
        }
        tracing::info!(slack_user_id, "User removed");
        Ok(())
    }
}
