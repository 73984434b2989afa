// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer for linked users.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::InMemoryUserDirectory;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::User;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// One document per linked Slack user, keyed by Slack user ID.
    pub const SLACK_IDS: &str = "slack_ids";
}

/// Repository of linked users.
///
/// The sync engine only calls [`UserDirectory::list_enabled_users`]; the
/// remaining operations back registration and the slash commands.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users with `enabled == true`, in no particular order.
    async fn list_enabled_users(&self) -> Result<Vec<User>, AppError>;

    async fn get_user_by_slack_id(&self, slack_user_id: &str) -> Result<Option<User>, AppError>;

    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    /// Returns `false` if no user has this Slack ID.
    async fn set_enabled(&self, slack_user_id: &str, enabled: bool) -> Result<bool, AppError>;

    /// Returns `false` if no user has this Slack ID.
    async fn delete_user_by_slack_id(&self, slack_user_id: &str) -> Result<bool, AppError>;
}
