// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local user directory, for tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserDirectory;
use crate::error::AppError;
use crate::models::User;

/// Users keyed by Slack user ID.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_enabled_users(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.enabled).cloned().collect())
    }

    async fn get_user_by_slack_id(&self, slack_user_id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(slack_user_id).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.slack_user_id) {
            return Err(AppError::Conflict(format!("User {}", user.slack_user_id)));
        }
        users.insert(user.slack_user_id.clone(), user.clone());
        Ok(())
    }

    async fn set_enabled(&self, slack_user_id: &str, enabled: bool) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(slack_user_id) {
            Some(user) => {
                user.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user_by_slack_id(&self, slack_user_id: &str) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        Ok(users.remove(slack_user_id).is_some())
    }
}
