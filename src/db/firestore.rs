// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed user directory.
//!
//! Users live in the `users` collection keyed by their opaque `id`; lookups
//! by Slack user ID go through a field filter. Each user also owns a guard
//! document in `slack_ids` keyed by Slack user ID, written in the same
//! transaction with an "absent" precondition, so two registrations for one
//! Slack user cannot both commit.

use async_trait::async_trait;
use firestore::FirestoreWritePrecondition;
use serde::{Deserialize, Serialize};

use super::UserDirectory;
use crate::db::collections;
use crate::error::AppError;
use crate::models::User;

/// Claims a Slack user ID for one user record.
#[derive(Debug, Serialize, Deserialize)]
struct SlackIdGuard {
    user_id: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client. Every operation returns a database error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn slack_id_taken(&self, slack_user_id: &str) -> Result<bool, AppError> {
        let guard: Option<SlackIdGuard> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SLACK_IDS)
            .obj()
            .one(slack_user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(guard.is_some())
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for FirestoreDb {
    async fn list_enabled_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.field("enabled").eq(true))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_user_by_slack_id(&self, slack_user_id: &str) -> Result<Option<User>, AppError> {
        let slack_user_id = slack_user_id.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("slack_user_id").eq(slack_user_id.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;
        let guard = SlackIdGuard {
            user_id: user.id.clone(),
        };

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::SLACK_IDS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(&user.slack_user_id)
            .object(&guard)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add Slack ID guard to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add user to transaction: {}", e))
            })?;

        if let Err(e) = transaction.commit().await {
            // A failed precondition means another record already holds the Slack ID.
            if self.slack_id_taken(&user.slack_user_id).await? {
                return Err(AppError::Conflict(format!("User {}", user.slack_user_id)));
            }
            return Err(AppError::Database(format!(
                "Failed to commit user creation: {}",
                e
            )));
        }

        tracing::info!(user_id = %user.id, "User stored");
        Ok(())
    }

    async fn set_enabled(&self, slack_user_id: &str, enabled: bool) -> Result<bool, AppError> {
        let Some(mut user) = self.get_user_by_slack_id(slack_user_id).await? else {
            return Ok(false);
        };
        user.enabled = enabled;
        self.upsert_user(&user).await?;
        Ok(true)
    }

    async fn delete_user_by_slack_id(&self, slack_user_id: &str) -> Result<bool, AppError> {
        let Some(user) = self.get_user_by_slack_id(slack_user_id).await? else {
            return Ok(false);
        };

        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for (collection, doc_id) in [
            (collections::USERS, user.id.as_str()),
            (collections::SLACK_IDS, slack_user_id),
        ] {
            client
                .fluent()
                .delete()
                .from(collection)
                .document_id(doc_id)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add deletion to transaction for {}: {}",
                        collection, e
                    ))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit user deletion: {}", e)))?;

        tracing::info!(user_id = %user.id, "User deleted");
        Ok(true)
    }
}
