// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Status synchronization engine.
//!
//! One tick:
//! 1. Read all enabled users from the directory
//! 2. Spawn one task per user: decrypt -> read Spotify -> read Slack ->
//!    decide -> write
//! 3. Wait for every task and aggregate a [`TickReport`]
//!
//! A user's failure ends that user's unit of work only. Nothing is shared
//! between units except read-only handles to the collaborators.

use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::db::UserDirectory;
use crate::error::{AppError, SyncError};
use crate::models::User;
use crate::services::policy::{decide, StatusAction};
use crate::services::slack::ChatStatusWriter;
use crate::services::spotify::MusicStatusReader;
use crate::services::vault::{decrypt_credentials, Vault};

/// How a user's unit of work ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Status set to the current track.
    Updated,
    /// Status cleared after playback stopped.
    Cleared,
    /// Status left alone (foreign status, or nothing to change).
    Unchanged,
    /// Spotify reported nothing playing.
    NothingPlaying,
}

/// Per-tick counts, for logs and monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub users: usize,
    pub updated: usize,
    pub cleared: usize,
    pub unchanged: usize,
    pub nothing_playing: usize,
    pub crypto_errors: usize,
    pub music_errors: usize,
    pub chat_profile_errors: usize,
    pub chat_write_errors: usize,
    /// Units that panicked or were cancelled.
    pub aborted: usize,
}

impl TickReport {
    pub fn failed(&self) -> usize {
        self.crypto_errors
            + self.music_errors
            + self.chat_profile_errors
            + self.chat_write_errors
            + self.aborted
    }

    fn record(&mut self, result: Result<Result<SyncOutcome, SyncError>, JoinError>) {
        match result {
            Ok(Ok(SyncOutcome::Updated)) => self.updated += 1,
            Ok(Ok(SyncOutcome::Cleared)) => self.cleared += 1,
            Ok(Ok(SyncOutcome::Unchanged)) => self.unchanged += 1,
            Ok(Ok(SyncOutcome::NothingPlaying)) => self.nothing_playing += 1,
            Ok(Err(SyncError::Crypto(_))) => self.crypto_errors += 1,
            Ok(Err(SyncError::MusicFetch(_))) => self.music_errors += 1,
            Ok(Err(SyncError::ChatProfile(_))) => self.chat_profile_errors += 1,
            Ok(Err(SyncError::ChatWrite(_))) => self.chat_write_errors += 1,
            Err(e) => {
                tracing::error!(error = %e, "Sync task aborted");
                self.aborted += 1;
            }
        }
    }
}

/// Mirrors Spotify playback into Slack status for every enabled user.
#[derive(Clone)]
pub struct SyncEngine {
    directory: Arc<dyn UserDirectory>,
    vault: Arc<Vault>,
    music: Arc<dyn MusicStatusReader>,
    chat: Arc<dyn ChatStatusWriter>,
}

impl SyncEngine {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        vault: Arc<Vault>,
        music: Arc<dyn MusicStatusReader>,
        chat: Arc<dyn ChatStatusWriter>,
    ) -> Self {
        Self {
            directory,
            vault,
            music,
            chat,
        }
    }

    /// Run one tick over the current set of enabled users.
    ///
    /// Only a directory failure is returned; per-user failures are counted.
    pub async fn run_tick(&self) -> Result<TickReport, AppError> {
        let users = self.directory.list_enabled_users().await?;

        let mut report = TickReport {
            users: users.len(),
            ..Default::default()
        };

        let mut tasks = JoinSet::new();
        for user in users {
            let engine = self.clone();
            tasks.spawn(async move { engine.sync_user_logged(user).await });
        }

        while let Some(result) = tasks.join_next().await {
            report.record(result);
        }

        Ok(report)
    }

    async fn sync_user_logged(&self, user: User) -> Result<SyncOutcome, SyncError> {
        let result = self.sync_user(&user).await;
        match &result {
            Ok(outcome) => {
                tracing::debug!(user_id = %user.id, outcome = ?outcome, "User synced");
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    kind = e.kind(),
                    error = %e,
                    "User sync failed"
                );
            }
        }
        result
    }

    /// One user's unit of work. Decrypted credentials live only in this frame.
    pub async fn sync_user(&self, user: &User) -> Result<SyncOutcome, SyncError> {
        let credentials = decrypt_credentials(&self.vault, user)?;

        let Some(playback) = self.music.currently_playing(&credentials.spotify).await? else {
            return Ok(SyncOutcome::NothingPlaying);
        };

        let status = self
            .chat
            .get_profile_status(&credentials.slack, &user.slack_user_id)
            .await?;

        let action = decide(Some(&playback), &status.emoji);
        let cleared = action.is_clear();

        let StatusAction::SetStatus { text, emoji } = action else {
            return Ok(SyncOutcome::Unchanged);
        };

        self.chat
            .set_status(&credentials.slack, &user.slack_user_id, &text, &emoji)
            .await?;

        Ok(if cleared {
            SyncOutcome::Cleared
        } else {
            SyncOutcome::Updated
        })
    }

    /// Run a tick and log its outcome. Used by the scheduler.
    pub async fn run_logged_tick(&self) {
        match self.run_tick().await {
            Ok(report) => {
                tracing::info!(
                    users = report.users,
                    updated = report.updated,
                    cleared = report.cleared,
                    unchanged = report.unchanged,
                    nothing_playing = report.nothing_playing,
                    failed = report.failed(),
                    "Sync tick complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Sync tick skipped: could not list users");
            }
        }
    }
}
