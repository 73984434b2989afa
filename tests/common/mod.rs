// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::Utc;
use spotify_status::config::Config;
use spotify_status::db::{FirestoreDb, InMemoryUserDirectory, UserDirectory};
use spotify_status::error::SyncError;
use spotify_status::models::{ChatStatus, NewUser, PlaybackState, User};
use spotify_status::routes::create_router;
use spotify_status::services::vault::{SlackCredential, SpotifyCredential};
use spotify_status::services::{ChatStatusWriter, MusicStatusReader, UserService, Vault};
use spotify_status::AppState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn test_vault() -> Arc<Vault> {
    Arc::new(Vault::new(&Config::test_default().token_encryption_key).expect("valid key"))
}

/// Plaintext tokens derived from the Slack ID, so fakes can tell users apart.
#[allow(dead_code)]
pub fn new_user(slack_user_id: &str) -> NewUser {
    NewUser {
        slack_user_id: slack_user_id.to_string(),
        slack_access_token: format!("xoxp-{}", slack_user_id),
        spotify_access_token: format!("spotify-{}", slack_user_id),
        spotify_refresh_token: format!("refresh-{}", slack_user_id),
        spotify_token_expiry: Utc::now(),
        spotify_token_type: "Bearer".to_string(),
    }
}

/// Register users through the real service so tokens are encrypted.
#[allow(dead_code)]
pub async fn seeded_directory(
    vault: &Arc<Vault>,
    slack_user_ids: &[&str],
) -> Arc<InMemoryUserDirectory> {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let service = UserService::new(directory.clone(), vault.clone());
    for id in slack_user_ids {
        service.register(new_user(id)).await.expect("register");
    }
    directory
}

#[allow(dead_code)]
pub fn playing(track: &str, artist: &str) -> PlaybackState {
    PlaybackState {
        is_playing: true,
        track_name: track.to_string(),
        artist_name: artist.to_string(),
    }
}

/// What the fake Spotify returns for one access token.
#[allow(dead_code)]
#[derive(Clone)]
pub enum MusicReply {
    Playing(PlaybackState),
    Nothing,
    Fail,
    Panic,
}

/// Spotify stand-in keyed by decrypted access token.
#[derive(Default)]
pub struct FakeSpotify {
    replies: Mutex<HashMap<String, MusicReply>>,
}

#[allow(dead_code)]
impl FakeSpotify {
    pub fn reply(&self, slack_user_id: &str, reply: MusicReply) {
        self.replies
            .lock()
            .unwrap()
            .insert(format!("spotify-{}", slack_user_id), reply);
    }
}

#[async_trait]
impl MusicStatusReader for FakeSpotify {
    async fn currently_playing(
        &self,
        credential: &SpotifyCredential,
    ) -> Result<Option<PlaybackState>, SyncError> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&credential.access_token)
            .cloned()
            .unwrap_or(MusicReply::Nothing);
        match reply {
            MusicReply::Playing(state) => Ok(Some(state)),
            MusicReply::Nothing => Ok(None),
            MusicReply::Fail => Err(SyncError::MusicFetch("HTTP 401".to_string())),
            MusicReply::Panic => panic!("malformed playback for {}", credential.access_token),
        }
    }
}

/// A recorded `set_status` call: (slack user, text, emoji).
pub type StatusWrite = (String, String, String);

/// Slack stand-in holding one status per user and recording writes.
#[derive(Default)]
pub struct FakeSlack {
    statuses: Mutex<HashMap<String, ChatStatus>>,
    writes: Mutex<Vec<StatusWrite>>,
    failing_profiles: Mutex<Vec<String>>,
    failing_writes: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeSlack {
    pub fn set_current(&self, slack_user_id: &str, emoji: &str, text: &str) {
        self.statuses.lock().unwrap().insert(
            slack_user_id.to_string(),
            ChatStatus {
                emoji: emoji.to_string(),
                text: text.to_string(),
            },
        );
    }

    pub fn current(&self, slack_user_id: &str) -> ChatStatus {
        self.statuses
            .lock()
            .unwrap()
            .get(slack_user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_profile_for(&self, slack_user_id: &str) {
        self.failing_profiles
            .lock()
            .unwrap()
            .push(slack_user_id.to_string());
    }

    pub fn fail_writes_for(&self, slack_user_id: &str) {
        self.failing_writes
            .lock()
            .unwrap()
            .push(slack_user_id.to_string());
    }

    pub fn writes(&self) -> Vec<StatusWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn writes_for(&self, slack_user_id: &str) -> Vec<StatusWrite> {
        self.writes()
            .into_iter()
            .filter(|(user, _, _)| user == slack_user_id)
            .collect()
    }
}

#[async_trait]
impl ChatStatusWriter for FakeSlack {
    async fn get_profile_status(
        &self,
        credential: &SlackCredential,
        slack_user_id: &str,
    ) -> Result<ChatStatus, SyncError> {
        assert_eq!(credential.access_token, format!("xoxp-{}", slack_user_id));
        if self
            .failing_profiles
            .lock()
            .unwrap()
            .iter()
            .any(|u| u == slack_user_id)
        {
            return Err(SyncError::ChatProfile("invalid_auth".to_string()));
        }
        Ok(self.current(slack_user_id))
    }

    async fn set_status(
        &self,
        _credential: &SlackCredential,
        slack_user_id: &str,
        text: &str,
        emoji: &str,
    ) -> Result<(), SyncError> {
        if self
            .failing_writes
            .lock()
            .unwrap()
            .iter()
            .any(|u| u == slack_user_id)
        {
            return Err(SyncError::ChatWrite("ratelimited".to_string()));
        }
        self.writes.lock().unwrap().push((
            slack_user_id.to_string(),
            text.to_string(),
            emoji.to_string(),
        ));
        self.set_current(slack_user_id, emoji, text);
        Ok(())
    }
}

/// Create a test app backed by an in-memory directory.
/// Returns the router, the shared state and the directory.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<InMemoryUserDirectory>) {
    let config = Config::test_default();
    let directory = Arc::new(InMemoryUserDirectory::new());
    let user_service = UserService::new(
        directory.clone() as Arc<dyn UserDirectory>,
        test_vault(),
    );

    let state = Arc::new(AppState {
        config,
        user_service,
    });

    (create_router(state.clone()), state, directory)
}

#[allow(dead_code)]
pub async fn stored_user(directory: &InMemoryUserDirectory, slack_user_id: &str) -> Option<User> {
    directory
        .get_user_by_slack_id(slack_user_id)
        .await
        .expect("in-memory lookup")
}
