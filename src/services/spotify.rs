// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API client for reading the current playback.
//!
//! Tokens are not refreshed here; an expired token surfaces as a
//! `MusicFetch` error and the user is skipped until the OAuth layer relinks.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::SyncError;
use crate::models::PlaybackState;
use crate::services::vault::SpotifyCredential;

/// Reads what a user is listening to.
#[async_trait]
pub trait MusicStatusReader: Send + Sync {
    /// `Ok(None)` means nothing is playing, which is not an error.
    async fn currently_playing(
        &self,
        credential: &SpotifyCredential,
    ) -> Result<Option<PlaybackState>, SyncError>;
}

/// Spotify API client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn authorization(credential: &SpotifyCredential) -> String {
        let token_type = if credential.token_type.is_empty() {
            "Bearer"
        } else {
            credential.token_type.as_str()
        };
        format!("{} {}", token_type, credential.access_token)
    }
}

#[async_trait]
impl MusicStatusReader for SpotifyClient {
    async fn currently_playing(
        &self,
        credential: &SpotifyCredential,
    ) -> Result<Option<PlaybackState>, SyncError> {
        let url = format!("{}/me/player/currently-playing", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, Self::authorization(credential))
            .send()
            .await
            .map_err(|e| SyncError::MusicFetch(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED {
                return Err(SyncError::MusicFetch(
                    "Spotify token expired or revoked (401)".to_string(),
                ));
            }
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Spotify rate limit hit (429)");
            }
            return Err(SyncError::MusicFetch(format!("HTTP {}: {}", status, body)));
        }

        let body: CurrentlyPlayingResponse = response
            .json()
            .await
            .map_err(|e| SyncError::MusicFetch(format!("JSON parse error: {}", e)))?;

        Ok(body.into_playback())
    }
}

/// Body of `GET /me/player/currently-playing`.
#[derive(Debug, Deserialize)]
struct CurrentlyPlayingResponse {
    #[serde(default)]
    is_playing: bool,
    item: Option<SpotifyItem>,
}

/// Track or episode; episodes have no `artists`.
#[derive(Debug, Deserialize)]
struct SpotifyItem {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

impl CurrentlyPlayingResponse {
    fn into_playback(self) -> Option<PlaybackState> {
        let item = self.item?;
        let track_name = item.name?;
        let artist_name = item
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();

        Some(PlaybackState {
            is_playing: self.is_playing,
            track_name,
            artist_name,
        })
    }
}
