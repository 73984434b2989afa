// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-tick views of Spotify playback and Slack status.

/// What Spotify reports as currently playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub track_name: String,
    /// First listed artist, empty if Spotify lists none.
    pub artist_name: String,
}

/// The custom status currently set on a Slack profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatStatus {
    pub emoji: String,
    pub text: String,
}
