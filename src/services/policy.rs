// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Status decision policy.
//!
//! Decides, from the current playback and the current Slack status, whether
//! the status should be set, cleared or left alone. A status whose emoji is
//! neither [`SYNC_EMOJI`] nor empty belongs to someone else and is never
//! touched.

use crate::models::PlaybackState;

/// Emoji marking a status as set by this service.
pub const SYNC_EMOJI: &str = ":spotify:";

/// Slack's limit on custom status text, in characters.
pub const MAX_STATUS_LEN: usize = 100;

const ELLIPSIS: &str = "...";
const SEPARATOR: &str = " - ";

/// What to do with a user's Slack status this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAction {
    NoOp,
    SetStatus { text: String, emoji: String },
}

impl StatusAction {
    fn clear() -> Self {
        StatusAction::SetStatus {
            text: String::new(),
            emoji: String::new(),
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, StatusAction::SetStatus { text, emoji } if text.is_empty() && emoji.is_empty())
    }
}

/// Pick the action for one user.
///
/// `playback` is `None` when Spotify reported nothing playing.
pub fn decide(playback: Option<&PlaybackState>, current_emoji: &str) -> StatusAction {
    let Some(playback) = playback else {
        return StatusAction::NoOp;
    };

    let owned = current_emoji == SYNC_EMOJI;
    let can_update = playback.is_playing && (owned || current_emoji.is_empty());
    let can_clear = !playback.is_playing && owned;

    if can_update {
        StatusAction::SetStatus {
            text: compose_status_text(&playback.track_name, &playback.artist_name),
            emoji: SYNC_EMOJI.to_string(),
        }
    } else if can_clear {
        StatusAction::clear()
    } else {
        StatusAction::NoOp
    }
}

/// Render `"<track> - <artist>"`, shortening the track to fit
/// [`MAX_STATUS_LEN`].
///
/// When too long, `overflow + 3` characters are cut from the end of the track
/// and `"..."` is appended to it. The cut is clamped at an empty track, so an
/// artist name that alone exceeds the limit yields an over-long result rather
/// than a panic.
pub fn compose_status_text(track: &str, artist: &str) -> String {
    let track_len = track.chars().count();
    let naive_len = track_len + SEPARATOR.len() + artist.chars().count();

    if naive_len <= MAX_STATUS_LEN {
        return format!("{}{}{}", track, SEPARATOR, artist);
    }

    let cut = naive_len - MAX_STATUS_LEN + ELLIPSIS.len();
    let keep = track_len.saturating_sub(cut);
    let shortened: String = track.chars().take(keep).collect();

    format!("{}{}{}{}", shortened, ELLIPSIS, SEPARATOR, artist)
}
