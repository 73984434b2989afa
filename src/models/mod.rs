// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod status;
pub mod user;

pub use status::{ChatStatus, PlaybackState};
pub use user::{NewUser, User};
