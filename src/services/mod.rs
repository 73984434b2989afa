// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod policy;
pub mod scheduler;
pub mod slack;
pub mod spotify;
pub mod sync;
pub mod users;
pub mod vault;

pub use scheduler::spawn_scheduler;
pub use slack::{ChatStatusWriter, SlackClient};
pub use spotify::{MusicStatusReader, SpotifyClient};
pub use sync::{SyncEngine, SyncOutcome, TickReport};
pub use users::UserService;
pub use vault::{CryptoError, Vault};
