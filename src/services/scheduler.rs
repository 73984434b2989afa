// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed-interval trigger for sync ticks.
//!
//! Each tick runs in its own task, so a slow tick never delays the next one
//! and ticks may overlap.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::sync::SyncEngine;

/// Start the sync loop. The first tick fires immediately.
pub fn spawn_scheduler(engine: SyncEngine, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(period_secs = period.as_secs(), "Starting status sync scheduler");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let engine = engine.clone();
            tokio::spawn(async move { engine.run_logged_tick().await });
        }
    })
}
