// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets (Slack signing secret, token encryption key) are read once at
//! startup and held in memory for the lifetime of the process.

use std::env;
use std::time::Duration;

/// Default interval between sync ticks.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 10;

/// Where user records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStore {
    Firestore,
    /// Process-local store, lost on restart. Local development only.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Slack OAuth client ID (public)
    pub slack_client_id: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Interval between sync ticks
    pub sync_interval: Duration,
    /// Spotify Web API base URL
    pub spotify_api_url: String,
    /// Slack Web API base URL
    pub slack_api_url: String,
    /// Backing store for users
    pub user_store: UserStore,

    // --- Secrets ---
    /// Slack signing secret used to verify slash command requests
    pub slack_signing_secret: String,
    /// AES-256 key for tokens at rest (raw bytes)
    pub token_encryption_key: Vec<u8>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("slack_client_id", &self.slack_client_id)
            .field("gcp_project_id", &self.gcp_project_id)
            .field("port", &self.port)
            .field("sync_interval", &self.sync_interval)
            .field("spotify_api_url", &self.spotify_api_url)
            .field("slack_api_url", &self.slack_api_url)
            .field("user_store", &self.user_store)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Deterministic config for tests.
    pub fn test_default() -> Self {
        Self {
            slack_client_id: "test_slack_client".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            spotify_api_url: "https://api.spotify.com/v1".to_string(),
            slack_api_url: "https://slack.com/api".to_string(),
            user_store: UserStore::Memory,
            slack_signing_secret: "test_signing_secret".to_string(),
            token_encryption_key: vec![7u8; 32],
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let key_hex = required("TOKEN_ENCRYPTION_KEY")?;
        let token_encryption_key = hex::decode(key_hex.trim())
            .ok()
            .filter(|k| k.len() == 32)
            .ok_or(ConfigError::Invalid(
                "TOKEN_ENCRYPTION_KEY",
                "expected 64 hex characters".to_string(),
            ))?;

        let sync_interval = match env::var("SYNC_INTERVAL_SECS") {
            Ok(raw) => parse_interval(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
        };

        let user_store = match env::var("USER_STORE").as_deref() {
            Ok("memory") => UserStore::Memory,
            Ok("firestore") | Err(_) => UserStore::Firestore,
            Ok(other) => {
                return Err(ConfigError::Invalid(
                    "USER_STORE",
                    format!("unknown store '{}'", other),
                ))
            }
        };

        Ok(Self {
            slack_client_id: required("SLACK_CLIENT_ID")?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            sync_interval,
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
            slack_api_url: env::var("SLACK_API_URL")
                .unwrap_or_else(|_| "https://slack.com/api".to_string()),
            user_store,

            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            token_encryption_key,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid(
            "SYNC_INTERVAL_SECS",
            format!("'{}' is not a positive number of seconds", raw),
        )),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
