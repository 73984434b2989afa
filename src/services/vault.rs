// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token vault: AES-256-GCM encryption of OAuth tokens at rest.
//!
//! Ciphertext layout is `base64(nonce || sealed || tag)` with a fresh random
//! 96-bit nonce per call, so equal plaintexts never produce equal ciphertexts.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

use crate::models::{NewUser, User};

/// Vault errors. Any of these makes a credential unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key; expected 32 bytes")]
    InvalidKey,

    #[error("encryption failed")]
    Encrypt,

    #[error("malformed ciphertext: {0}")]
    Malformed(String),

    #[error("authentication tag mismatch")]
    Authentication,

    #[error("plaintext is not valid UTF-8")]
    Utf8,
}

/// Symmetric, authenticated encryption with a single static key.
pub struct Vault {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl Vault {
    /// Build a vault from raw key bytes (must be 32 bytes).
    pub fn new(key_bytes: &[u8]) -> Result<Self, CryptoError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key_bytes).map_err(|_| CryptoError::InvalidKey)?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt a secret. Returns base64 ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::Encrypt)?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| CryptoError::Encrypt)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + in_out.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&in_out);
        Ok(BASE64.encode(combined))
    }

    /// Decrypt base64 ciphertext produced by [`Vault::encrypt`].
    pub fn decrypt(&self, ciphertext_b64: &str) -> Result<String, CryptoError> {
        let combined = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| CryptoError::Malformed(format!("base64: {}", e)))?;

        if combined.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(CryptoError::Malformed(format!(
                "{} bytes is shorter than nonce and tag",
                combined.len()
            )));
        }

        let (nonce_bytes, sealed) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| CryptoError::Malformed("bad nonce length".to_string()))?;

        let mut in_out = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Authentication)?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::Utf8)
    }
}

/// Decrypted Spotify credential, alive for one sync attempt.
#[derive(Clone)]
pub struct SpotifyCredential {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expiry: DateTime<Utc>,
}

impl std::fmt::Debug for SpotifyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredential")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Decrypted Slack user token.
#[derive(Clone)]
pub struct SlackCredential {
    pub access_token: String,
}

impl std::fmt::Debug for SlackCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SlackCredential([redacted])")
    }
}

/// Everything a sync attempt needs, in plaintext.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub slack: SlackCredential,
    pub spotify: SpotifyCredential,
}

/// Encrypted token fields, ready to be stored on a [`User`].
pub struct EncryptedTokens {
    pub slack_access_token: String,
    pub spotify_access_token: String,
    pub spotify_refresh_token: String,
}

/// Helper to encrypt all tokens of a new link before storing.
pub fn encrypt_tokens(vault: &Vault, new_user: &NewUser) -> Result<EncryptedTokens, CryptoError> {
    Ok(EncryptedTokens {
        slack_access_token: vault.encrypt(&new_user.slack_access_token)?,
        spotify_access_token: vault.encrypt(&new_user.spotify_access_token)?,
        spotify_refresh_token: vault.encrypt(&new_user.spotify_refresh_token)?,
    })
}

/// Helper to decrypt a user's tokens after retrieval.
pub fn decrypt_credentials(vault: &Vault, user: &User) -> Result<UserCredentials, CryptoError> {
    Ok(UserCredentials {
        slack: SlackCredential {
            access_token: vault.decrypt(&user.slack_access_token_encrypted)?,
        },
        spotify: SpotifyCredential {
            access_token: vault.decrypt(&user.spotify_access_token_encrypted)?,
            refresh_token: vault.decrypt(&user.spotify_refresh_token_encrypted)?,
            token_type: user.spotify_token_type.clone(),
            expiry: user.spotify_token_expiry,
        },
    })
}
