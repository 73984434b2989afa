// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Slack request signature verification for slash command routes.
//!
//! Slack signs `v0:{timestamp}:{raw body}` with HMAC-SHA256 keyed by the
//! app's signing secret and sends `v0={hex}` in `X-Slack-Signature`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Requests older (or newer) than this are treated as replays.
const MAX_CLOCK_SKEW_SECS: u64 = 5 * 60;

/// Slash command payloads are small; anything larger is rejected.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Compute the `v0=` signature Slack would send for this request.
pub fn sign(secret: &[u8], timestamp: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

/// Check a signature and its timestamp against `now` (unix seconds).
pub fn verify_signature(
    secret: &[u8],
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now: i64,
) -> bool {
    let Ok(ts) = timestamp.parse::<i64>() else {
        return false;
    };
    if now.abs_diff(ts) > MAX_CLOCK_SKEW_SECS {
        return false;
    }

    let Some(expected) = sign(secret, timestamp, body) else {
        return false;
    };
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Reject `/slack/*` requests that are not signed by Slack.
pub async fn require_slack_signature(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    };
    let (Some(timestamp), Some(signature)) = (header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER))
    else {
        tracing::warn!(path = %parts.uri.path(), "Blocked Slack request without signature headers");
        return AppError::Unauthorized.into_response();
    };

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return AppError::BadRequest(format!("Unreadable body: {}", e)).into_response(),
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    if !verify_signature(
        state.config.slack_signing_secret.as_bytes(),
        &timestamp,
        &bytes,
        &signature,
        now,
    ) {
        tracing::warn!(path = %parts.uri.path(), "Blocked Slack request with invalid signature");
        return AppError::Unauthorized.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"8f742231b10e8888abcd99yyyzzz85a5";

    #[test]
    fn test_slack_documented_example() {
        // Example from Slack's "Verifying requests from Slack" guide.
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let signature = "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";
        assert!(verify_signature(
            SECRET,
            "1531420618",
            body,
            signature,
            1531420618 + 30
        ));
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let signature = sign(SECRET, "1000", b"user_id=U1").unwrap();
        assert!(verify_signature(SECRET, "1000", b"user_id=U1", &signature, 1000 + 300));
        assert!(!verify_signature(SECRET, "1000", b"user_id=U1", &signature, 1000 + 301));
        assert!(!verify_signature(SECRET, "1000", b"user_id=U1", &signature, 1000 - 301));
    }

    #[test]
    fn test_rejects_tampered_body_and_bad_input() {
        let signature = sign(SECRET, "1000", b"user_id=U1").unwrap();
        assert!(!verify_signature(SECRET, "1000", b"user_id=U2", &signature, 1000));
        assert!(!verify_signature(b"other", "1000", b"user_id=U1", &signature, 1000));
        assert!(!verify_signature(SECRET, "soon", b"user_id=U1", &signature, 1000));
        assert!(!verify_signature(SECRET, "1000", b"user_id=U1", "v0=", 1000));
    }

    #[test]
    fn test_extreme_timestamps_are_rejected() {
        for ts in [i64::MIN.to_string(), i64::MAX.to_string()] {
            assert!(!verify_signature(SECRET, &ts, b"user_id=U1", "v0=00", 1_700_000_000));
        }
        assert!(!verify_signature(SECRET, "1000", b"user_id=U1", "v0=00", i64::MIN));
    }
}
