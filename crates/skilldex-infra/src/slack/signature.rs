//! Slack request signature verification.
//!
//! Slack signs every request with HMAC-SHA256 over the base string
//! `v0:<timestamp>:<body>`, sent as `X-Slack-Signature: v0=<hex>`.
//! Verification uses constant-time comparison (via the hmac crate's
//! `verify_slice`) and rejects stale timestamps to blunt replay.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed clock skew between the request timestamp and now.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Errors that can occur during signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Signature did not match the request body.
    #[error("request signature verification failed")]
    VerificationFailed,

    /// Request timestamp header was not a unix timestamp.
    #[error("invalid request timestamp")]
    InvalidTimestamp,

    /// Request timestamp is outside the allowed skew window.
    #[error("stale request timestamp")]
    StaleTimestamp,

    /// Invalid signing key.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Verify an inbound request signature against the signing secret.
///
/// `timestamp` and `signature` are the raw header values
/// (`X-Slack-Request-Timestamp` and `X-Slack-Signature`).
pub fn verify_request(
    signing_secret: &[u8],
    timestamp: &str,
    body: &[u8],
    signature: &str,
) -> Result<(), SignatureError> {
    verify_at(
        signing_secret,
        timestamp,
        body,
        signature,
        chrono::Utc::now().timestamp(),
    )
}

fn verify_at(
    signing_secret: &[u8],
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now_unix: i64,
) -> Result<(), SignatureError> {
    let ts: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;
    if (now_unix - ts).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let hex_sig = signature
        .strip_prefix("v0=")
        .ok_or(SignatureError::VerificationFailed)?;
    let expected_bytes = hex_decode(hex_sig).map_err(|_| SignatureError::VerificationFailed)?;

    let mut mac = HmacSha256::new_from_slice(signing_secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(b"v0:");
    mac.update(timestamp.trim().as_bytes());
    mac.update(b":");
    mac.update(body);

    // Constant-time verification (via hmac crate's `verify_slice`)
    mac.verify_slice(&expected_bytes)
        .map_err(|_| SignatureError::VerificationFailed)
}

/// Decode a hex string into bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"8f742231b10e8888abcd99yyyzzz85a5";

    fn sign(timestamp: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET).unwrap();
        mac.update(format!("v0:{timestamp}:").as_bytes());
        mac.update(body);
        let digest = mac.finalize().into_bytes();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("v0={hex}")
    }

    #[test]
    fn test_valid_signature_accepted() {
        let body = b"payload=%7B%22type%22%3A%22view_submission%22%7D";
        let sig = sign("1700000000", body);

        verify_at(SECRET, "1700000000", body, &sig, 1_700_000_010).unwrap();
    }

    #[test]
    fn test_tampered_body_rejected() {
        let sig = sign("1700000000", b"original");

        let err = verify_at(SECRET, "1700000000", b"tampered", &sig, 1_700_000_010).unwrap_err();
        assert!(matches!(err, SignatureError::VerificationFailed));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let body = b"body";
        let sig = sign("1700000000", body);

        let err = verify_at(SECRET, "1700000000", body, &sig, 1_700_001_000).unwrap_err();
        assert!(matches!(err, SignatureError::StaleTimestamp));
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let body = b"body";
        let sig = sign("1700001000", body);

        let err = verify_at(SECRET, "1700001000", body, &sig, 1_700_000_000).unwrap_err();
        assert!(matches!(err, SignatureError::StaleTimestamp));
    }

    #[test]
    fn test_missing_version_prefix_rejected() {
        let err =
            verify_at(SECRET, "1700000000", b"body", "deadbeef", 1_700_000_000).unwrap_err();
        assert!(matches!(err, SignatureError::VerificationFailed));
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        let err = verify_at(SECRET, "not-a-number", b"body", "v0=00", 0).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidTimestamp));
    }
}
