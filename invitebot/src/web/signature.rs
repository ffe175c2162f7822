//! Slack webhook signature verification.
//!
//! Slack signs each request with HMAC-SHA256 over a version-prefixed base
//! string. Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Version prefix Slack uses in both the base string and the signature.
pub const SIGNATURE_VERSION: &str = "v0";

/// Compute the `v0=<hex>` signature for a request.
///
/// The signed base string is `v0:{timestamp}:{body}`. Returns `None` only
/// when the HMAC cannot be keyed, which never happens for SHA-256.
pub fn sign_request(signing_secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).ok()?;
    mac.update(format!("{SIGNATURE_VERSION}:{timestamp}:").as_bytes());
    mac.update(body);
    Some(format!(
        "{SIGNATURE_VERSION}={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a Slack request signature.
///
/// # Arguments
///
/// * `signing_secret` - The app's Slack signing secret
/// * `timestamp` - The `X-Slack-Request-Timestamp` header value
/// * `body` - The raw, unparsed request body
/// * `signature` - The `X-Slack-Signature` header value
/// * `max_age_seconds` - Maximum allowed age of the timestamp (prevents replay attacks)
///
/// # Returns
///
/// `true` if the signature matches and the timestamp is fresh, `false`
/// otherwise. Fails closed on every malformed input.
pub fn verify_slack_signature(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    max_age_seconds: u64,
) -> bool {
    if signing_secret.is_empty() || timestamp.is_empty() || signature.is_empty() {
        warn!(
            has_signing_secret = !signing_secret.is_empty(),
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature.is_empty(),
            "slack_signature_missing_fields"
        );
        return false;
    }

    // Verify timestamp is not stale (prevents replay attacks)
    let request_time: u64 = match timestamp.parse() {
        Ok(t) => t,
        Err(_) => {
            warn!(timestamp = %timestamp, "slack_signature_invalid_timestamp");
            return false;
        }
    };

    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let age = current_time.abs_diff(request_time);

    if age > max_age_seconds {
        warn!(
            request_time = request_time,
            current_time = current_time,
            age_seconds = age,
            max_age_seconds = max_age_seconds,
            "slack_signature_stale"
        );
        return false;
    }

    let expected = match sign_request(signing_secret, timestamp, body) {
        Some(sig) => sig,
        None => {
            warn!("slack_signature_invalid_key");
            return false;
        }
    };

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected, signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            "slack_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_timestamp() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string()
    }

    #[test]
    fn test_sign_then_verify_round_trips() {
        let secret = "test-signing-secret";
        let timestamp = now_timestamp();
        let body = br#"{"type":"event_callback","event":{"type":"message"}}"#;

        let signature = sign_request(secret, &timestamp, body).unwrap();

        assert!(signature.starts_with("v0="));
        assert!(verify_slack_signature(secret, &timestamp, body, &signature, 300));
    }

    #[test]
    fn test_verify_fails_on_body_mutation() {
        let secret = "test-signing-secret";
        let timestamp = now_timestamp();
        let body = b"payload bytes";

        let signature = sign_request(secret, &timestamp, body).unwrap();

        let mut mutated = body.to_vec();
        mutated[0] ^= 0x01;
        assert!(!verify_slack_signature(
            secret, &timestamp, &mutated, &signature, 300
        ));
    }

    #[test]
    fn test_verify_fails_on_signature_mutation() {
        let secret = "test-signing-secret";
        let timestamp = now_timestamp();
        let body = b"payload bytes";

        let signature = sign_request(secret, &timestamp, body).unwrap();

        let mut chars: Vec<char> = signature.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '0' { '1' } else { '0' };
        let mutated: String = chars.into_iter().collect();

        assert!(!verify_slack_signature(
            secret, &timestamp, body, &mutated, 300
        ));
    }

    #[test]
    fn test_verify_fails_with_wrong_secret() {
        let timestamp = now_timestamp();
        let body = b"payload bytes";
        let signature = sign_request("right-secret", &timestamp, body).unwrap();

        assert!(!verify_slack_signature(
            "wrong-secret",
            &timestamp,
            body,
            &signature,
            300
        ));
    }

    #[test]
    fn test_verify_missing_fields() {
        assert!(!verify_slack_signature("", "123", b"body", "v0=abc", 300));
        assert!(!verify_slack_signature("key", "", b"body", "v0=abc", 300));
        assert!(!verify_slack_signature("key", "123", b"body", "", 300));
    }

    #[test]
    fn test_verify_invalid_timestamp() {
        assert!(!verify_slack_signature(
            "key",
            "not-a-number",
            b"body",
            "v0=abc",
            300
        ));
    }

    #[test]
    fn test_verify_stale_timestamp() {
        // Year 2000, far past any sane max age
        let timestamp = "946684800";
        let signature = sign_request("key", timestamp, b"body").unwrap();

        assert!(!verify_slack_signature("key", timestamp, b"body", &signature, 300));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
