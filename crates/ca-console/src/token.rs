//! Bearer token inspection
//!
//! Tokens are JWT-shaped (`header.payload.signature`). Only the payload's
//! `exp` claim is read; signatures are never checked here, the backend
//! remains the authority on authentication.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Claims decoded from a token payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry instant in seconds since the epoch (NumericDate, may be fractional)
    #[serde(default)]
    pub exp: Option<f64>,

    /// Every other claim, untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
    /// Expiry instant in milliseconds since the epoch
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.exp
            .filter(|exp| exp.is_finite())
            .map(|exp| (exp * 1000.0) as i64)
    }
}

/// Time left before a token expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub minutes: i64,
    pub seconds: i64,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m {:02}s", self.minutes, self.seconds)
    }
}

/// Decode a token's payload, `None` for anything malformed
pub fn decode(token: &str) -> Option<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        debug!(segments = segments.len(), "Token does not have three segments");
        return None;
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Token payload is not valid base64url");
            return None;
        }
    };

    match serde_json::from_slice::<TokenClaims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(error = %e, "Token payload is not a JSON object");
            None
        }
    }
}

/// Whether the token is expired as of `now`
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode(token).and_then(|claims| claims.expires_at_ms()) {
        Some(expires_at) => expires_at <= now.timestamp_millis(),
        None => true,
    }
}

/// Whether the token is expired now
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// Whether a possibly-absent token is present and unexpired as of `now`
pub fn is_valid_at(token: Option<&str>, now: DateTime<Utc>) -> bool {
    match token {
        Some(token) if !token.is_empty() => !is_expired_at(token, now),
        _ => false,
    }
}

/// Whether a possibly-absent token is present and unexpired now
pub fn is_valid(token: Option<&str>) -> bool {
    is_valid_at(token, Utc::now())
}

/// Whole minutes and seconds left as of `now`, `None` once expired
pub fn remaining_lifetime_at(token: &str, now: DateTime<Utc>) -> Option<Lifetime> {
    let expires_at = decode(token)?.expires_at_ms()?;
    let delta_ms = expires_at - now.timestamp_millis();
    if delta_ms <= 0 {
        return None;
    }

    let total_seconds = delta_ms / 1000;
    Some(Lifetime {
        minutes: total_seconds / 60,
        seconds: total_seconds % 60,
    })
}

/// Whole minutes and seconds left now, `None` once expired
pub fn remaining_lifetime(token: &str) -> Option<Lifetime> {
    remaining_lifetime_at(token, Utc::now())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build an unsigned token whose payload is `claims`
    pub fn token_with_claims(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    /// Token expiring `offset_secs` after `now`
    pub fn token_expiring(now: DateTime<Utc>, offset_secs: i64) -> String {
        token_with_claims(serde_json::json!({
            "sub": "user-1",
            "exp": now.timestamp() + offset_secs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_decode_reads_exp_and_keeps_other_claims() {
        let token = token_with_claims(serde_json::json!({"exp": 1_900_000_000, "role": "admin"}));
        let claims = decode(&token).unwrap();
        assert_eq!(claims.exp, Some(1_900_000_000.0));
        assert_eq!(claims.extra["role"], "admin");
    }

    #[test]
    fn test_decode_tolerates_padding() {
        let token = token_with_claims(serde_json::json!({"exp": 1}));
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1].push_str("==");
        assert!(decode(&parts.join(".")).is_some());
    }

    #[test]
    fn test_expired_one_second_ago() {
        let now = fixed_now();
        let token = token_expiring(now, -1);
        assert!(is_expired_at(&token, now));
        assert!(!is_valid_at(Some(&token), now));
    }

    #[test]
    fn test_valid_one_second_ahead() {
        let now = fixed_now();
        let token = token_expiring(now, 1);
        assert!(!is_expired_at(&token, now));
        assert!(is_valid_at(Some(&token), now));
    }

    #[test]
    fn test_missing_payload_segment() {
        assert!(decode("header-only").is_none());
        assert!(decode("header.").is_none());
        assert!(is_expired_at("header-only", fixed_now()));
    }

    #[test]
    fn test_invalid_base64_payload() {
        let token = "eyJhbGciOiJIUzI1NiJ9.***not-base64***.sig";
        assert!(decode(token).is_none());
        assert!(is_expired_at(token, fixed_now()));
    }

    #[test]
    fn test_payload_not_json() {
        let payload = URL_SAFE_NO_PAD.encode("definitely not json");
        let token = format!("h.{payload}.s");
        assert!(decode(&token).is_none());
    }

    #[test]
    fn test_missing_exp_counts_as_expired() {
        let token = token_with_claims(serde_json::json!({"sub": "user-1"}));
        assert!(decode(&token).is_some());
        assert!(is_expired_at(&token, fixed_now()));
    }

    #[test]
    fn test_absent_or_empty_token_is_invalid() {
        assert!(!is_valid_at(None, fixed_now()));
        assert!(!is_valid_at(Some(""), fixed_now()));
    }

    #[test]
    fn test_remaining_lifetime_floors_to_whole_seconds() {
        let now = fixed_now();
        let token = token_expiring(now, 5 * 60 + 42);
        assert_eq!(
            remaining_lifetime_at(&token, now),
            Some(Lifetime { minutes: 5, seconds: 42 })
        );

        let later = now + chrono::Duration::milliseconds(1500);
        assert_eq!(
            remaining_lifetime_at(&token, later),
            Some(Lifetime { minutes: 5, seconds: 40 })
        );
    }

    #[test]
    fn test_remaining_lifetime_none_when_expired() {
        let now = fixed_now();
        assert!(remaining_lifetime_at(&token_expiring(now, -30), now).is_none());
        assert!(remaining_lifetime_at("garbage", now).is_none());
    }
}
