//! JWT expiry inspection
//!
//! The client never verifies signatures; the backend owns validation. The
//! only claim read locally is `exp`, which the route guard checks before
//! letting a view render.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use pulsedesk_core::{Error, Result};

/// Decode the `exp` claim from a JWT without verifying it.
///
/// Returns `Ok(None)` for a well-formed token that carries no expiry.
///
/// # Errors
///
/// Returns [`Error::Session`] when the token is not three base64 segments
/// of JSON, which the guard treats as a wiped session.
pub fn decode_expiry(token: &str) -> Result<Option<DateTime<Utc>>> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::Session("Token is not a three-part JWT".to_string()));
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error::Session(format!("Token payload is not base64: {e}")))?;

    let claims: serde_json::Value = serde_json::from_slice(&decoded)
        .map_err(|e| Error::Session(format!("Token payload is not JSON: {e}")))?;

    Ok(claims
        .get("exp")
        .and_then(serde_json::Value::as_i64)
        .and_then(|exp| DateTime::from_timestamp(exp, 0)))
}

/// Whether a token is expired as of `now`.
///
/// A token without an `exp` claim never expires locally.
///
/// # Errors
///
/// Propagates [`Error::Session`] for a malformed token.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> Result<bool> {
    Ok(decode_expiry(token)?.is_some_and(|exp| exp <= now))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn make_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_decode_expiry_reads_exp_claim() {
        let token = make_token(&serde_json::json!({"sub": "usr_1", "exp": 1_717_243_200}));
        let exp = decode_expiry(&token).unwrap().unwrap();
        assert_eq!(exp, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_token_without_exp_never_expires() {
        let token = make_token(&serde_json::json!({"sub": "usr_1"}));
        assert_eq!(decode_expiry(&token).unwrap(), None);
        assert!(!is_expired(&token, Utc::now()).unwrap());
    }

    #[test]
    fn test_is_expired_boundary() {
        let exp = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let token = make_token(&serde_json::json!({"exp": exp.timestamp()}));

        assert!(!is_expired(&token, exp - chrono::Duration::seconds(1)).unwrap());
        assert!(is_expired(&token, exp).unwrap());
        assert!(is_expired(&token, exp + chrono::Duration::hours(1)).unwrap());
    }

    #[test]
    fn test_malformed_tokens_are_session_errors() {
        for raw in ["", "one.two", "a.b.c.d", "not-a-jwt"] {
            assert!(decode_expiry(raw).is_err(), "{raw:?} should be rejected");
        }

        // Valid shape, garbage payload
        let garbage = "aGVhZGVy.!!!.c2ln";
        assert!(decode_expiry(garbage).is_err());

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"plain text"));
        assert!(decode_expiry(&not_json).is_err());
    }
}
