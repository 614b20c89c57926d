//! Access-token payload decoding
//!
//! The payload is read without verifying the signature; the backend is the
//! only authority on token validity.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shared::JwtClaims;

use crate::error::{ClientError, ClientResult};

const INVALID_TOKEN: &str = "Invalid token format";

/// Decode the middle segment of `header.payload.signature`
pub fn decode_claims(token: &str) -> ClientResult<JwtClaims> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(ClientError::Token(INVALID_TOKEN.into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| {
            tracing::debug!(error = %e, "Token payload is not base64url");
            ClientError::Token(INVALID_TOKEN.into())
        })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(error = %e, "Token payload is not a claims object");
        ClientError::Token(INVALID_TOKEN.into())
    })
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::Role;

    #[test]
    fn test_decode_claims() {
        let token = encode_for_test(&json!({
            "sub": "u1", "phone": "+919876543210", "role": "school_admin",
            "schoolId": "s1", "iat": 1700000000, "exp": 1700086400
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role(), Role::SchoolAdmin);
        assert_eq!(claims.tenant(), Some("s1"));
        assert_eq!(claims.exp, 1700086400);
    }

    #[test]
    fn test_padded_payload_accepted() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(
            json!({"sub": "u", "role": "PARENT", "schoolId": "s"}).to_string(),
        );
        let token = format!("h.{payload}.s");
        assert!(decode_claims(&token).is_ok());
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.!!!.c", "a..c", "a.b.c.d"] {
            let err = decode_claims(token).unwrap_err();
            assert_eq!(err.to_string(), "Invalid token format", "{token}");
        }
        let not_claims = format!("h.{}.s", URL_SAFE_NO_PAD.encode("[1,2]"));
        assert!(decode_claims(&not_claims).is_err());
    }
}
