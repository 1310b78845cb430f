//! Request signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::RequestError;

/// Header carrying the hex-encoded HMAC-SHA512 of the request body.
pub const SIGNATURE_HEADER: &str = "x-tfc-task-signature";

type HmacSha512 = Hmac<Sha512>;

/// Verifies a request body against its signature header.
///
/// The comparison is constant time.
///
/// # Errors
///
/// Returns [`RequestError::InvalidSignature`] if the signature is not hex
/// or does not match the body.
pub fn verify_signature(body: &[u8], signature: &str, key: &str) -> Result<(), RequestError> {
    let expected = hex::decode(signature.trim()).map_err(|_| RequestError::InvalidSignature)?;

    let mut mac =
        HmacSha512::new_from_slice(key.as_bytes()).map_err(|_| RequestError::InvalidSignature)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| RequestError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sign;

    #[test]
    fn test_valid_signature() {
        let body = br#"{"access_token":"test-token"}"#;
        let signature = sign(body, "secret");

        assert_eq!(signature.len(), 128);
        assert!(verify_signature(body, &signature, "secret").is_ok());
        assert!(verify_signature(body, &signature.to_uppercase(), "secret").is_ok());
    }

    #[test]
    fn test_rejects_wrong_key_or_body() {
        let signature = sign(b"body", "secret");

        assert!(verify_signature(b"body", &signature, "other").is_err());
        assert!(verify_signature(b"tampered", &signature, "secret").is_err());
    }

    #[test]
    fn test_rejects_malformed_signature() {
        assert!(verify_signature(b"body", "", "secret").is_err());
        assert!(verify_signature(b"body", "not-hex", "secret").is_err());
        assert!(verify_signature(b"body", "abcd", "secret").is_err());
    }
}
