//! Handshake digest.
//!
//! CMPP authenticates a login with
//!
//! ```text
//! AuthenticatorSource = MD5(source_addr ‖ 0x00 × 9 ‖ shared_secret ‖ timestamp)
//! ```
//!
//! where `timestamp` is `MMDDHHMMSS` written as ten ASCII digits.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use md5::{Digest, Md5};

use crate::error::CmppError;

/// Size of an MD5 digest.
pub const DIGEST_SIZE: usize = 16;

/// Maximum length of the SP source address (the login name).
pub const MAX_SOURCE_ADDR_LENGTH: usize = 6;

const AUTH_PADDING: [u8; 9] = [0; 9];

/// MD5 over `input`.
pub fn digest(input: &[u8]) -> Result<[u8; DIGEST_SIZE], CmppError> {
    if input.is_empty() {
        return Err(CmppError::InvalidArgument("digest input is empty"));
    }
    Ok(Md5::digest(input).into())
}

/// Compute the `AuthenticatorSource` field of a connect request.
pub fn authenticator_source(
    source_addr: &str,
    shared_secret: &str,
    timestamp: u32,
) -> Result<[u8; DIGEST_SIZE], CmppError> {
    if source_addr.is_empty() {
        return Err(CmppError::InvalidArgument("source address is empty"));
    }
    if source_addr.len() > MAX_SOURCE_ADDR_LENGTH {
        return Err(CmppError::CredentialTooLong {
            length: source_addr.len(),
            max: MAX_SOURCE_ADDR_LENGTH,
        });
    }

    let stamp = format!("{timestamp:010}");
    let mut input = Vec::with_capacity(
        source_addr.len() + AUTH_PADDING.len() + shared_secret.len() + stamp.len(),
    );
    input.extend_from_slice(source_addr.as_bytes());
    input.extend_from_slice(&AUTH_PADDING);
    input.extend_from_slice(shared_secret.as_bytes());
    input.extend_from_slice(stamp.as_bytes());
    digest(&input)
}

/// `MMDDHHMMSS` for the given local time, as carried in the connect body.
pub fn timestamp_at(at: &NaiveDateTime) -> u32 {
    at.month() * 100_000_000
        + at.day() * 1_000_000
        + at.hour() * 10_000
        + at.minute() * 100
        + at.second()
}

/// `MMDDHHMMSS` for the current local time.
pub fn timestamp_now() -> u32 {
    timestamp_at(&Local::now().naive_local())
}

/// Lowercase hex rendering of a digest.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn digest_known_vector() {
        let md = digest(b"password123").unwrap();
        assert_eq!(to_hex(&md), "482c811da5d5b4bc6d497ffa98491e38");
    }

    #[test]
    fn digest_rejects_empty_input() {
        assert!(matches!(
            digest(b""),
            Err(CmppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn authenticator_matches_manual_composition() {
        let auth = authenticator_source("901234", "secret", 102_030_405).unwrap();

        let mut manual = b"901234".to_vec();
        manual.extend_from_slice(&[0u8; 9]);
        manual.extend_from_slice(b"secret0102030405");
        assert_eq!(auth, digest(&manual).unwrap());
        assert_eq!(to_hex(&auth), "1c39df8b9c01798a8f35c3c785cf91ce");
    }

    #[test]
    fn authenticator_rejects_long_source_addr() {
        assert!(matches!(
            authenticator_source("1234567", "secret", 0),
            Err(CmppError::CredentialTooLong { length: 7, max: 6 })
        ));
        assert!(matches!(
            authenticator_source("", "secret", 0),
            Err(CmppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn timestamp_layout() {
        let at = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        assert_eq!(timestamp_at(&at), 1_231_235_958);

        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(format!("{:010}", timestamp_at(&at)), "0102030405");
    }
}
