//! Partial key derivation for the radiko handshake
//!
//! Stage 1 of the handshake answers with an offset/length pair into the
//! player key. Stage 2 expects the base64 encoding of exactly that slice.
//! Everything here is pure and does no I/O.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Key distributed with the radiko HTML5 player
pub const AUTH_KEY: &[u8] = b"bcd151073c03b352e1ef2fd66c32209da9ca0afa";

/// Offset/length pair issued by stage 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub offset: usize,
    pub length: usize,
}

impl Challenge {
    /// Builds a challenge from signed values, rejecting negatives
    pub fn new(offset: i64, length: i64) -> Result<Self> {
        match (usize::try_from(offset), usize::try_from(length)) {
            (Ok(offset), Ok(length)) => Ok(Self { offset, length }),
            _ => Err(Error::ChallengeRange {
                offset: offset.to_string(),
                length: length.to_string(),
                key_len: 0,
            }),
        }
    }

    /// Parses the `X-Radiko-KeyOffset` / `X-Radiko-KeyLength` header values
    pub fn parse(offset: &str, length: &str) -> Result<Self> {
        let invalid = || Error::ChallengeRange {
            offset: offset.to_string(),
            length: length.to_string(),
            key_len: 0,
        };
        let offset_value = offset.trim().parse::<i64>().map_err(|_| invalid())?;
        let length_value = length.trim().parse::<i64>().map_err(|_| invalid())?;
        Self::new(offset_value, length_value)
    }

    /// Exclusive end of the slice, if it does not overflow
    fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }
}

/// Encodes `key[offset..offset + length]` as standard base64
///
/// Fails with [`Error::ChallengeRange`] when the range leaves the key; the
/// slice is never truncated.
pub fn derive_partial_key(key: &[u8], challenge: &Challenge) -> Result<String> {
    let slice = challenge
        .end()
        .filter(|end| *end <= key.len())
        .map(|end| &key[challenge.offset..end])
        .ok_or_else(|| Error::ChallengeRange {
            offset: challenge.offset.to_string(),
            length: challenge.length.to_string(),
            key_len: key.len(),
        })?;

    Ok(STANDARD.encode(slice))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &[u8; 20] = b"0123456789abcdefghij";

    #[test]
    fn test_known_slice() {
        let challenge = Challenge::new(5, 10).unwrap();
        let key = derive_partial_key(BLOB, &challenge).unwrap();
        assert_eq!(key, STANDARD.encode(b"56789abcde"));
    }

    #[test]
    fn test_decoded_length_matches() {
        for offset in 0..=BLOB.len() {
            for length in 0..=(BLOB.len() - offset) {
                let challenge = Challenge::new(offset as i64, length as i64).unwrap();
                let encoded = derive_partial_key(BLOB, &challenge).unwrap();
                let decoded = STANDARD.decode(&encoded).unwrap();
                assert_eq!(decoded.len(), length);
                assert_eq!(decoded, &BLOB[offset..offset + length]);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let challenge = Challenge::new(3, 7).unwrap();
        assert_eq!(
            derive_partial_key(AUTH_KEY, &challenge).unwrap(),
            derive_partial_key(AUTH_KEY, &challenge).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let challenge = Challenge::new(15, 6).unwrap();
        let err = derive_partial_key(BLOB, &challenge).unwrap_err();
        match err {
            Error::ChallengeRange { key_len, .. } => assert_eq!(key_len, 20),
            other => panic!("unexpected error: {other:?}"),
        }

        let whole = Challenge::new(0, 20).unwrap();
        assert!(derive_partial_key(BLOB, &whole).is_ok());
        let past_end = Challenge::new(20, 1).unwrap();
        assert!(derive_partial_key(BLOB, &past_end).is_err());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let challenge = Challenge {
            offset: usize::MAX,
            length: 2,
        };
        assert!(matches!(
            derive_partial_key(BLOB, &challenge),
            Err(Error::ChallengeRange { .. })
        ));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        assert!(matches!(
            Challenge::new(-1, 4),
            Err(Error::ChallengeRange { .. })
        ));
        assert!(matches!(
            Challenge::new(2, -4),
            Err(Error::ChallengeRange { .. })
        ));
    }

    #[test]
    fn test_parse_header_values() {
        assert_eq!(
            Challenge::parse(" 12 ", "16").unwrap(),
            Challenge {
                offset: 12,
                length: 16
            }
        );
        assert!(Challenge::parse("abc", "16").is_err());
        assert!(Challenge::parse("12", "-3").is_err());
        assert!(Challenge::parse("", "16").is_err());
    }
}
