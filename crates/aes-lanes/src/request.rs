//! Encryption requests as produced by the accelerator's host workload.
//!
//! A request carries a single 64-bit value. It becomes a block whose first
//! eight bytes are zero and whose last eight hold the value little-endian;
//! the resulting ciphertext is read back as two little-endian words.

use aes_core::Block;
use thiserror::Error;

/// One parsed line of a request file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// An AES request carrying its data word.
    Aes(u64),
    /// A request for another kernel (e.g. `Paillier`), not served here.
    Other,
}

/// Why a request line could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestParseError {
    /// The line does not start with a known kernel tag.
    #[error("unrecognized request line {0:?}")]
    Unrecognized(String),
    /// The data field is not a decimal 64-bit value.
    #[error("invalid request value {0:?}")]
    InvalidValue(String),
}

const AES_TAG: &str = "AES";
const OTHER_TAGS: &[&str] = &["Paillier"];

/// Parses a `TAG,<decimal>` line.
pub fn parse_request_line(line: &str) -> Result<Request, RequestParseError> {
    let line = line.trim();
    let (tag, value) = line
        .split_once(',')
        .ok_or_else(|| RequestParseError::Unrecognized(line.to_owned()))?;

    if tag == AES_TAG {
        let value = value.trim();
        value
            .parse::<u64>()
            .map(Request::Aes)
            .map_err(|_| RequestParseError::InvalidValue(value.to_owned()))
    } else if OTHER_TAGS.contains(&tag) {
        Ok(Request::Other)
    } else {
        Err(RequestParseError::Unrecognized(line.to_owned()))
    }
}

/// Widens a request value into a plaintext block.
pub fn encode_request(value: u64) -> Block {
    let mut block = [0u8; 16];
    block[8..].copy_from_slice(&value.to_le_bytes());
    block
}

/// Splits a ciphertext into the two little-endian words the host reads back.
pub fn decode_words(block: &Block) -> [u64; 2] {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&block[..8]);
    hi.copy_from_slice(&block[8..]);
    [u64::from_le_bytes(lo), u64::from_le_bytes(hi)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!(parse_request_line("AES,42\n"), Ok(Request::Aes(42)));
        assert_eq!(
            parse_request_line("AES,18446744073709551615"),
            Ok(Request::Aes(u64::MAX))
        );
        assert_eq!(parse_request_line("Paillier,7"), Ok(Request::Other));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse_request_line("RSA,1"),
            Err(RequestParseError::Unrecognized("RSA,1".into()))
        );
        assert_eq!(
            parse_request_line("AES"),
            Err(RequestParseError::Unrecognized("AES".into()))
        );
        assert_eq!(
            parse_request_line("AES,-3"),
            Err(RequestParseError::InvalidValue("-3".into()))
        );
    }

    #[test]
    fn encoding_places_value_in_upper_half() {
        let block = encode_request(0x0102_0304_0506_0708);
        assert_eq!(&block[..8], &[0u8; 8]);
        assert_eq!(&block[8..], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(decode_words(&block), [0, 0x0102_0304_0506_0708]);
    }
}
