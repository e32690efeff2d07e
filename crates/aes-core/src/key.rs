//! Key types for AES-128.

use crate::block::Block;
use crate::error::CipherError;

/// Length of an AES-128 key in bytes.
pub const KEY_LEN: usize = 16;

/// Number of round keys in an AES-128 schedule (initial key plus ten rounds).
pub const ROUND_KEY_COUNT: usize = 11;

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128Key(pub [u8; KEY_LEN]);

impl From<[u8; KEY_LEN]> for Aes128Key {
    fn from(value: [u8; KEY_LEN]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Aes128Key {
    type Error = CipherError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength { len: bytes.len() })?;
        Ok(Self(key))
    }
}

/// Expanded round keys for AES-128.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys(pub [Block; ROUND_KEY_COUNT]);

impl RoundKeys {
    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.0[round]
    }

    /// Returns the whole 176-byte schedule, round key 0 first.
    pub fn to_bytes(&self) -> [u8; KEY_LEN * ROUND_KEY_COUNT] {
        let mut out = [0u8; KEY_LEN * ROUND_KEY_COUNT];
        for (chunk, round_key) in out.chunks_exact_mut(KEY_LEN).zip(self.0.iter()) {
            chunk.copy_from_slice(round_key);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_slice_rejects_bad_lengths() {
        assert_eq!(
            Aes128Key::try_from(&[0u8; 15][..]),
            Err(CipherError::InvalidKeyLength { len: 15 })
        );
        assert_eq!(
            Aes128Key::try_from(&[0u8; 17][..]),
            Err(CipherError::InvalidKeyLength { len: 17 })
        );
        assert_eq!(Aes128Key::try_from(&[9u8; 16][..]), Ok(Aes128Key([9u8; 16])));
    }

    #[test]
    fn to_bytes_concatenates_round_keys() {
        let mut keys = [[0u8; 16]; ROUND_KEY_COUNT];
        for (i, key) in keys.iter_mut().enumerate() {
            *key = [i as u8; 16];
        }
        let bytes = RoundKeys(keys).to_bytes();
        assert_eq!(bytes.len(), 176);
        assert_eq!(&bytes[..16], &[0u8; 16]);
        assert_eq!(&bytes[160..], &[10u8; 16]);
    }
}
