//! Input validation errors.

use thiserror::Error;

/// Reasons a key or block cannot enter the cipher.
///
/// Both are detected before any round transformation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The key is not exactly 16 bytes.
    #[error("invalid key length {len}, expected 16 bytes")]
    InvalidKeyLength {
        /// Length that was supplied.
        len: usize,
    },
    /// The plaintext block is not exactly 16 bytes.
    #[error("invalid block length {len}, expected 16 bytes")]
    InvalidBlockLength {
        /// Length that was supplied.
        len: usize,
    },
}
