//! Block representation helpers.

use crate::error::CipherError;

/// Size of an AES block in bytes.
pub const BLOCK_LEN: usize = 16;

/// AES block of 16 bytes.
///
/// When used as the cipher state the bytes are laid out column-major: byte
/// `4 * c + r` holds row `r` of column `c`.
pub type Block = [u8; BLOCK_LEN];

/// Copies `bytes` into a block, rejecting anything that is not 16 bytes long.
pub fn block_from_slice(bytes: &[u8]) -> Result<Block, CipherError> {
    bytes
        .try_into()
        .map_err(|_| CipherError::InvalidBlockLength { len: bytes.len() })
}

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}
