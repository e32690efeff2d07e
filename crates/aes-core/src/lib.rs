//! AES-128 encryption engine for independent parallel lanes.
//!
//! This crate follows the FIPS-197 specification and provides:
//! - The S-box as a copyable [`SubstitutionTable`] so each lane can own one.
//! - Key schedule for AES-128.
//! - The four round transformations.
//! - [`CipherPipeline`], one complete single-block encryption instance.
//!
//! Only encryption is implemented. The implementation aims for clarity and
//! testability rather than constant-time guarantees; it should not be treated
//! as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
mod key;
mod pipeline;
mod sbox;

pub mod round;

pub use crate::block::{block_from_slice, xor_in_place, Block, BLOCK_LEN};
pub use crate::cipher::{
    encrypt, encrypt_block, encrypt_block_with, encrypt_parts, expand_key, expand_key_with, ROUNDS,
};
pub use crate::error::CipherError;
pub use crate::key::{Aes128Key, RoundKeys, KEY_LEN, ROUND_KEY_COUNT};
pub use crate::pipeline::{CipherPipeline, Stage};
pub use crate::sbox::{sbox, SubstitutionTable};
