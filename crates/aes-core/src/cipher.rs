//! AES-128 key schedule and block encryption.

use crate::block::{block_from_slice, Block};
use crate::error::CipherError;
use crate::key::{Aes128Key, RoundKeys, KEY_LEN, ROUND_KEY_COUNT};
use crate::pipeline::CipherPipeline;
use crate::sbox::SubstitutionTable;

/// Number of rounds in AES-128.
pub const ROUNDS: usize = 10;

// Entry 0 is never read; word indices divisible by four start at 4.
const RCON: [u8; 11] = [0x8d, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

const WORDS: usize = 4 * ROUND_KEY_COUNT;

/// Expands a 128-bit key into 11 round keys using the standard S-box.
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    expand_key_with(key, &SubstitutionTable::STANDARD)
}

/// Expands a 128-bit key into 11 round keys, substituting through `table`.
pub fn expand_key_with(key: &Aes128Key, table: &SubstitutionTable) -> RoundKeys {
    let mut schedule = [0u8; KEY_LEN * ROUND_KEY_COUNT];
    schedule[..KEY_LEN].copy_from_slice(&key.0);

    for i in 4..WORDS {
        let prev = (i - 1) * 4;
        let mut temp = [
            schedule[prev],
            schedule[prev + 1],
            schedule[prev + 2],
            schedule[prev + 3],
        ];

        if i % 4 == 0 {
            temp.rotate_left(1);
            for byte in temp.iter_mut() {
                *byte = table.substitute(*byte);
            }
            temp[0] ^= RCON[i / 4];
        }

        let back = (i - 4) * 4;
        for j in 0..4 {
            schedule[i * 4 + j] = schedule[back + j] ^ temp[j];
        }
    }

    let mut round_keys = [[0u8; 16]; ROUND_KEY_COUNT];
    for (round_key, chunk) in round_keys.iter_mut().zip(schedule.chunks_exact(KEY_LEN)) {
        round_key.copy_from_slice(chunk);
    }
    RoundKeys(round_keys)
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    encrypt_block_with(block, round_keys, &SubstitutionTable::STANDARD)
}

/// Encrypts a single block, substituting through `table`.
pub fn encrypt_block_with(
    block: &Block,
    round_keys: &RoundKeys,
    table: &SubstitutionTable,
) -> Block {
    CipherPipeline::with_schedule(*round_keys, *table, block).run()
}

/// Validates `key` and `plaintext`, then encrypts through a fresh pipeline.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Block, CipherError> {
    Ok(CipherPipeline::new(key, plaintext)?.run())
}

/// Like [`encrypt`] for callers that already hold typed inputs.
pub fn encrypt_parts(key: &Aes128Key, plaintext: &[u8]) -> Result<Block, CipherError> {
    let block = block_from_slice(plaintext)?;
    Ok(CipherPipeline::from_parts(key, &block).run())
}
