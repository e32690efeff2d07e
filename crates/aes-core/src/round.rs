//! AES round transformations.
//!
//! All four operate in place on a column-major state and hold no state of
//! their own.

use crate::block::{xor_in_place, Block};
use crate::sbox::SubstitutionTable;

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block, table: &SubstitutionTable) {
    for byte in state.iter_mut() {
        *byte = table.substitute(*byte);
    }
}

/// Performs ShiftRows in place: row `r` rotates left by `r` columns.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let src = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[col * 4 + row] = src[((col + row) % 4) * 4 + row];
        }
    }
}

/// Multiplies by `x` in GF(2^8) modulo the AES polynomial.
#[inline]
pub fn xtime(byte: u8) -> u8 {
    (byte << 1) ^ (((byte >> 7) & 1) * 0x1b)
}

fn mix_single_column(col: &mut [u8]) {
    let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
    let all = a0 ^ a1 ^ a2 ^ a3;
    col[0] = a0 ^ all ^ xtime(a0 ^ a1);
    col[1] = a1 ^ all ^ xtime(a1 ^ a2);
    col[2] = a2 ^ all ^ xtime(a2 ^ a3);
    col[3] = a3 ^ all ^ xtime(a3 ^ a0);
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        mix_single_column(column);
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_from_hex(hex: &str) -> Block {
        let mut out = [0u8; 16];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap();
        }
        out
    }

    #[test]
    fn xtime_reduces_on_overflow() {
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
        assert_eq!(xtime(0x80), 0x1b);
        assert_eq!(xtime(0x00), 0x00);
    }

    #[test]
    fn shift_rows_rotates_each_row_by_its_index() {
        let mut state: Block = core::array::from_fn(|i| i as u8);
        shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]
        );
    }

    // FIPS-197 appendix B, round 1.
    #[test]
    fn round_one_matches_fips_trace() {
        let table = SubstitutionTable::new();
        let mut state = state_from_hex("193de3bea0f4e22b9ac68d2ae9f84808");

        sub_bytes(&mut state, &table);
        assert_eq!(state, state_from_hex("d42711aee0bf98f1b8b45de51e415230"));

        shift_rows(&mut state);
        assert_eq!(state, state_from_hex("d4bf5d30e0b452aeb84111f11e2798e5"));

        mix_columns(&mut state);
        assert_eq!(state, state_from_hex("046681e5e0cb199a48f8d37a2806264c"));

        add_round_key(&mut state, &state_from_hex("a0fafe1788542cb123a339392a6c7605"));
        assert_eq!(state, state_from_hex("a49c7ff2689f352b6b5bea43026a5049"));
    }

    #[test]
    fn mix_columns_known_column() {
        let mut state = [0u8; 16];
        state[..4].copy_from_slice(&[0xdb, 0x13, 0x53, 0x45]);
        mix_columns(&mut state);
        assert_eq!(&state[..4], &[0x8e, 0x4d, 0xa1, 0xbc]);
    }
}
