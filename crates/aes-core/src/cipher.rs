//! AES key schedule and forward block encryption.

use crate::block::{Block, BLOCK_BYTES};
use crate::key::{KeyLengthError, KeySize, RoundKeys, MAX_ROUND_KEYS};
use crate::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a 128, 192 or 256-bit key into its round keys.
pub fn expand_key(key: &[u8]) -> Result<RoundKeys, KeyLengthError> {
    let size = KeySize::from_len(key.len())?;
    let nk = size.words();
    let total_words = BLOCK_BYTES / 4 * (size.rounds() + 1);

    let mut w = [0u32; 4 * MAX_ROUND_KEYS];
    for (word, chunk) in w.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in nk..total_words {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    let mut keys = [[0u8; BLOCK_BYTES]; MAX_ROUND_KEYS];
    for (round_key, words) in keys.iter_mut().zip(w[..total_words].chunks_exact(4)) {
        for (dst, word) in round_key.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(&word.to_be_bytes());
        }
    }
    w.fill(0);

    Ok(RoundKeys { keys, size })
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(0));

    for round in 1..rounds {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_keys.get(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, round_keys.get(rounds));

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIPS_PLAIN: &str = "00112233445566778899aabbccddeeff";

    fn block(hex_str: &str) -> Block {
        let bytes = hex::decode(hex_str).expect("valid hex");
        bytes.try_into().expect("16 bytes")
    }

    fn encrypt_hex(key_hex: &str, plain_hex: &str) -> String {
        let key = hex::decode(key_hex).expect("valid hex");
        let round_keys = expand_key(&key).expect("valid key length");
        hex::encode(encrypt_block(&block(plain_hex), &round_keys))
    }

    #[test]
    fn encrypt_matches_fips_197_aes128() {
        assert_eq!(
            encrypt_hex("000102030405060708090a0b0c0d0e0f", FIPS_PLAIN),
            "69c4e0d86a7b0430d8cdb78070b4c55a"
        );
    }

    #[test]
    fn encrypt_matches_fips_197_aes192() {
        assert_eq!(
            encrypt_hex(
                "000102030405060708090a0b0c0d0e0f1011121314151617",
                FIPS_PLAIN
            ),
            "dda97ca4864cdfe06eaf70a0ec0d7191"
        );
    }

    #[test]
    fn encrypt_matches_fips_197_aes256() {
        assert_eq!(
            encrypt_hex(
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
                FIPS_PLAIN
            ),
            "8ea2b7ca516745bfeafc49904b496089"
        );
    }

    #[test]
    fn encrypt_matches_sp800_38a_ecb_aes256() {
        assert_eq!(
            encrypt_hex(
                "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
                "6bc1bee22e409f96e93d7e117393172a"
            ),
            "f3eed1bdb5d2a03c064b5a7e3db181f8"
        );
    }

    #[test]
    fn key_schedule_starts_with_key_and_ends_at_fips_word() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").expect("valid hex");
        let round_keys = expand_key(&key).expect("valid key length");
        assert_eq!(round_keys.get(0).as_slice(), key.as_slice());
        // FIPS-197 A.1: w[40..44].
        assert_eq!(
            hex::encode(round_keys.get(10)),
            "d014f9a8c9ee2589e13f0cc8b6630ca6"
        );
    }

    #[test]
    fn rejects_bad_key_length() {
        assert_eq!(expand_key(&[0u8; 20]), Err(KeyLengthError(20)));
        assert_eq!(expand_key(&[]), Err(KeyLengthError(0)));
    }
}
