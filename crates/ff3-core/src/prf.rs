//! The FF3-1 round function.
//!
//! Each round packs a 16-byte block `P = (W xor [0, 0, 0, i]) || [NUM_radix(REV(B))]^12`
//! and enciphers it as `REVB(CIPH_REVB(K)(REVB(P)))`. AES only ever runs in the
//! forward direction.

use aes_core::{encrypt_block, expand_key, reverse, Block, RoundKeys, BLOCK_BYTES};
use zeroize::Zeroizing;

use crate::error::{Ff3Error, Ff3Result};
use crate::radix;
use crate::tweak::TweakHalf;

/// Bytes of the round block holding the numeric half.
pub const TAIL_BYTES: usize = 12;

/// Builds the round block from the round index, the active tweak half and the
/// digits of the half that is not being replaced.
pub fn construct_block(
    round: u8,
    half: &TweakHalf,
    digits: &[u8],
    radix: u32,
) -> Ff3Result<Block> {
    debug_assert!(round < 8, "FF3-1 has eight rounds");
    let tail = radix::num_rev(digits, radix)?.to_bytes_be();
    if tail.len() > TAIL_BYTES {
        return Err(Ff3Error::Encryption(format!(
            "round input needs {} bytes, more than the {TAIL_BYTES} available",
            tail.len()
        )));
    }

    let mut block = [0u8; BLOCK_BYTES];
    block[..4].copy_from_slice(half);
    block[3] ^= round;
    block[BLOCK_BYTES - tail.len()..].copy_from_slice(&tail);
    Ok(block)
}

/// AES keyed with the byte-reversed FF3-1 key.
pub struct RoundFunction {
    round_keys: RoundKeys,
}

impl RoundFunction {
    /// Expands `key` (16, 24 or 32 bytes) for use as the round PRF.
    pub fn new(key: &[u8]) -> Ff3Result<Self> {
        let reversed: Zeroizing<Vec<u8>> = Zeroizing::new(key.iter().rev().copied().collect());
        let round_keys =
            expand_key(&reversed).map_err(|e| Ff3Error::Configuration(e.to_string()))?;
        Ok(Self { round_keys })
    }

    /// Enciphers one round block.
    pub fn apply(&self, block: &Block) -> Block {
        reverse(&encrypt_block(&reverse(block), &self.round_keys))
    }
}
