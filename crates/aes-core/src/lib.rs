//! Forward-direction AES used as the pseudorandom function of the FF3-1 engine.
//!
//! This crate mirrors FIPS-197 and provides:
//! - Key schedules for 128, 192 and 256-bit keys.
//! - Single-block encryption.
//!
//! FF3-1 never runs AES in the decryption direction, so no inverse cipher is
//! provided. The implementation aims for clarity and testability rather than
//! constant-time guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod key;
mod round;
mod sbox;

pub use crate::block::{reverse, Block, BLOCK_BYTES};
pub use crate::cipher::{encrypt_block, expand_key};
pub use crate::key::{KeyLengthError, KeySize, RoundKeys};
pub use crate::sbox::sbox;
