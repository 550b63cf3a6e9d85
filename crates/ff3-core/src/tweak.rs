//! Tweaks: the 56-bit per-operation domain separator.
//!
//! The tweak is public. It must be stored next to the ciphertext by the
//! caller; decryption with any other tweak silently yields a wrong numeral.

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{Ff3Error, Ff3Result};

/// Tweak length in bytes.
pub const TWEAK_BYTES: usize = 7;

/// One 32-bit round tweak, XORed with the round index to start a round block.
pub type TweakHalf = [u8; 4];

/// FF3-1 tweak.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tweak([u8; TWEAK_BYTES]);

impl Tweak {
    /// Draws a fresh tweak from a cryptographically secure generator.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; TWEAK_BYTES];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wraps raw tweak bytes.
    pub const fn from_bytes(bytes: [u8; TWEAK_BYTES]) -> Self {
        Self(bytes)
    }

    /// Builds a tweak from a slice, which must be exactly 7 bytes.
    pub fn from_slice(bytes: &[u8]) -> Ff3Result<Self> {
        let bytes: [u8; TWEAK_BYTES] = bytes.try_into().map_err(|_| {
            Ff3Error::InputValidation(format!(
                "tweak must be {TWEAK_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Parses 14 hex characters.
    pub fn from_hex(hex_str: &str) -> Ff3Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| Ff3Error::InputValidation(format!("tweak is not valid hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Lower-case hex form, suitable for storing beside the ciphertext.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw tweak bytes.
    pub fn as_bytes(&self) -> &[u8; TWEAK_BYTES] {
        &self.0
    }

    /// Splits the tweak into `(TL, TR)`.
    ///
    /// `TL` holds bits 0..28 and `TR` holds bits 32..56 followed by bits
    /// 28..32; each is padded with a zero nibble. Even rounds use `TR`, odd
    /// rounds use `TL`.
    pub fn split(&self) -> (TweakHalf, TweakHalf) {
        let t = &self.0;
        let left = [t[0], t[1], t[2], t[3] & 0xf0];
        let right = [t[4], t[5], t[6], (t[3] & 0x0f) << 4];
        (left, right)
    }
}

impl fmt::Debug for Tweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tweak({})", self.to_hex())
    }
}

impl fmt::Display for Tweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Tweak {
    type Err = Ff3Error;

    fn from_str(s: &str) -> Ff3Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Tweak {
    type Error = Ff3Error;

    fn try_from(value: String) -> Ff3Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Tweak> for String {
    fn from(tweak: Tweak) -> Self {
        tweak.to_hex()
    }
}

impl From<[u8; TWEAK_BYTES]> for Tweak {
    fn from(bytes: [u8; TWEAK_BYTES]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn split_moves_middle_nibble_into_right_half() {
        let tweak = Tweak::from_hex("1234567890abcd").unwrap();
        let (left, right) = tweak.split();
        assert_eq!(left, [0x12, 0x34, 0x56, 0x70]);
        assert_eq!(right, [0x90, 0xab, 0xcd, 0x80]);
    }

    #[test]
    fn split_nist_sample_tweak() {
        let tweak = Tweak::from_hex("CBD09280979564").unwrap();
        let (left, right) = tweak.split();
        assert_eq!(left, [0xcb, 0xd0, 0x92, 0x80]);
        assert_eq!(right, [0x97, 0x95, 0x64, 0x00]);
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(matches!(
            Tweak::from_slice(&[0u8; 8]),
            Err(Ff3Error::InputValidation(_))
        ));
        assert!(Tweak::from_hex("cbd092809795").is_err());
        assert!(Tweak::from_hex("not hex at all").is_err());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = Tweak::generate(&mut ChaCha20Rng::from_seed([7u8; 32]));
        let b = Tweak::generate(&mut ChaCha20Rng::from_seed([7u8; 32]));
        assert_eq!(a, b);

        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let first = Tweak::generate(&mut rng);
        let second = Tweak::generate(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn hex_forms_round_trip() {
        let tweak: Tweak = "d8e7920afa330a".parse().unwrap();
        assert_eq!(tweak.to_string(), "d8e7920afa330a");
        assert_eq!(format!("{tweak:?}"), "Tweak(d8e7920afa330a)");
        let json = serde_json::to_string(&tweak).unwrap();
        assert_eq!(json, "\"d8e7920afa330a\"");
        assert_eq!(serde_json::from_str::<Tweak>(&json).unwrap(), tweak);
    }
}
