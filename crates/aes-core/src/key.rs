//! Key sizes and expanded round keys.

use std::fmt;

use crate::block::Block;

/// Maximum number of round keys (AES-256 uses 14 rounds plus the initial key).
pub(crate) const MAX_ROUND_KEYS: usize = 15;

/// Supported AES key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySize {
    /// 128-bit key, 10 rounds.
    Aes128,
    /// 192-bit key, 12 rounds.
    Aes192,
    /// 256-bit key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Maps a key length in bytes to its key size.
    pub fn from_len(len: usize) -> Result<Self, KeyLengthError> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            other => Err(KeyLengthError(other)),
        }
    }

    /// Key length in 32-bit words (`Nk`).
    pub fn words(self) -> usize {
        match self {
            Self::Aes128 => 4,
            Self::Aes192 => 6,
            Self::Aes256 => 8,
        }
    }

    /// Number of cipher rounds (`Nr`).
    pub fn rounds(self) -> usize {
        self.words() + 6
    }
}

/// Key material whose length is not 16, 24 or 32 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyLengthError(pub usize);

impl fmt::Display for KeyLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AES key must be 16, 24 or 32 bytes, got {} bytes",
            self.0
        )
    }
}

impl std::error::Error for KeyLengthError {}

/// Expanded round keys. Unused trailing slots stay zeroed for shorter keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundKeys {
    pub(crate) keys: [Block; MAX_ROUND_KEYS],
    pub(crate) size: KeySize,
}

impl RoundKeys {
    /// Returns the round key at the requested index (`0..=rounds`).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.keys[round]
    }

    /// Key size the schedule was expanded from.
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Number of cipher rounds.
    pub fn rounds(&self) -> usize {
        self.size.rounds()
    }
}

impl Drop for RoundKeys {
    fn drop(&mut self) {
        for key in self.keys.iter_mut() {
            key.fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_sizes_from_len() {
        assert_eq!(KeySize::from_len(16), Ok(KeySize::Aes128));
        assert_eq!(KeySize::from_len(24), Ok(KeySize::Aes192));
        assert_eq!(KeySize::from_len(32), Ok(KeySize::Aes256));
        assert_eq!(KeySize::from_len(20), Err(KeyLengthError(20)));
    }

    #[test]
    fn round_counts() {
        assert_eq!(KeySize::Aes128.rounds(), 10);
        assert_eq!(KeySize::Aes192.rounds(), 12);
        assert_eq!(KeySize::Aes256.rounds(), 14);
    }

    #[test]
    fn length_error_display() {
        assert_eq!(
            KeyLengthError(8).to_string(),
            "AES key must be 16, 24 or 32 bytes, got 8 bytes"
        );
    }
}
