//! Key lookup.

use std::collections::HashMap;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::error::{Ff3Error, Ff3Result, KeyNotFoundError};

/// Required key length for the encryption service (AES-256).
pub const KEY_BYTES: usize = 32;

/// Source of key material, typically backed by a KMS or HSM.
///
/// Implementations return raw bytes; the service rejects anything that is not
/// exactly [`KEY_BYTES`] long.
pub trait KeyProvider {
    /// Looks up the key registered under `key_id`.
    fn get_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyNotFoundError>;
}

impl<T: KeyProvider + ?Sized> KeyProvider for &T {
    fn get_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyNotFoundError> {
        (**self).get_key(key_id)
    }
}

impl<T: KeyProvider + ?Sized> KeyProvider for Arc<T> {
    fn get_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyNotFoundError> {
        (**self).get_key(key_id)
    }
}

/// In-memory key table.
#[derive(Default)]
pub struct StaticKeyProvider {
    keys: HashMap<String, Zeroizing<Vec<u8>>>,
}

impl StaticKeyProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` under `key_id`, replacing any previous entry.
    pub fn insert(&mut self, key_id: impl Into<String>, key: &[u8]) {
        self.keys
            .insert(key_id.into(), Zeroizing::new(key.to_vec()));
    }

    /// Registers a hex-encoded key.
    pub fn insert_hex(&mut self, key_id: impl Into<String>, key_hex: &str) -> Ff3Result<()> {
        let key = Zeroizing::new(
            hex::decode(key_hex.trim())
                .map_err(|e| Ff3Error::Configuration(format!("key is not valid hex: {e}")))?,
        );
        self.insert(key_id, &key);
        Ok(())
    }

    /// Builder form of [`StaticKeyProvider::insert`].
    pub fn with_key(mut self, key_id: impl Into<String>, key: &[u8]) -> Self {
        self.insert(key_id, key);
        self
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyProvider for StaticKeyProvider {
    fn get_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, KeyNotFoundError> {
        self.keys
            .get(key_id)
            .cloned()
            .ok_or_else(|| KeyNotFoundError::new(key_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let provider = StaticKeyProvider::new().with_key("pan", &[7u8; KEY_BYTES]);
        assert_eq!(provider.get_key("pan").unwrap().as_slice(), &[7u8; KEY_BYTES]);
        assert_eq!(
            provider.get_key("ssn").unwrap_err(),
            KeyNotFoundError::new("ssn")
        );
    }

    #[test]
    fn insert_hex_validates_encoding() {
        let mut provider = StaticKeyProvider::new();
        provider.insert_hex("a", "00ff").unwrap();
        assert_eq!(provider.get_key("a").unwrap().as_slice(), &[0x00, 0xff]);
        assert!(matches!(
            provider.insert_hex("b", "zz"),
            Err(Ff3Error::Configuration(_))
        ));
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn shared_provider_delegates() {
        let provider = Arc::new(StaticKeyProvider::new().with_key("k", &[1u8; 32]));
        assert!(provider.get_key("k").is_ok());
        assert!((&*provider).get_key("k").is_ok());
    }
}
