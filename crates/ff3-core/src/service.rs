//! The public tokenization facade.
//!
//! Every operation validates its input first, fetches the key once, runs the
//! cipher and reports exactly one [`AuditRecord`] whatever the outcome.

use std::sync::{Mutex, PoisonError};

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditRecord, AuditSink, Operation, ALGORITHM};
use crate::error::{Ff3Error, Ff3Result};
use crate::feistel::Ff3Cipher;
use crate::keys::{KeyProvider, KEY_BYTES};
use crate::pan::{PanLayout, PanParts};
use crate::params::DomainParams;
use crate::tweak::Tweak;

/// Ciphertext plus the tweak needed to decrypt it. Both must be stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protected {
    /// Format-preserved ciphertext.
    pub value: String,
    /// Tweak used for this value.
    pub tweak: Tweak,
}

/// FF3-1 tokenization service over a key provider and an audit sink.
pub struct EncryptionService<K, A, R = ChaCha20Rng> {
    keys: K,
    audit: A,
    params: DomainParams,
    pan_layout: PanLayout,
    rng: Mutex<R>,
}

impl<K: KeyProvider, A: AuditSink> EncryptionService<K, A, ChaCha20Rng> {
    /// Creates a service over the PAN domain with a ChaCha20 generator seeded
    /// from the operating system.
    pub fn new(keys: K, audit: A) -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::with_rng(keys, audit, ChaCha20Rng::from_seed(seed))
    }
}

impl<K, A, R> EncryptionService<K, A, R>
where
    K: KeyProvider,
    A: AuditSink,
    R: RngCore + CryptoRng,
{
    /// Creates a service drawing tweaks from `rng`.
    pub fn with_rng(keys: K, audit: A, rng: R) -> Self {
        Self {
            keys,
            audit,
            params: DomainParams::pan(),
            pan_layout: PanLayout::default(),
            rng: Mutex::new(rng),
        }
    }

    /// Replaces the numeral domain.
    pub fn with_params(mut self, params: DomainParams) -> Self {
        self.params = params;
        self
    }

    /// Replaces the PAN layout.
    pub fn with_pan_layout(mut self, layout: PanLayout) -> Self {
        self.pan_layout = layout;
        self
    }

    /// Active numeral domain.
    pub fn params(&self) -> &DomainParams {
        &self.params
    }

    /// Draws a fresh tweak.
    pub fn generate_tweak(&self) -> Tweak {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Tweak::generate(&mut *rng)
    }

    /// Encrypts under a freshly generated tweak.
    pub fn encrypt(&self, plaintext: &str, key_id: &str) -> Ff3Result<Protected> {
        self.audited(Operation::Encrypt, key_id, plaintext, || {
            self.params.validate(plaintext)?;
            let tweak = self.generate_tweak();
            let value = self.cipher(key_id)?.encrypt(plaintext, &tweak)?;
            Ok(Protected { value, tweak })
        })
    }

    /// Encrypts under a caller-supplied tweak.
    pub fn encrypt_with_tweak(
        &self,
        plaintext: &str,
        key_id: &str,
        tweak: &Tweak,
    ) -> Ff3Result<String> {
        self.audited(Operation::Encrypt, key_id, plaintext, || {
            self.params.validate(plaintext)?;
            self.cipher(key_id)?.encrypt(plaintext, tweak)
        })
    }

    /// Decrypts with the tweak that was used for encryption.
    pub fn decrypt(&self, ciphertext: &str, key_id: &str, tweak: &Tweak) -> Ff3Result<String> {
        self.audited(Operation::Decrypt, key_id, ciphertext, || {
            self.params.validate(ciphertext)?;
            self.cipher(key_id)?.decrypt(ciphertext, tweak)
        })
    }

    /// Encrypts the middle digits of a PAN, keeping layout and separators.
    pub fn encrypt_pan(&self, pan: &str, key_id: &str, tweak: &Tweak) -> Ff3Result<String> {
        self.audited(Operation::EncryptPan, key_id, pan, || {
            let parts = PanParts::parse(pan, &self.pan_layout, &self.params)?;
            let middle = self.cipher(key_id)?.encrypt(parts.middle(), tweak)?;
            Ok(parts.rebuild(&middle))
        })
    }

    /// Inverse of [`EncryptionService::encrypt_pan`].
    pub fn decrypt_pan(&self, token: &str, key_id: &str, tweak: &Tweak) -> Ff3Result<String> {
        self.audited(Operation::DecryptPan, key_id, token, || {
            let parts = PanParts::parse(token, &self.pan_layout, &self.params)?;
            let middle = self.cipher(key_id)?.decrypt(parts.middle(), tweak)?;
            Ok(parts.rebuild(&middle))
        })
    }

    fn cipher(&self, key_id: &str) -> Ff3Result<Ff3Cipher> {
        let key = self.keys.get_key(key_id)?;
        if key.len() != KEY_BYTES {
            return Err(Ff3Error::Configuration(format!(
                "key must be {} bits, got {} bits",
                KEY_BYTES * 8,
                key.len() * 8
            )));
        }
        Ff3Cipher::new(&key, self.params)
    }

    fn audited<T>(
        &self,
        context: Operation,
        key_id: &str,
        input: &str,
        op: impl FnOnce() -> Ff3Result<T>,
    ) -> Ff3Result<T> {
        let input_length = input.chars().count();
        let result = op();
        if let Err(err) = &result {
            tracing::debug!(%context, key_id, kind = err.kind(), "operation rejected");
        }
        self.audit.log_operation(&AuditRecord {
            algorithm: ALGORITHM,
            key_id: key_id.to_owned(),
            input_length,
            context,
            success: result.is_ok(),
            error_detail: result.as_ref().err().map(ToString::to_string),
        });
        result
    }
}
