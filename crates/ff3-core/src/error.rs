//! Error types for the FF3-1 engine.

use thiserror::Error;

/// Result type for FF3-1 operations.
pub type Ff3Result<T> = Result<T, Ff3Error>;

/// Errors surfaced by the engine. No variant ever carries plaintext or key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ff3Error {
    /// Input is malformed: bad characters, out-of-range length or a bad tweak.
    /// Rejected before any cryptographic work.
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Key material or domain parameters are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The key provider has no key under the requested id.
    #[error(transparent)]
    KeyNotFound(#[from] KeyNotFoundError),

    /// Unexpected failure inside the round function or arithmetic pipeline.
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl Ff3Error {
    /// Short, stable label used in audit records and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Ff3Error::InputValidation(_) => "input_validation",
            Ff3Error::Configuration(_) => "configuration",
            Ff3Error::KeyNotFound(_) => "key_not_found",
            Ff3Error::Encryption(_) => "encryption",
        }
    }
}

/// Returned by a [`KeyProvider`](crate::KeyProvider) for an unknown key id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Key not found: {key_id}")]
pub struct KeyNotFoundError {
    /// The id that was looked up.
    pub key_id: String,
}

impl KeyNotFoundError {
    /// Creates the error for `key_id`.
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
        }
    }
}
