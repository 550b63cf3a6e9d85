//! FF3-1 format-preserving encryption (NIST SP 800-38G Rev. 1).
//!
//! Encrypts numeral strings, primarily payment card numbers, into numeral
//! strings of the same length and alphabet. The crate is organised leaves first:
//! - [`radix`]: numeral strings and arbitrary-precision integers.
//! - [`tweak`]: 56-bit tweaks and their round halves.
//! - [`prf`]: the AES-based round function.
//! - [`feistel`]: the eight-round Feistel network.
//! - [`service`]: the audited facade over a [`KeyProvider`] and an [`AuditSink`].
//!
//! FF3-1 gives confidentiality and format preservation only. Decrypting with
//! the wrong key or tweak yields a plausible but wrong value without any error;
//! callers that need tamper evidence must add it outside this crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod audit;
pub mod error;
pub mod feistel;
pub mod keys;
pub mod pan;
pub mod params;
pub mod prf;
pub mod radix;
pub mod service;
pub mod tweak;

pub use audit::{AuditRecord, AuditSink, NoopAuditSink, Operation, TracingAuditSink, ALGORITHM};
pub use error::{Ff3Error, Ff3Result, KeyNotFoundError};
pub use feistel::Ff3Cipher;
pub use keys::{KeyProvider, StaticKeyProvider, KEY_BYTES};
pub use pan::PanLayout;
pub use params::DomainParams;
pub use service::{EncryptionService, Protected};
pub use tweak::{Tweak, TweakHalf, TWEAK_BYTES};
