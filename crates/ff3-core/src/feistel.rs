//! The eight-round FF3-1 Feistel network.

use num_bigint::BigUint;

use crate::error::{Ff3Error, Ff3Result};
use crate::params::DomainParams;
use crate::prf::{construct_block, RoundFunction};
use crate::radix::{self, num_rev, str_rev};
use crate::tweak::{Tweak, TweakHalf};

/// Number of Feistel rounds.
pub const ROUNDS: u8 = 8;

/// FF3-1 cipher bound to one key and one domain.
///
/// Immutable after construction, so a single instance can be shared across
/// threads.
pub struct Ff3Cipher {
    prf: RoundFunction,
    params: DomainParams,
}

/// Per-call constants: the split point and both round moduli.
struct Layout {
    u: usize,
    v: usize,
    radix: u32,
    mod_u: BigUint,
    mod_v: BigUint,
}

impl Layout {
    fn new(n: usize, radix: u32) -> Self {
        let u = n.div_ceil(2);
        let v = n - u;
        let base = BigUint::from(radix);
        Self {
            u,
            v,
            radix,
            mod_u: base.pow(u as u32),
            mod_v: base.pow(v as u32),
        }
    }

    /// Even rounds replace a `u`-digit half keyed by `TR`, odd rounds a
    /// `v`-digit half keyed by `TL`.
    fn round<'a>(
        &'a self,
        round: u8,
        left: &'a TweakHalf,
        right: &'a TweakHalf,
    ) -> (&'a TweakHalf, usize, &'a BigUint) {
        if round % 2 == 0 {
            (right, self.u, &self.mod_u)
        } else {
            (left, self.v, &self.mod_v)
        }
    }
}

impl Ff3Cipher {
    /// Creates a cipher from raw AES key material (16, 24 or 32 bytes).
    pub fn new(key: &[u8], params: DomainParams) -> Ff3Result<Self> {
        Ok(Self {
            prf: RoundFunction::new(key)?,
            params,
        })
    }

    /// Domain this cipher accepts.
    pub fn params(&self) -> &DomainParams {
        &self.params
    }

    /// Encrypts a numeral string. The output has the same length and alphabet.
    pub fn encrypt(&self, plaintext: &str, tweak: &Tweak) -> Ff3Result<String> {
        let digits = self.params.validate(plaintext)?;
        Ok(radix::encode(&self.encrypt_digits(&digits, tweak)?))
    }

    /// Decrypts a numeral string produced by [`Ff3Cipher::encrypt`] under the same tweak.
    pub fn decrypt(&self, ciphertext: &str, tweak: &Tweak) -> Ff3Result<String> {
        let digits = self.params.validate(ciphertext)?;
        Ok(radix::encode(&self.decrypt_digits(&digits, tweak)?))
    }

    /// Encrypts digit values (each below the radix).
    pub fn encrypt_digits(&self, digits: &[u8], tweak: &Tweak) -> Ff3Result<Vec<u8>> {
        self.check_digits(digits)?;
        let layout = Layout::new(digits.len(), self.params.radix);
        let (left, right) = tweak.split();
        let mut a = digits[..layout.u].to_vec();
        let mut b = digits[layout.u..].to_vec();

        for round in 0..ROUNDS {
            let (half, m, modulus) = layout.round(round, &left, &right);
            let y = self.round_value(round, half, &b, &layout, modulus)?;
            let c = (num_rev(&a, layout.radix)? + y) % modulus;
            let next = str_rev(&c, m, layout.radix);
            a = std::mem::replace(&mut b, next);
        }

        a.extend_from_slice(&b);
        Ok(a)
    }

    /// Inverse of [`Ff3Cipher::encrypt_digits`].
    pub fn decrypt_digits(&self, digits: &[u8], tweak: &Tweak) -> Ff3Result<Vec<u8>> {
        self.check_digits(digits)?;
        let layout = Layout::new(digits.len(), self.params.radix);
        let (left, right) = tweak.split();
        let mut a = digits[..layout.u].to_vec();
        let mut b = digits[layout.u..].to_vec();

        for round in (0..ROUNDS).rev() {
            let (half, m, modulus) = layout.round(round, &left, &right);
            let y = self.round_value(round, half, &a, &layout, modulus)?;
            // y < modulus, so adding the modulus first keeps the subtraction non-negative.
            let c = (num_rev(&b, layout.radix)? + modulus - y) % modulus;
            let next = str_rev(&c, m, layout.radix);
            b = std::mem::replace(&mut a, next);
        }

        a.extend_from_slice(&b);
        Ok(a)
    }

    /// `NUM(S) mod radix^m` for the round block built from `source`.
    fn round_value(
        &self,
        round: u8,
        half: &TweakHalf,
        source: &[u8],
        layout: &Layout,
        modulus: &BigUint,
    ) -> Ff3Result<BigUint> {
        let block = construct_block(round, half, source, layout.radix)?;
        let s = self.prf.apply(&block);
        Ok(BigUint::from_bytes_be(&s) % modulus)
    }

    fn check_digits(&self, digits: &[u8]) -> Ff3Result<()> {
        self.params.check_len(digits.len())?;
        let radix = self.params.radix;
        if let Some(pos) = digits.iter().position(|&d| u32::from(d) >= radix) {
            return Err(Ff3Error::InputValidation(format!(
                "digit at position {pos} is not below radix {radix}"
            )));
        }
        Ok(())
    }
}
