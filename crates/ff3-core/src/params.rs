//! Domain parameters: the radix and the permitted numeral lengths.

use serde::{Deserialize, Serialize};

use crate::error::{Ff3Error, Ff3Result};
use crate::radix::{self, MAX_RADIX};

/// Smallest domain size `radix^min_len` NIST SP 800-38G Rev. 1 permits.
pub const MIN_DOMAIN_SIZE: u128 = 1_000_000;

/// Bits of the 12-byte numeric tail of a round block.
const TAIL_BITS: u32 = 96;

/// Radix and length bounds of a format-preserving domain.
///
/// Constructed through [`DomainParams::new`], which enforces the FF3-1
/// constraints; deserialization goes through the same checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDomainParams")]
pub struct DomainParams {
    pub(crate) radix: u32,
    pub(crate) min_len: usize,
    pub(crate) max_len: usize,
}

#[derive(Deserialize)]
struct RawDomainParams {
    radix: u32,
    min_len: usize,
    max_len: usize,
}

impl TryFrom<RawDomainParams> for DomainParams {
    type Error = Ff3Error;

    fn try_from(raw: RawDomainParams) -> Ff3Result<Self> {
        Self::new(raw.radix, raw.min_len, raw.max_len)
    }
}

impl DomainParams {
    /// Decimal domain for payment card numbers (ISO/IEC 7812): 6 to 19 digits.
    pub const fn pan() -> Self {
        Self {
            radix: 10,
            min_len: 6,
            max_len: 19,
        }
    }

    /// Validates and builds a domain.
    pub fn new(radix: u32, min_len: usize, max_len: usize) -> Ff3Result<Self> {
        if !(2..=MAX_RADIX).contains(&radix) {
            return Err(Ff3Error::Configuration(format!(
                "radix {radix} is outside 2..={MAX_RADIX}"
            )));
        }
        let floor = min_len_for(radix);
        if min_len < floor {
            return Err(Ff3Error::Configuration(format!(
                "min_len {min_len} gives fewer than {MIN_DOMAIN_SIZE} values in radix {radix}; \
                 the minimum is {floor}"
            )));
        }
        let ceiling = max_len_for(radix);
        if max_len > ceiling {
            return Err(Ff3Error::Configuration(format!(
                "max_len {max_len} exceeds the radix-{radix} limit of {ceiling}"
            )));
        }
        if min_len > max_len {
            return Err(Ff3Error::Configuration(format!(
                "min_len {min_len} is greater than max_len {max_len}"
            )));
        }
        Ok(Self {
            radix,
            min_len,
            max_len,
        })
    }

    /// Numeral radix.
    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// Shortest accepted numeral.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Longest accepted numeral.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Checks a numeral's length and alphabet and returns its digit values.
    pub fn validate(&self, numeral: &str) -> Ff3Result<Vec<u8>> {
        self.check_len(numeral.chars().count())?;
        radix::decode(numeral, self.radix)
    }

    /// Checks a numeral length against the bounds.
    pub fn check_len(&self, len: usize) -> Ff3Result<()> {
        if len < self.min_len {
            return Err(Ff3Error::InputValidation(format!(
                "length {len} is below the minimum of {}",
                self.min_len
            )));
        }
        if len > self.max_len {
            return Err(Ff3Error::InputValidation(format!(
                "length {len} exceeds the maximum of {}",
                self.max_len
            )));
        }
        Ok(())
    }
}

impl Default for DomainParams {
    fn default() -> Self {
        Self::pan()
    }
}

/// Smallest length whose domain reaches [`MIN_DOMAIN_SIZE`].
pub fn min_len_for(radix: u32) -> usize {
    let mut len = 0;
    let mut size = 1u128;
    while size < MIN_DOMAIN_SIZE {
        size *= u128::from(radix);
        len += 1;
    }
    len.max(2)
}

/// `2 * floor(log_radix(2^96))`: the longest numeral FF3-1 accepts.
pub fn max_len_for(radix: u32) -> usize {
    let limit = 1u128 << TAIL_BITS;
    let mut half = 0;
    let mut size = u128::from(radix);
    while size <= limit {
        size *= u128::from(radix);
        half += 1;
    }
    2 * half
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_domain_is_valid() {
        let pan = DomainParams::pan();
        assert_eq!(DomainParams::new(10, 6, 19), Ok(pan));
        assert_eq!(DomainParams::default(), pan);
    }

    #[test]
    fn nist_length_limits() {
        assert_eq!(min_len_for(10), 6);
        assert_eq!(max_len_for(10), 56);
        assert_eq!(min_len_for(2), 20);
        assert_eq!(max_len_for(2), 192);
        assert_eq!(min_len_for(26), 5);
        assert_eq!(max_len_for(26), 40);
        assert_eq!(min_len_for(36), 4);
        assert_eq!(max_len_for(36), 36);
    }

    #[test]
    fn rejects_small_domains() {
        let err = DomainParams::new(10, 5, 19).unwrap_err();
        assert!(matches!(err, Ff3Error::Configuration(_)));
    }

    #[test]
    fn rejects_oversized_domains_and_bad_radix() {
        assert!(DomainParams::new(10, 6, 57).is_err());
        assert!(DomainParams::new(37, 6, 10).is_err());
        assert!(DomainParams::new(1, 6, 10).is_err());
        assert!(DomainParams::new(10, 12, 8).is_err());
    }

    #[test]
    fn validate_checks_length_then_alphabet() {
        let pan = DomainParams::pan();
        assert_eq!(pan.validate("4111111111111111").unwrap().len(), 16);
        assert!(matches!(
            pan.validate("41111"),
            Err(Ff3Error::InputValidation(_))
        ));
        assert!(matches!(
            pan.validate("41A1"),
            Err(Ff3Error::InputValidation(_))
        ));
        assert!(matches!(
            pan.validate("411111A111"),
            Err(Ff3Error::InputValidation(_))
        ));
        assert!(matches!(
            pan.validate("41111111111111111111"),
            Err(Ff3Error::InputValidation(_))
        ));
    }

    #[test]
    fn deserialization_is_validated() {
        let ok: DomainParams =
            serde_json::from_str(r#"{"radix":10,"min_len":6,"max_len":19}"#).unwrap();
        assert_eq!(ok, DomainParams::pan());
        let bad = serde_json::from_str::<DomainParams>(r#"{"radix":10,"min_len":3,"max_len":19}"#);
        assert!(bad.is_err());
    }
}
