//! Conversions between numeral strings and arbitrary-precision integers.
//!
//! Numerals use the alphabet `0-9a-z`, so any radix in `2..=36` is supported.
//! Input is case-insensitive; output is always lower case.
//!
//! FF3-1 reads every half of the Feistel state in reverse digit order
//! (`NUM_radix(REV(X))`) and writes it back reversed (`REV(STR_radix^m(x))`).
//! The `*_rev` helpers implement those two compositions directly on
//! little-endian digit slices instead of materializing reversed copies.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Ff3Error, Ff3Result};

/// Largest radix the string alphabet can express.
pub const MAX_RADIX: u32 = 36;

const ALPHABET: &[u8; MAX_RADIX as usize] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Parses a numeral string into digit values, rejecting characters outside `[0, radix)`.
pub fn decode(numeral: &str, radix: u32) -> Ff3Result<Vec<u8>> {
    if !(2..=MAX_RADIX).contains(&radix) {
        return Err(Ff3Error::Configuration(format!(
            "radix {radix} is outside 2..={MAX_RADIX}"
        )));
    }
    numeral
        .chars()
        .enumerate()
        .map(|(pos, ch)| {
            ch.to_digit(radix).map(|d| d as u8).ok_or_else(|| {
                Ff3Error::InputValidation(format!(
                    "character at position {pos} is not a radix-{radix} digit"
                ))
            })
        })
        .collect()
}

/// Renders digit values as a numeral string.
///
/// # Panics
/// If a digit is not below [`MAX_RADIX`]; digit slices produced by this module
/// never are.
pub fn encode(digits: &[u8]) -> String {
    digits.iter().map(|&d| ALPHABET[d as usize] as char).collect()
}

/// `NUM_radix(X)`: parses a numeral string as a big-endian unsigned integer.
pub fn num_radix(numeral: &str, radix: u32) -> Ff3Result<BigUint> {
    let digits = decode(numeral, radix)?;
    num_digits(&digits, radix)
}

/// `STR_radix^length(value)`: renders `value` left-zero-padded to `length` digits.
///
/// # Panics
/// If `value >= radix^length`. Callers reduce modulo `radix^length` first.
pub fn str_radix(value: &BigUint, length: usize, radix: u32) -> String {
    encode(&str_digits(value, length, radix))
}

/// Big-endian digit slice to integer.
pub fn num_digits(digits: &[u8], radix: u32) -> Ff3Result<BigUint> {
    BigUint::from_radix_be(digits, radix).ok_or_else(out_of_range(radix))
}

/// Integer to a big-endian digit vector of exactly `length` digits.
///
/// # Panics
/// If `value` needs more than `length` digits.
pub fn str_digits(value: &BigUint, length: usize, radix: u32) -> Vec<u8> {
    let mut digits = str_rev(value, length, radix);
    digits.reverse();
    digits
}

/// `NUM_radix(REV(X))`: reads `digits` least-significant first.
pub fn num_rev(digits: &[u8], radix: u32) -> Ff3Result<BigUint> {
    BigUint::from_radix_le(digits, radix).ok_or_else(out_of_range(radix))
}

/// `REV(STR_radix^length(value))`: least-significant digit first, zero-filled
/// at the end up to `length`.
///
/// # Panics
/// If `value` needs more than `length` digits.
pub fn str_rev(value: &BigUint, length: usize, radix: u32) -> Vec<u8> {
    if value.is_zero() {
        return vec![0; length];
    }
    let mut digits = value.to_radix_le(radix);
    assert!(
        digits.len() <= length,
        "value needs {} radix-{radix} digits but only {length} are available",
        digits.len()
    );
    digits.resize(length, 0);
    digits
}

fn out_of_range(radix: u32) -> impl FnOnce() -> Ff3Error {
    move || Ff3Error::InputValidation(format!("digit value outside radix {radix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_radix_parses_leading_zeros() {
        assert_eq!(num_radix("0012", 10).unwrap(), BigUint::from(12u32));
        assert_eq!(num_radix("", 10).unwrap(), BigUint::zero());
    }

    #[test]
    fn num_radix_rejects_foreign_characters() {
        let err = num_radix("41A1", 10).unwrap_err();
        assert!(matches!(err, Ff3Error::InputValidation(_)));
        assert_eq!(num_radix("41A1", 16).unwrap(), BigUint::from(0x41a1u32));
    }

    #[test]
    fn decode_reports_position() {
        let err = decode("12 4", 10).unwrap_err();
        assert_eq!(
            err,
            Ff3Error::InputValidation("character at position 2 is not a radix-10 digit".into())
        );
    }

    #[test]
    fn str_radix_pads_to_length() {
        assert_eq!(str_radix(&BigUint::from(42u32), 6, 10), "000042");
        assert_eq!(str_radix(&BigUint::zero(), 3, 10), "000");
        assert_eq!(str_radix(&BigUint::from(255u32), 4, 16), "00ff");
    }

    #[test]
    #[should_panic(expected = "radix-10 digits")]
    fn str_radix_panics_when_value_does_not_fit() {
        str_radix(&BigUint::from(1000u32), 3, 10);
    }

    #[test]
    fn reversed_helpers_match_explicit_reversal() {
        let digits = [3u8, 9, 9, 2, 5, 2, 0, 2, 4, 0];
        let mut reversed = digits;
        reversed.reverse();
        assert_eq!(
            num_rev(&digits, 10).unwrap(),
            num_digits(&reversed, 10).unwrap()
        );

        let value = BigUint::from(4202u32);
        let mut expected = str_digits(&value, 5, 10);
        expected.reverse();
        assert_eq!(str_rev(&value, 5, 10), expected);
        assert_eq!(str_rev(&value, 5, 10), vec![2, 0, 2, 4, 0]);
    }

    #[test]
    fn encode_uses_lower_case() {
        let digits = decode("Zz09", 36).unwrap();
        assert_eq!(digits, vec![35, 35, 0, 9]);
        assert_eq!(encode(&digits), "zz09");
    }
}
