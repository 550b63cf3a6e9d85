//! Payment card number handling.
//!
//! A PAN is tokenized by enciphering only its middle digits: the leading
//! issuer identification digits stay readable for routing and the trailing
//! digits stay readable for display. Spaces and dashes are kept in place.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Ff3Error, Ff3Result};
use crate::params::DomainParams;

/// Longest PAN accepted, per ISO/IEC 7812.
pub const PAN_MAX_DIGITS: usize = 19;

/// Characters tolerated between digit groups.
pub const SEPARATORS: [char; 2] = [' ', '-'];

/// How many digits stay in the clear at each end of the PAN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanLayout {
    /// Leading digits kept (the BIN).
    pub keep_leading: usize,
    /// Trailing digits kept.
    pub keep_trailing: usize,
}

impl Default for PanLayout {
    fn default() -> Self {
        Self {
            keep_leading: 6,
            keep_trailing: 4,
        }
    }
}

/// A PAN with separators stripped and the enciphered range resolved.
#[derive(Debug)]
pub struct PanParts {
    digits: String,
    separators: Vec<(usize, char)>,
    middle: Range<usize>,
}

impl PanParts {
    /// Parses `pan` and locates the digits to encipher.
    pub fn parse(pan: &str, layout: &PanLayout, params: &DomainParams) -> Ff3Result<Self> {
        let mut digits = String::with_capacity(pan.len());
        let mut separators = Vec::new();
        for (pos, ch) in pan.chars().enumerate() {
            if ch.is_ascii_digit() {
                digits.push(ch);
            } else if SEPARATORS.contains(&ch) {
                separators.push((pos, ch));
            } else {
                return Err(Ff3Error::InputValidation(format!(
                    "character at position {pos} is neither a digit nor a separator"
                )));
            }
        }

        let len = digits.len();
        if len > PAN_MAX_DIGITS {
            return Err(Ff3Error::InputValidation(format!(
                "PAN has {len} digits, more than {PAN_MAX_DIGITS}"
            )));
        }
        let kept = layout.keep_leading + layout.keep_trailing;
        let middle_len = len.checked_sub(kept).ok_or_else(|| {
            Ff3Error::InputValidation(format!(
                "PAN has {len} digits but {kept} are kept in the clear"
            ))
        })?;
        params.check_len(middle_len)?;

        Ok(Self {
            digits,
            separators,
            middle: layout.keep_leading..layout.keep_leading + middle_len,
        })
    }

    /// Number of digits, separators excluded.
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// The digits to encipher.
    pub fn middle(&self) -> &str {
        &self.digits[self.middle.clone()]
    }

    /// Reassembles the PAN with `middle` substituted, separators restored.
    pub fn rebuild(&self, middle: &str) -> String {
        debug_assert_eq!(middle.len(), self.middle.len());
        let mut out = String::with_capacity(self.digits.len() + self.separators.len());
        out.push_str(&self.digits[..self.middle.start]);
        out.push_str(middle);
        out.push_str(&self.digits[self.middle.end..]);
        for &(pos, ch) in &self.separators {
            out.insert(pos, ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_middle_and_restores_separators() {
        let parts =
            PanParts::parse("4111 1111 1111 1111", &PanLayout::default(), &DomainParams::pan())
                .unwrap();
        assert_eq!(parts.digit_count(), 16);
        assert_eq!(parts.middle(), "111111");
        assert_eq!(parts.rebuild("987654"), "4111 1198 7654 1111");
    }

    #[test]
    fn handles_dashes_and_long_pans() {
        let parts = PanParts::parse(
            "4000-0012-3456-7890-123",
            &PanLayout::default(),
            &DomainParams::pan(),
        )
        .unwrap();
        assert_eq!(parts.middle(), "123456789");
        assert_eq!(parts.rebuild("000000000"), "4000-0000-0000-0000-123");
    }

    #[test]
    fn rejects_short_middles() {
        // 15 digits leave 5 to encipher, below the decimal minimum of 6.
        let err = PanParts::parse("378282246310005", &PanLayout::default(), &DomainParams::pan())
            .unwrap_err();
        assert!(matches!(err, Ff3Error::InputValidation(_)));
        assert!(PanParts::parse("4111", &PanLayout::default(), &DomainParams::pan()).is_err());
    }

    #[test]
    fn custom_layout_reaches_shorter_pans() {
        let layout = PanLayout {
            keep_leading: 4,
            keep_trailing: 4,
        };
        let parts = PanParts::parse("378282246310005", &layout, &DomainParams::pan()).unwrap();
        assert_eq!(parts.middle(), "8224631");
    }

    #[test]
    fn rejects_foreign_characters_and_overlong_pans() {
        let layout = PanLayout::default();
        let pan = DomainParams::pan();
        assert!(PanParts::parse("4111/1111/1111/1111", &layout, &pan).is_err());
        assert!(PanParts::parse("41111111111111111111", &layout, &pan).is_err());
    }
}
