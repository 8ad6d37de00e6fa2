use std::{fmt, str::FromStr};

use alloy_primitives::Address;

use crate::error::{Error, Result};

/// Leading hex digits an address must start with.
///
/// Matching is case-insensitive: digits are stored as nibble values, so `"AbC"`
/// and `"abc"` describe the same prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Prefix {
    nibbles: Vec<u8>,
}

impl Prefix {
    /// Number of hex digits in an address.
    pub const MAX_LEN: usize = 40;

    /// Parses a prefix of hex digits, with or without a leading `0x`.
    pub fn new(prefix: &str) -> Result<Self> {
        let digits = prefix
            .strip_prefix("0x")
            .or_else(|| prefix.strip_prefix("0X"))
            .unwrap_or(prefix);

        if digits.len() > Self::MAX_LEN {
            return Err(invalid(
                prefix,
                format!("longer than the {} hex digits of an address", Self::MAX_LEN),
            ));
        }

        let nibbles = digits
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or_else(|| invalid(prefix, format!("{c:?} is not a hex digit")))
            })
            .collect::<Result<_>>()?;

        Ok(Self { nibbles })
    }

    pub fn len(&self) -> usize {
        self.nibbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }

    /// Returns true if the lowercase hex digits of `address` start with this
    /// prefix.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        self.nibbles.iter().enumerate().all(|(i, &nibble)| {
            let byte = address.as_slice()[i / 2];
            let actual = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            actual == nibble
        })
    }

    /// Expected number of salts to try before a match, assuming uniformly
    /// distributed addresses: `16^len`.
    pub fn expected_iterations(&self) -> f64 {
        16f64.powi(self.nibbles.len() as i32)
    }
}

fn invalid(prefix: &str, reason: String) -> Error {
    Error::InvalidPrefix { prefix: prefix.to_string(), reason }
}

impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for nibble in &self.nibbles {
            write!(f, "{nibble:x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn parses_with_and_without_marker() {
        assert_eq!(Prefix::new("0xdead").unwrap(), Prefix::new("dead").unwrap());
        assert_eq!(Prefix::new("0XDEAD").unwrap(), Prefix::new("dead").unwrap());
        assert_eq!(Prefix::new("dEaD").unwrap().to_string(), "0xdead");
        assert_eq!(Prefix::new("abc").unwrap().len(), 3);
        assert!(Prefix::new("").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_prefixes() {
        assert!(matches!(Prefix::new("0xerr"), Err(Error::InvalidPrefix { .. })));
        assert!(matches!(Prefix::new("x00"), Err(Error::InvalidPrefix { .. })));
        assert!(matches!(Prefix::new("12 34"), Err(Error::InvalidPrefix { .. })));

        let forty = "a".repeat(40);
        assert!(Prefix::new(&forty).is_ok());
        let forty_one = "a".repeat(41);
        assert!(matches!(Prefix::new(&forty_one), Err(Error::InvalidPrefix { .. })));
    }

    #[test]
    fn matches_leading_digits() {
        let addr = address!("00bF495b8b42fdFeb91c8bCEB42CA4eE7186AEd2");

        for prefix in ["", "0", "00", "00b", "00BF", "0x00bf495b"] {
            assert!(Prefix::new(prefix).unwrap().matches(&addr), "{prefix}");
        }
        for prefix in ["1", "01", "00c", "bf"] {
            assert!(!Prefix::new(prefix).unwrap().matches(&addr), "{prefix}");
        }

        let full = Prefix::new("00bf495b8b42fdfeb91c8bceb42ca4ee7186aed2").unwrap();
        assert!(full.matches(&addr));
    }

    #[test]
    fn agrees_with_string_comparison() {
        let addrs = [
            address!("4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38"),
            address!("B928f69Bb1D91Cd65274e3c79d8986362984fDA3"),
            address!("E33C0C7F7df4809055C3ebA6c09CFe4BaF1BD9e0"),
        ];
        for addr in addrs {
            let digits = format!("{addr:x}");
            for len in 0..=8 {
                let prefix = Prefix::new(&digits[..len].to_uppercase()).unwrap();
                assert!(prefix.matches(&addr));
                assert!(digits.starts_with(&prefix.to_string()[2..]));
            }
        }
    }

    #[test]
    fn expected_iterations_grow_by_sixteen() {
        assert_eq!(Prefix::new("").unwrap().expected_iterations(), 1.0);
        assert_eq!(Prefix::new("00").unwrap().expected_iterations(), 256.0);
        assert_eq!(Prefix::new("abcd").unwrap().expected_iterations(), 65536.0);
    }
}
