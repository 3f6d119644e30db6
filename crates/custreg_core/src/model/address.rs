//! Postal code and address model.
//!
//! # Responsibility
//! - Parse raw postal code input into one canonical key.
//! - Define the address record produced by the lookup service.
//!
//! # Invariants
//! - `PostalCode` always holds the `NNNNN-NNN` form.
//! - Two inputs naming the same code (with or without hyphen) compare equal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{5})-?([0-9]{3})$").expect("valid postal code regex"));

/// Rejection reason for raw postal code input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// Input is not 8 digits with an optional hyphen after the fifth.
    Malformed(String),
}

impl Display for PostalCodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(
                f,
                "malformed postal code `{value}`; expected NNNNN-NNN or NNNNNNNN"
            ),
        }
    }
}

impl Error for PostalCodeError {}

/// Brazilian postal code (CEP) in canonical `NNNNN-NNN` form.
///
/// This is the natural key of the address store, so every input spelling
/// must collapse to the same value before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parses raw input, trimming whitespace and inserting the hyphen.
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        let trimmed = raw.trim();
        let captures = POSTAL_CODE_RE
            .captures(trimmed)
            .ok_or_else(|| PostalCodeError::Malformed(trimmed.to_string()))?;
        Ok(Self(format!("{}-{}", &captures[1], &captures[2])))
    }

    /// Canonical hyphenated form, used as the storage key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Digits only, as expected by the lookup service URL.
    pub fn digits(&self) -> String {
        self.0.replace('-', "")
    }
}

impl Display for PostalCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

/// Postal address resolved from a postal code.
///
/// Text fields are empty strings when the lookup service has no value for
/// them, which matches how the service itself reports gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Natural key; one address record per postal code.
    pub postal_code: PostalCode,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    /// Two-letter federative unit, e.g. `SP`.
    #[serde(default)]
    pub state: String,
    /// IBGE municipality code.
    #[serde(default)]
    pub ibge_code: String,
    /// GIA code (state tax registry), often empty.
    #[serde(default)]
    pub gia_code: String,
    /// Telephone area code (DDD).
    #[serde(default)]
    pub area_code: String,
    /// SIAFI municipality code.
    #[serde(default)]
    pub siafi_code: String,
}

impl Address {
    /// Creates an address that carries only its postal code.
    ///
    /// This is the shape callers hand to the service; the remaining fields
    /// are filled in by address resolution.
    pub fn unresolved(postal_code: PostalCode) -> Self {
        Self {
            postal_code,
            street: String::new(),
            complement: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            ibge_code: String::new(),
            gia_code: String::new(),
            area_code: String::new(),
            siafi_code: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Address, PostalCode, PostalCodeError};

    #[test]
    fn parse_accepts_hyphenated_and_plain_digits() {
        let hyphenated = PostalCode::parse("01001-000").unwrap();
        let plain = PostalCode::parse(" 01001000 ").unwrap();

        assert_eq!(hyphenated, plain);
        assert_eq!(plain.as_str(), "01001-000");
        assert_eq!(plain.digits(), "01001000");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for raw in ["", "0100-1000", "01001-00", "abcde-fgh", "010010000"] {
            let err = PostalCode::parse(raw).unwrap_err();
            assert_eq!(err, PostalCodeError::Malformed(raw.trim().to_string()));
        }
    }

    #[test]
    fn parse_rejects_non_ascii_digits() {
        for raw in ["٠١٠٠١-٠٠٠", "０１００１０００", "01001-٠٠٠"] {
            let err = PostalCode::parse(raw).unwrap_err();
            assert_eq!(err, PostalCodeError::Malformed(raw.trim().to_string()));
        }
    }

    #[test]
    fn unresolved_address_only_carries_postal_code() {
        let address = Address::unresolved(PostalCode::parse("20040020").unwrap());

        assert_eq!(address.postal_code.as_str(), "20040-020");
        assert!(address.street.is_empty());
        assert!(address.city.is_empty());
    }
}
