use serde::{Deserialize, Serialize};

use melons_core::{DomainError, DomainResult, ValueObject};

/// Name of a melon type.
///
/// Any string is accepted; only the exact name `"Christmas"` changes pricing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Species(String);

impl Species {
    /// Species priced at 1.5x the base price.
    pub const CHRISTMAS: &'static str = "Christmas";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_christmas(&self) -> bool {
        self.0 == Self::CHRISTMAS
    }
}

impl ValueObject for Species {}

impl From<&str> for Species {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Species {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of melons in an order, always within `1..=100`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    /// Largest order accepted.
    pub const MAX: i64 = 100;

    /// Validate a raw melon count.
    ///
    /// The upper bound is checked first so any count above the limit reports
    /// [`DomainError::TooManyMelons`].
    pub fn new(value: i64) -> DomainResult<Self> {
        if value > Self::MAX {
            return Err(DomainError::too_many_melons());
        }
        if value <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Destination country of an international order. Not checked against ISO codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for CountryCode {}

impl From<&str> for CountryCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CountryCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantity_above_limit_is_too_many_melons() {
        assert_eq!(Quantity::new(101).unwrap_err(), DomainError::TooManyMelons);
        assert_eq!(Quantity::new(i64::MAX).unwrap_err(), DomainError::TooManyMelons);
    }

    #[test]
    fn quantity_limit_is_inclusive() {
        assert_eq!(Quantity::new(100).unwrap().get(), 100);
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for value in [0, -1, i64::MIN] {
            match Quantity::new(value).unwrap_err() {
                DomainError::Validation(msg) if msg.contains("quantity must be positive") => {}
                other => panic!("Expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn quantity_deserialization_is_validated() {
        let ok: Quantity = serde_json::from_str("42").unwrap();
        assert_eq!(ok.get(), 42);
        assert!(serde_json::from_str::<Quantity>("101").is_err());
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn only_exact_christmas_is_christmas() {
        assert!(Species::from("Christmas").is_christmas());
        assert!(!Species::from("christmas").is_christmas());
        assert!(!Species::from("Christmas ").is_christmas());
        assert!(!Species::from("Muskmelon").is_christmas());
    }

    #[test]
    fn country_code_is_stored_verbatim() {
        let code = CountryCode::from("not-a-real-code");
        assert_eq!(code.as_str(), "not-a-real-code");
        assert_eq!(code.to_string(), "not-a-real-code");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every count in 1..=100 is a valid quantity, and it round-trips unchanged.
        #[test]
        fn counts_within_limit_are_accepted(value in 1i64..=100) {
            let quantity = Quantity::new(value).unwrap();
            prop_assert_eq!(i64::from(quantity), value);
        }

        /// Property: every count above 100 fails with the melon limit error.
        #[test]
        fn counts_above_limit_are_rejected(value in 101i64..=i64::MAX) {
            prop_assert_eq!(Quantity::new(value).unwrap_err(), DomainError::TooManyMelons);
        }
    }
}
