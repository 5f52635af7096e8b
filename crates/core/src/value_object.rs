//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. Two species names or quantities with the
//! same value are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. Validation happens once, in the constructor, so a value
/// that exists is always valid.
///
/// Nothing bounds on this trait yet. It marks which domain types carry that
/// guarantee (`Species`, `Quantity`, `CountryCode`), so a reader knows they can
/// be copied and compared freely without re-validating.
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct CountryCode(String);
///
/// impl ValueObject for CountryCode {}
///
/// assert_eq!(CountryCode("AUS".into()), CountryCode("AUS".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
