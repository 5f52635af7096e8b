//! Melon sales orders.
//!
//! Pricing (base price, tax, surcharges) and the two lifecycle flags (shipped,
//! inspected) for domestic, international and government orders. Pure domain
//! logic: the clock and the random source are injected through
//! [`BasePriceSource`].

pub mod order;
pub mod pricing;
pub mod value_objects;

pub use order::{
    DomesticOrder, GovernmentOrder, InternationalOrder, MelonOrder, Order, OrderSummary,
    OrderTerms, OrderType, new_domestic_order, new_government_order, new_international_order,
};
pub use pricing::{BasePriceSource, FixedBasePrice, PricingPolicy, SplurgePricer};
pub use value_objects::{CountryCode, Quantity, Species};
