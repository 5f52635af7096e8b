use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use melons_core::DomainResult;

use crate::pricing::BasePriceSource;
use crate::value_objects::{CountryCode, Quantity, Species};

const DOMESTIC_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);
const INTERNATIONAL_TAX_RATE: Decimal = Decimal::from_parts(17, 0, 0, false, 2);
const CHRISTMAS_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// International orders below this many melons pay the small-order surcharge.
const SMALL_ORDER_THRESHOLD: i64 = 10;
const SMALL_ORDER_SURCHARGE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Order type, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Domestic,
    International,
}

/// State shared by every order variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTerms {
    species: Species,
    quantity: Quantity,
    shipped: bool,
}

impl OrderTerms {
    /// Validate the quantity before any state is stored.
    pub fn new(species: impl Into<Species>, quantity: i64) -> DomainResult<Self> {
        let quantity = Quantity::new(quantity)?;
        Ok(Self {
            species: species.into(),
            quantity,
            shipped: false,
        })
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn is_shipped(&self) -> bool {
        self.shipped
    }

    fn mark_shipped(&mut self) {
        self.shipped = true;
    }
}

/// Price breakdown from a single base-price quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub base_price: Decimal,
    /// Base price after the Christmas multiplier.
    pub effective_base_price: Decimal,
    pub tax_rate: Decimal,
    /// `(1 + tax_rate) * quantity * effective_base_price`.
    pub subtotal: Decimal,
    pub fee: Decimal,
    pub total: Decimal,
}

/// Behaviour shared by all melon orders.
///
/// Variants supply their terms, order type and tax rate; pricing is derived:
///
/// `total = (1 + tax_rate) * quantity * effective_base_price + fee`
pub trait MelonOrder {
    fn terms(&self) -> &OrderTerms;

    fn order_type(&self) -> OrderType;

    fn tax_rate(&self) -> Decimal;

    /// Record that the order has shipped. Idempotent.
    fn mark_shipped(&mut self);

    /// Flat fee added after tax. Zero unless a variant says otherwise.
    fn fee(&self) -> Decimal {
        Decimal::ZERO
    }

    fn species(&self) -> &Species {
        self.terms().species()
    }

    fn quantity(&self) -> Quantity {
        self.terms().quantity()
    }

    fn is_shipped(&self) -> bool {
        self.terms().is_shipped()
    }

    fn effective_base_price(&self, base_price: Decimal) -> Decimal {
        if self.species().is_christmas() {
            base_price * CHRISTMAS_MULTIPLIER
        } else {
            base_price
        }
    }

    fn subtotal(&self, base_price: Decimal) -> Decimal {
        (Decimal::ONE + self.tax_rate())
            * Decimal::from(self.quantity().get())
            * self.effective_base_price(base_price)
    }

    fn price_with_base(&self, base_price: Decimal) -> OrderSummary {
        let subtotal = self.subtotal(base_price);
        let fee = self.fee();
        OrderSummary {
            base_price,
            effective_base_price: self.effective_base_price(base_price),
            tax_rate: self.tax_rate(),
            subtotal,
            fee,
            total: subtotal + fee,
        }
    }

    fn total_with_base(&self, base_price: Decimal) -> Decimal {
        self.price_with_base(base_price).total
    }

    /// Quote a base price from `source` and price the order with it.
    fn price<S: BasePriceSource + ?Sized>(&self, source: &mut S) -> OrderSummary
    where
        Self: Sized,
    {
        self.price_with_base(source.base_price())
    }

    fn total<S: BasePriceSource + ?Sized>(&self, source: &mut S) -> Decimal
    where
        Self: Sized,
    {
        self.price(source).total
    }
}

/// A melon order within the USA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomesticOrder {
    #[serde(flatten)]
    terms: OrderTerms,
}

impl DomesticOrder {
    pub fn new(species: impl Into<Species>, quantity: i64) -> DomainResult<Self> {
        Ok(Self {
            terms: OrderTerms::new(species, quantity)?,
        })
    }
}

impl MelonOrder for DomesticOrder {
    fn terms(&self) -> &OrderTerms {
        &self.terms
    }

    fn order_type(&self) -> OrderType {
        OrderType::Domestic
    }

    fn tax_rate(&self) -> Decimal {
        DOMESTIC_TAX_RATE
    }

    fn mark_shipped(&mut self) {
        self.terms.mark_shipped();
    }
}

/// A non-US melon order. Small orders carry a flat surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternationalOrder {
    #[serde(flatten)]
    terms: OrderTerms,
    country_code: CountryCode,
}

impl InternationalOrder {
    pub fn new(
        species: impl Into<Species>,
        quantity: i64,
        country_code: impl Into<CountryCode>,
    ) -> DomainResult<Self> {
        Ok(Self {
            terms: OrderTerms::new(species, quantity)?,
            country_code: country_code.into(),
        })
    }

    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }
}

impl MelonOrder for InternationalOrder {
    fn terms(&self) -> &OrderTerms {
        &self.terms
    }

    fn order_type(&self) -> OrderType {
        OrderType::International
    }

    fn tax_rate(&self) -> Decimal {
        INTERNATIONAL_TAX_RATE
    }

    fn mark_shipped(&mut self) {
        self.terms.mark_shipped();
    }

    fn fee(&self) -> Decimal {
        if self.quantity().get() < SMALL_ORDER_THRESHOLD {
            SMALL_ORDER_SURCHARGE
        } else {
            Decimal::ZERO
        }
    }
}

/// A US government order. Tax-exempt, and subject to a security inspection
/// that may be recorded any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernmentOrder {
    #[serde(flatten)]
    terms: OrderTerms,
    passed_inspection: bool,
}

impl GovernmentOrder {
    pub fn new(species: impl Into<Species>, quantity: i64) -> DomainResult<Self> {
        Ok(Self {
            terms: OrderTerms::new(species, quantity)?,
            passed_inspection: false,
        })
    }

    /// Record the latest inspection outcome; the last write wins.
    pub fn mark_inspection(&mut self, passed: bool) {
        self.passed_inspection = passed;
    }

    pub fn passed_inspection(&self) -> bool {
        self.passed_inspection
    }
}

impl MelonOrder for GovernmentOrder {
    fn terms(&self) -> &OrderTerms {
        &self.terms
    }

    fn order_type(&self) -> OrderType {
        OrderType::Domestic
    }

    fn tax_rate(&self) -> Decimal {
        Decimal::ZERO
    }

    fn mark_shipped(&mut self) {
        self.terms.mark_shipped();
    }
}

/// Any melon order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Order {
    Domestic(DomesticOrder),
    International(InternationalOrder),
    Government(GovernmentOrder),
}

impl Order {
    pub fn domestic(species: impl Into<Species>, quantity: i64) -> DomainResult<Self> {
        DomesticOrder::new(species, quantity).map(Self::Domestic)
    }

    pub fn international(
        species: impl Into<Species>,
        quantity: i64,
        country_code: impl Into<CountryCode>,
    ) -> DomainResult<Self> {
        InternationalOrder::new(species, quantity, country_code).map(Self::International)
    }

    pub fn government(species: impl Into<Species>, quantity: i64) -> DomainResult<Self> {
        GovernmentOrder::new(species, quantity).map(Self::Government)
    }

    /// Country code, for international orders.
    pub fn country_code(&self) -> Option<&CountryCode> {
        match self {
            Order::International(order) => Some(order.country_code()),
            _ => None,
        }
    }

    /// Inspection outcome, for government orders.
    pub fn passed_inspection(&self) -> Option<bool> {
        match self {
            Order::Government(order) => Some(order.passed_inspection()),
            _ => None,
        }
    }

    pub fn as_government_mut(&mut self) -> Option<&mut GovernmentOrder> {
        match self {
            Order::Government(order) => Some(order),
            _ => None,
        }
    }

    fn variant(&self) -> &dyn MelonOrder {
        match self {
            Order::Domestic(order) => order,
            Order::International(order) => order,
            Order::Government(order) => order,
        }
    }
}

impl MelonOrder for Order {
    fn terms(&self) -> &OrderTerms {
        self.variant().terms()
    }

    fn order_type(&self) -> OrderType {
        self.variant().order_type()
    }

    fn tax_rate(&self) -> Decimal {
        self.variant().tax_rate()
    }

    fn fee(&self) -> Decimal {
        self.variant().fee()
    }

    fn mark_shipped(&mut self) {
        match self {
            Order::Domestic(order) => order.mark_shipped(),
            Order::International(order) => order.mark_shipped(),
            Order::Government(order) => order.mark_shipped(),
        }
    }
}

pub fn new_domestic_order(species: impl Into<Species>, quantity: i64) -> DomainResult<Order> {
    Order::domestic(species, quantity)
}

pub fn new_international_order(
    species: impl Into<Species>,
    quantity: i64,
    country_code: impl Into<CountryCode>,
) -> DomainResult<Order> {
    Order::international(species, quantity, country_code)
}

pub fn new_government_order(species: impl Into<Species>, quantity: i64) -> DomainResult<Order> {
    Order::government(species, quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::FixedBasePrice;
    use melons_core::DomainError;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn formula(tax_rate: Decimal, quantity: i64, effective_base_price: Decimal) -> Decimal {
        (Decimal::ONE + tax_rate) * Decimal::from(quantity) * effective_base_price
    }

    #[test]
    fn every_variant_rejects_more_than_100_melons() {
        assert_eq!(
            Order::domestic("Muskmelon", 101).unwrap_err(),
            DomainError::TooManyMelons
        );
        assert_eq!(
            Order::international("Christmas", 105, "AUS").unwrap_err(),
            DomainError::TooManyMelons
        );
        assert_eq!(
            Order::government("Casaba", 101).unwrap_err(),
            DomainError::TooManyMelons
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        match Order::domestic("Muskmelon", 0).unwrap_err() {
            DomainError::Validation(msg) if msg.contains("quantity must be positive") => {}
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn variants_have_fixed_type_and_tax() {
        let domestic = Order::domestic("Muskmelon", 1).unwrap();
        let international = Order::international("Muskmelon", 1, "AUS").unwrap();
        let government = Order::government("Muskmelon", 1).unwrap();

        assert_eq!(domestic.order_type(), OrderType::Domestic);
        assert_eq!(domestic.tax_rate(), dec!(0.08));
        assert_eq!(international.order_type(), OrderType::International);
        assert_eq!(international.tax_rate(), dec!(0.17));
        assert_eq!(government.order_type(), OrderType::Domestic);
        assert_eq!(government.tax_rate(), Decimal::ZERO);
    }

    #[test]
    fn new_orders_start_unshipped_and_uninspected() {
        let government = Order::government("Casaba", 3).unwrap();
        assert!(!government.is_shipped());
        assert_eq!(government.passed_inspection(), Some(false));

        let domestic = Order::domestic("Casaba", 3).unwrap();
        assert!(!domestic.is_shipped());
        assert_eq!(domestic.passed_inspection(), None);
    }

    #[test]
    fn mark_shipped_is_idempotent() {
        let mut order = Order::international("Watermelon", 12, "MEX").unwrap();
        order.mark_shipped();
        assert!(order.is_shipped());
        order.mark_shipped();
        assert!(order.is_shipped());
    }

    #[test]
    fn inspection_last_write_wins() {
        let mut order = Order::government("Honeydew", 20).unwrap();
        let government = order.as_government_mut().unwrap();
        government.mark_inspection(true);
        assert!(government.passed_inspection());
        government.mark_inspection(false);
        assert_eq!(order.passed_inspection(), Some(false));
    }

    #[test]
    fn inspection_is_independent_of_shipping() {
        let mut order = GovernmentOrder::new("Honeydew", 20).unwrap();
        order.mark_shipped();
        assert!(!order.passed_inspection());
        order.mark_inspection(true);
        assert!(order.is_shipped());
    }

    #[test]
    fn only_government_orders_can_be_inspected() {
        let mut domestic = Order::domestic("Honeydew", 20).unwrap();
        assert!(domestic.as_government_mut().is_none());
    }

    #[test]
    fn country_code_is_only_on_international_orders() {
        let international = Order::international("Cantaloupe", 4, "AUS").unwrap();
        assert_eq!(international.country_code().map(CountryCode::as_str), Some("AUS"));
        assert!(Order::domestic("Cantaloupe", 4).unwrap().country_code().is_none());
    }

    #[test]
    fn domestic_total_uses_base_formula() {
        let order = DomesticOrder::new("Muskmelon", 10).unwrap();
        assert_eq!(order.total(&mut FixedBasePrice(dec!(6))), dec!(64.8));
        assert_eq!(order.fee(), Decimal::ZERO);
    }

    #[test]
    fn christmas_multiplies_base_price() {
        let plain = Order::domestic("Muskmelon", 10).unwrap();
        let christmas = Order::domestic("Christmas", 10).unwrap();
        let plain_total = plain.total_with_base(dec!(6));
        let christmas_total = christmas.total_with_base(dec!(6));
        assert_eq!(christmas_total, plain_total * dec!(1.5));
        assert_eq!(christmas.effective_base_price(dec!(6)), dec!(9));
    }

    #[test]
    fn small_order_surcharge_boundary() {
        let nine = InternationalOrder::new("Muskmelon", 9, "AUS").unwrap();
        let ten = InternationalOrder::new("Muskmelon", 10, "AUS").unwrap();

        assert_eq!(nine.total_with_base(dec!(5)) - nine.subtotal(dec!(5)), dec!(3));
        assert_eq!(ten.total_with_base(dec!(5)), ten.subtotal(dec!(5)));
    }

    #[test]
    fn government_total_is_untaxed() {
        let order = Order::government("Christmas", 7).unwrap();
        assert_eq!(order.total_with_base(dec!(8)), dec!(7) * dec!(12));
    }

    #[test]
    fn price_breakdown_is_consistent() {
        let order = Order::international("Christmas", 5, "AUS").unwrap();
        let summary = order.price(&mut FixedBasePrice(dec!(5)));
        assert_eq!(summary.base_price, dec!(5));
        assert_eq!(summary.effective_base_price, dec!(7.5));
        assert_eq!(summary.tax_rate, dec!(0.17));
        assert_eq!(summary.subtotal, dec!(43.875));
        assert_eq!(summary.fee, dec!(3));
        assert_eq!(summary.total, dec!(46.875));
    }

    #[test]
    fn orders_serialize_with_kind_tag() {
        let mut order = Order::government("Casaba", 2).unwrap();
        order.mark_shipped();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["kind"], "government");
        assert_eq!(json["species"], "Casaba");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["shipped"], true);
        assert_eq!(json["passed_inspection"], false);

        let international = Order::international("Casaba", 2, "AUS").unwrap();
        let json = serde_json::to_value(&international).unwrap();
        assert_eq!(json["kind"], "international");
        assert_eq!(json["country_code"], "AUS");
    }

    fn any_order() -> impl Strategy<Value = Order> {
        let species = prop_oneof![Just("Christmas"), Just("Muskmelon"), Just("Casaba")];
        (species, 1i64..=100, 0u8..3).prop_map(|(species, quantity, kind)| match kind {
            0 => Order::domestic(species, quantity).unwrap(),
            1 => Order::international(species, quantity, "AUS").unwrap(),
            _ => Order::government(species, quantity).unwrap(),
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: total equals the base formula plus the variant's fee.
        #[test]
        fn total_matches_formula(order in any_order(), base in 5u32..=13) {
            let base = Decimal::from(base);
            let effective = if order.species().is_christmas() { base * dec!(1.5) } else { base };
            let surcharge = match &order {
                Order::International(o) if o.quantity().get() < 10 => dec!(3),
                _ => Decimal::ZERO,
            };
            let expected = formula(order.tax_rate(), order.quantity().get(), effective) + surcharge;
            prop_assert_eq!(order.total(&mut FixedBasePrice(base)), expected);
        }

        /// Property: construction succeeds for any species and any quantity in range.
        #[test]
        fn construction_accepts_full_range(species in ".*", quantity in 1i64..=100) {
            prop_assert!(Order::domestic(species.as_str(), quantity).is_ok());
            prop_assert!(Order::international(species.as_str(), quantity, "AUS").is_ok());
            prop_assert!(Order::government(species.as_str(), quantity).is_ok());
        }
    }
}
