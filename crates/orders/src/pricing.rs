//! Splurge pricing: the per-melon base price before tax and fees.
//!
//! A base price is a uniform random draw, plus a flat surcharge during the
//! weekday rush hour. Both the clock and the random source are injected, so a
//! price is reproducible whenever both are pinned.

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use melons_core::{Clock, DomainError, DomainResult, SystemClock};

/// Something that can quote a per-melon base price.
///
/// The price is evaluated at call time, not at order creation.
pub trait BasePriceSource {
    fn base_price(&mut self) -> Decimal;
}

impl<S: BasePriceSource + ?Sized> BasePriceSource for &mut S {
    fn base_price(&mut self) -> Decimal {
        (**self).base_price()
    }
}

/// Always quotes the same base price.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedBasePrice(pub Decimal);

impl BasePriceSource for FixedBasePrice {
    fn base_price(&mut self) -> Decimal {
        self.0
    }
}

/// Pricing constants for splurge pricing and the rush-hour window.
///
/// Built through [`PricingPolicy::new`] (or deserialized, which runs the same
/// checks), so a policy that exists always has a non-empty splurge range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PricingPolicyFields")]
pub struct PricingPolicy {
    splurge_min: u32,
    splurge_max: u32,
    rush_start_hour: u32,
    rush_end_hour: u32,
    last_rush_weekday: u32,
    rush_surcharge: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            splurge_min: 5,
            splurge_max: 9,
            rush_start_hour: 8,
            rush_end_hour: 11,
            last_rush_weekday: 4,
            rush_surcharge: 4,
        }
    }
}

impl PricingPolicy {
    /// Validate and build a policy.
    ///
    /// - `splurge_min..=splurge_max` is the inclusive draw range.
    /// - `rush_start_hour..rush_end_hour` is the half-open rush window (24h clock).
    /// - `last_rush_weekday` counts from Monday = 0.
    pub fn new(
        splurge_min: u32,
        splurge_max: u32,
        rush_start_hour: u32,
        rush_end_hour: u32,
        last_rush_weekday: u32,
        rush_surcharge: u32,
    ) -> DomainResult<Self> {
        if splurge_min > splurge_max {
            return Err(DomainError::validation(format!(
                "splurge range is inverted ({splurge_min} > {splurge_max})"
            )));
        }
        if rush_start_hour > rush_end_hour || rush_end_hour > 24 {
            return Err(DomainError::validation(format!(
                "rush window {rush_start_hour}..{rush_end_hour} is not within 0..24"
            )));
        }
        if last_rush_weekday > 6 {
            return Err(DomainError::validation(format!(
                "last rush weekday must be 0..=6, got {last_rush_weekday}"
            )));
        }

        Ok(Self {
            splurge_min,
            splurge_max,
            rush_start_hour,
            rush_end_hour,
            last_rush_weekday,
            rush_surcharge,
        })
    }

    pub fn splurge_min(&self) -> u32 {
        self.splurge_min
    }

    pub fn splurge_max(&self) -> u32 {
        self.splurge_max
    }

    pub fn rush_surcharge(&self) -> u32 {
        self.rush_surcharge
    }

    /// Whether `at` falls inside the weekday rush-hour window.
    pub fn is_rush_hour(&self, at: NaiveDateTime) -> bool {
        let in_window = (self.rush_start_hour..self.rush_end_hour).contains(&at.hour());
        in_window && at.weekday().num_days_from_monday() <= self.last_rush_weekday
    }

    /// Base price for a given splurge draw at instant `at`. Saturates at `u32::MAX`.
    pub fn base_price_at(&self, splurge: u32, at: NaiveDateTime) -> u32 {
        if self.is_rush_hour(at) {
            splurge.saturating_add(self.rush_surcharge)
        } else {
            splurge
        }
    }
}

/// Unvalidated wire shape of [`PricingPolicy`]; missing fields take the defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct PricingPolicyFields {
    splurge_min: u32,
    splurge_max: u32,
    rush_start_hour: u32,
    rush_end_hour: u32,
    last_rush_weekday: u32,
    rush_surcharge: u32,
}

impl Default for PricingPolicyFields {
    fn default() -> Self {
        let policy = PricingPolicy::default();
        Self {
            splurge_min: policy.splurge_min,
            splurge_max: policy.splurge_max,
            rush_start_hour: policy.rush_start_hour,
            rush_end_hour: policy.rush_end_hour,
            last_rush_weekday: policy.last_rush_weekday,
            rush_surcharge: policy.rush_surcharge,
        }
    }
}

impl TryFrom<PricingPolicyFields> for PricingPolicy {
    type Error = DomainError;

    fn try_from(fields: PricingPolicyFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.splurge_min,
            fields.splurge_max,
            fields.rush_start_hour,
            fields.rush_end_hour,
            fields.last_rush_weekday,
            fields.rush_surcharge,
        )
    }
}

/// Base-price source implementing splurge pricing over an injected clock and RNG.
#[derive(Debug, Clone)]
pub struct SplurgePricer<C, R> {
    policy: PricingPolicy,
    clock: C,
    rng: R,
}

impl SplurgePricer<SystemClock, ThreadRng> {
    /// Production pricer: local wall clock and the OS-seeded thread RNG.
    pub fn system() -> Self {
        Self::new(PricingPolicy::default(), SystemClock, rand::rng())
    }
}

impl<C: Clock> SplurgePricer<C, StdRng> {
    /// Deterministic pricer: same seed and clock, same sequence of prices.
    pub fn seeded(seed: u64, clock: C) -> Self {
        Self::new(PricingPolicy::default(), clock, StdRng::seed_from_u64(seed))
    }
}

impl<C: Clock, R: Rng> SplurgePricer<C, R> {
    pub fn new(policy: PricingPolicy, clock: C, rng: R) -> Self {
        Self { policy, clock, rng }
    }

    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }
}

impl<C: Clock, R: Rng> BasePriceSource for SplurgePricer<C, R> {
    fn base_price(&mut self) -> Decimal {
        let splurge = self
            .rng
            .random_range(self.policy.splurge_min..=self.policy.splurge_max);
        let at = self.clock.now();
        let rush_hour = self.policy.is_rush_hour(at);
        let price = self.policy.base_price_at(splurge, at);

        tracing::debug!(
            splurge,
            rush_hour,
            base_price = price,
            at = %at,
            "quoted melon base price"
        );

        Decimal::from(price)
    }
}
