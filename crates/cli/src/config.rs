//! Runtime configuration, read from the environment.

use anyhow::Context;
use melons_orders::PricingPolicy;

pub const SEED_ENV: &str = "MELONS_SEED";
pub const COUNTRY_ENV: &str = "MELONS_COUNTRY";
pub const POLICY_ENV: &str = "MELONS_PRICING_POLICY";

const DEFAULT_COUNTRY: &str = "AUS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seed for reproducible pricing. Unset means OS-seeded randomness.
    pub seed: Option<u64>,
    /// Destination of the demo international order.
    pub country_code: String,
    /// Pricing constants as JSON; missing fields keep their defaults.
    pub policy: PricingPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let seed = lookup(SEED_ENV)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{SEED_ENV} must be an unsigned integer, got {raw:?}"))
            })
            .transpose()?;

        let country_code = lookup(COUNTRY_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        let policy = match lookup(POLICY_ENV) {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("{POLICY_ENV} is not a valid pricing policy"))?,
            None => PricingPolicy::default(),
        };

        Ok(Self {
            seed,
            country_code,
            policy,
        })
    }
}
