//! Checkout walkthrough: prices one order of each kind, records shipping and
//! inspection, and shows the 100-melon limit in action.

mod config;

use melons_core::{DomainResult, SystemClock};
use melons_orders::{
    BasePriceSource, MelonOrder, Order, SplurgePricer, new_domestic_order, new_government_order,
    new_international_order,
};
use serde::Serialize;

use crate::config::Config;

#[derive(Serialize)]
struct Receipt<'a> {
    order: &'a Order,
    order_type: melons_orders::OrderType,
    pricing: melons_orders::OrderSummary,
}

fn main() -> anyhow::Result<()> {
    melons_observability::init();

    let config = Config::from_env()?;
    tracing::info!(seed = ?config.seed, country = %config.country_code, "starting melon checkout");

    match config.seed {
        Some(seed) => run(
            &config,
            &mut SplurgePricer::seeded(seed, SystemClock).with_policy(config.policy),
        ),
        None => run(&config, &mut SplurgePricer::system().with_policy(config.policy)),
    }
}

fn run<S: BasePriceSource>(config: &Config, pricer: &mut S) -> anyhow::Result<()> {
    let mut orders = vec![
        new_domestic_order("Muskmelon", 10)?,
        new_international_order("Christmas", 5, config.country_code.as_str())?,
        new_government_order("Casaba", 40)?,
    ];

    for order in &mut orders {
        if let Some(government) = order.as_government_mut() {
            government.mark_inspection(true);
        }
        order.mark_shipped();

        let order: &Order = order;
        let receipt = Receipt {
            order,
            order_type: order.order_type(),
            pricing: order.price(pricer),
        };
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        tracing::info!(
            species = %order.species(),
            quantity = %order.quantity(),
            total = %receipt.pricing.total,
            "priced order"
        );
    }

    if let Err(err) = oversized_order(config) {
        tracing::warn!(error = %err, "order rejected");
    }

    Ok(())
}

fn oversized_order(config: &Config) -> DomainResult<Order> {
    new_international_order("Christmas", 105, config.country_code.as_str())
}
