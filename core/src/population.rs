//! Seeded demo population used by the runner and by tests that need
//! persisted customers.

use crate::{
    clock::years_ago,
    customer::{Customer, LoyaltyLevel},
    error::DiscountResult,
    rng::SeededRng,
    store::LoyaltyStore,
};
use chrono::{Days, NaiveDate};
use rand::distributions::WeightedIndex;

/// Relative share of each tier, in `LoyaltyLevel::ALL` order.
pub const TIER_WEIGHTS: [f64; 4] = [0.55, 0.25, 0.15, 0.05];
pub const MAX_TENURE_YEARS: u64 = 15;
pub const PROMOTION_RATE: f64 = 0.20;

/// Generate `count` customers with ids `c-000000`, `c-000001`, ...
pub fn generate(seed: u64, count: usize, today: NaiveDate) -> DiscountResult<Vec<Customer>> {
    let mut rng = SeededRng::new(seed);
    let tiers = WeightedIndex::new(TIER_WEIGHTS)
        .map_err(|e| anyhow::anyhow!("bad tier weights: {e}"))?;
    let mut customers = Vec::with_capacity(count);

    for i in 0..count {
        let level = LoyaltyLevel::ALL[rng.pick(&tiers)];
        let tenure = rng.below(MAX_TENURE_YEARS + 1) as u32;
        // Spread join dates within the year so anniversaries vary.
        let offset = Days::new(rng.below(365));
        let join_date = years_ago(today, tenure)
            .checked_sub_days(offset)
            .unwrap_or(today);

        // Heavier tiers order more.
        let order_scale = 10.0 * (1 + level as u32) as f64;
        let total_orders = rng.pareto(order_scale, 1.6).min(2_000.0) as u32;
        let promo = rng.chance(PROMOTION_RATE);

        customers.push(Customer::new(
            format!("c-{i:06}"),
            join_date,
            total_orders,
            level,
            promo,
        )?);
    }

    Ok(customers)
}

/// Persist a generated population into an empty store.
/// Returns how many customers were inserted; 0 when the store already
/// holds customers, so re-running a seed never collides on ids.
pub fn seed_store(
    store: &mut LoyaltyStore,
    seed: u64,
    count: usize,
    today: NaiveDate,
) -> DiscountResult<usize> {
    let existing = store.customer_count()?;
    if existing > 0 {
        log::warn!("population: store already holds {existing} customers; skipping seed {seed}");
        return Ok(0);
    }

    let customers = generate(seed, count, today)?;
    store.with_session(|s| {
        for c in &customers {
            s.insert_customer(c)?;
        }
        Ok(())
    })?;
    log::info!("population: seeded {} customers from seed {seed}", customers.len());
    Ok(customers.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(42, 25, today()).unwrap();
        let b = generate(42, 25, today()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ids_are_sequential_and_join_dates_in_past() {
        let customers = generate(9, 10, today()).unwrap();
        assert_eq!(customers[0].id(), "c-000000");
        assert_eq!(customers[9].id(), "c-000009");
        assert!(customers.iter().all(|c| c.join_date() <= today()));
    }
}
