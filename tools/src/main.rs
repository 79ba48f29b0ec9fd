//! discount-runner: headless loyalty discount runner.
//!
//! Usage:
//!   discount-runner --seed 42 --customers 100 --db loyalty.db
//!   discount-runner --db loyalty.db --customer c-000007 --json
//!   discount-runner --config data/discount_rules.json --seed 7

use anyhow::Result;
use loyalty_core::{
    clock::{Clock, SystemClock},
    config::DiscountConfig,
    engine::DiscountEngine,
    population,
    rules::DiscountBreakdown,
    store::LoyaltyStore,
};
use std::env;

#[derive(serde::Serialize)]
struct DiscountLine<'a> {
    customer_id: &'a str,
    discount: f64,
    discount_bps: u32,
    raw_bps: u32,
    capped: bool,
    bonuses: Vec<&'static str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let config_path = arg_value(&args, "--config");
    let seed = arg_value(&args, "--seed").and_then(|v| v.parse::<u64>().ok());
    let count = parse_arg(&args, "--customers", 50usize);
    let only = arg_value(&args, "--customer");
    let json = args.iter().any(|a| a == "--json");

    let config = match config_path {
        Some(path) => DiscountConfig::load(path)?,
        None => DiscountConfig::default(),
    };

    if !json {
        println!("Loyalty Discount - discount-runner");
        println!("  db:        {db}");
        println!("  config:    {}", config_path.unwrap_or("(built-in)"));
        if let Some(seed) = seed {
            println!("  seed:      {seed}");
            println!("  customers: {count}");
        }
        println!();
    }

    let mut store = LoyaltyStore::open(db)?;
    store.migrate()?;

    let today = SystemClock.today();
    if let Some(seed) = seed {
        let inserted = population::seed_store(&mut store, seed, count, today)?;
        if inserted == 0 && !json {
            println!("  (seed skipped: database already holds customers)");
            println!();
        }
    }

    let engine = DiscountEngine::new(config)?;
    let results: Vec<DiscountBreakdown> = store.with_session(|s| {
        let ids = match only {
            Some(id) => vec![id.to_string()],
            None => s.customer_ids()?,
        };
        ids.iter()
            .map(|id| engine.compute_discount_by_id_detailed(s, Some(id)))
            .collect()
    })?;

    if json {
        for b in &results {
            let line = DiscountLine {
                customer_id: &b.customer_id,
                discount: b.fraction(),
                discount_bps: b.final_bps,
                raw_bps: b.raw_bps,
                capped: b.clamped(),
                bonuses: b.bonus_names(),
            };
            println!("{}", serde_json::to_string(&line)?);
        }
    } else {
        print_summary(&results);
    }

    Ok(())
}

fn print_summary(results: &[DiscountBreakdown]) {
    if results.is_empty() {
        println!("  (No customers to evaluate)");
        return;
    }

    for b in results {
        println!(
            "  {:<12} {:>5.2}%  tenure {:>2}y  [{}]{}",
            b.customer_id,
            b.fraction() * 100.0,
            b.tenure_years,
            b.bonus_names().join(", "),
            if b.clamped() { "  (capped)" } else { "" },
        );
    }

    let total_bps: u64 = results.iter().map(|b| u64::from(b.final_bps)).sum();
    let capped = results.iter().filter(|b| b.clamped()).count();
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  evaluated:      {}", results.len());
    println!("  capped:         {capped}");
    println!(
        "  mean discount:  {:.2}%",
        total_bps as f64 / results.len() as f64 / 100.0
    );
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
