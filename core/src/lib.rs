//! Loyalty discount engine: a rule table over customer records with an
//! append-only audit trail in SQLite.

pub mod audit;
pub mod clock;
pub mod config;
pub mod customer;
pub mod engine;
pub mod error;
pub mod population;
pub mod repository;
pub mod rng;
pub mod rules;
pub mod store;
pub mod types;
