//! Shared primitive types used across the engine.

/// A stable, unique customer identifier.
pub type CustomerId = String;

/// Discount amounts are accumulated in basis points (1 bp = 0.0001).
/// Integer arithmetic keeps 0.05 + 0.10 exactly 0.15.
pub type BasisPoints = u32;

/// Basis points in a whole fraction of 1.0.
pub const BPS_PER_UNIT: BasisPoints = 10_000;

/// Hard ceiling on any discount: 0.30. No rule table may raise it.
pub const MAX_DISCOUNT_BPS: BasisPoints = 3_000;

/// Convert an integer basis-point amount to the fraction callers see.
/// Division happens once, so the result is the nearest f64 to the decimal.
pub fn bps_to_fraction(bps: BasisPoints) -> f64 {
    f64::from(bps) / f64::from(BPS_PER_UNIT)
}
