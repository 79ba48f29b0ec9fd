//! The discount engine.
//!
//! FLOW (every call, in order):
//!   1. Validate input. Invalid input fails before any persistence work.
//!   2. Evaluate the rule table (pure).
//!   3. Append one audit row through the caller's session.
//!   4. Return the fraction.
//!
//! RULES:
//!   - The engine holds no session. Callers pass one per unit of work.
//!   - An audit write failure fails the whole call. No discount is ever
//!     returned without its audit row.

use crate::{
    audit::AuditLogEntry,
    clock::{Clock, SystemClock},
    config::DiscountConfig,
    customer::Customer,
    error::{DiscountError, DiscountResult},
    repository::LoyaltyRepository,
    rules::{DiscountBreakdown, RuleTable},
};

pub struct DiscountEngine<C: Clock = SystemClock> {
    rules: RuleTable,
    clock: C,
}

impl DiscountEngine<SystemClock> {
    pub fn new(config: DiscountConfig) -> DiscountResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> DiscountEngine<C> {
    pub fn with_clock(config: DiscountConfig, clock: C) -> DiscountResult<Self> {
        Ok(Self {
            rules: RuleTable::new(config)?,
            clock,
        })
    }

    /// Evaluate without recording anything.
    pub fn evaluate(&self, customer: &Customer) -> DiscountBreakdown {
        self.rules.evaluate(customer, self.clock.today())
    }

    /// Compute the discount fraction for `customer` and record one audit row.
    pub fn compute_discount<R>(&self, repo: &R, customer: Option<&Customer>) -> DiscountResult<f64>
    where
        R: LoyaltyRepository + ?Sized,
    {
        self.compute_discount_detailed(repo, customer)
            .map(|breakdown| breakdown.fraction())
    }

    /// As `compute_discount`, returning the full breakdown.
    pub fn compute_discount_detailed<R>(
        &self,
        repo: &R,
        customer: Option<&Customer>,
    ) -> DiscountResult<DiscountBreakdown>
    where
        R: LoyaltyRepository + ?Sized,
    {
        let customer =
            customer.ok_or_else(|| DiscountError::invalid_argument("customer must be provided"))?;

        let breakdown = self.evaluate(customer);
        let entry = AuditLogEntry::for_breakdown(&breakdown);
        if let Err(e) = repo.append_audit_log(&entry) {
            log::warn!(
                "discount: audit write failed for customer={}: {e}",
                customer.id()
            );
            return Err(e);
        }

        log::info!(
            "discount: customer={} level={} tenure={}y orders={} promo={} bonuses={:?} -> {} bps{}",
            customer.id(),
            customer.loyalty_level(),
            breakdown.tenure_years,
            customer.total_orders(),
            customer.has_active_promotion(),
            breakdown.bonus_names(),
            breakdown.final_bps,
            if breakdown.clamped() { " (capped)" } else { "" },
        );

        Ok(breakdown)
    }

    /// Look up a persisted customer and compute their discount.
    pub fn compute_discount_by_id<R>(&self, repo: &R, customer_id: Option<&str>) -> DiscountResult<f64>
    where
        R: LoyaltyRepository + ?Sized,
    {
        self.compute_discount_by_id_detailed(repo, customer_id)
            .map(|breakdown| breakdown.fraction())
    }

    pub fn compute_discount_by_id_detailed<R>(
        &self,
        repo: &R,
        customer_id: Option<&str>,
    ) -> DiscountResult<DiscountBreakdown>
    where
        R: LoyaltyRepository + ?Sized,
    {
        let customer_id = customer_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| DiscountError::invalid_argument("customer id must be provided"))?;

        let customer = repo.find_customer_by_id(customer_id)?.ok_or_else(|| {
            log::debug!("discount: customer={customer_id} not found");
            DiscountError::CustomerNotFound {
                customer_id: customer_id.to_string(),
            }
        })?;

        self.compute_discount_detailed(repo, Some(&customer))
    }

    /// Number of audit rows recorded for `customer_id`.
    pub fn count_logs_for_customer<R>(&self, repo: &R, customer_id: &str) -> DiscountResult<u64>
    where
        R: LoyaltyRepository + ?Sized,
    {
        repo.count_audit_logs(customer_id)
    }
}
