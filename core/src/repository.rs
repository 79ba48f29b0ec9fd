//! The persistence seam the engine talks through.
//!
//! RULE: The engine never touches SQL. It only sees a LoyaltyRepository,
//! which in production is a `store::Session` (one open transaction).

use crate::{audit::AuditLogEntry, customer::Customer, error::DiscountResult};

pub trait LoyaltyRepository {
    /// Look up a persisted customer. `Ok(None)` on a miss.
    fn find_customer_by_id(&self, customer_id: &str) -> DiscountResult<Option<Customer>>;

    /// Append exactly one audit row.
    fn append_audit_log(&self, entry: &AuditLogEntry) -> DiscountResult<()>;

    /// Number of audit rows recorded for `customer_id`.
    fn count_audit_logs(&self, customer_id: &str) -> DiscountResult<u64>;
}
