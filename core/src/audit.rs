//! Audit trail of discount computations.
//!
//! RULE: Audit rows are append-only. Nothing updates or deletes them.

use crate::{
    rules::DiscountBreakdown,
    types::{BasisPoints, CustomerId},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Row id, assigned by the database. None until persisted.
    pub id:           Option<i64>,
    pub entry_id:     String,
    pub customer_id:  CustomerId,
    pub discount_bps: BasisPoints,
    pub raw_bps:      BasisPoints,
    pub bonuses:      Vec<String>,
    pub recorded_at:  DateTime<Utc>,
}

impl AuditLogEntry {
    /// A fresh, unpersisted entry describing one evaluation.
    pub fn for_breakdown(breakdown: &DiscountBreakdown) -> Self {
        Self {
            id:           None,
            entry_id:     Uuid::new_v4().to_string(),
            customer_id:  breakdown.customer_id.clone(),
            discount_bps: breakdown.final_bps,
            raw_bps:      breakdown.raw_bps,
            bonuses:      breakdown.bonus_names().into_iter().map(String::from).collect(),
            recorded_at:  Utc::now(),
        }
    }

    /// Timestamp format stored in the `recorded_at` column.
    pub fn recorded_at_text(&self) -> String {
        self.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{AppliedBonus, BonusKind};

    #[test]
    fn entry_copies_breakdown_totals() {
        let breakdown = DiscountBreakdown {
            customer_id:  "c-9".into(),
            tenure_years: 7,
            applied: vec![
                AppliedBonus { kind: BonusKind::Tier, bps: 1_000 },
                AppliedBonus { kind: BonusKind::Tenure, bps: 500 },
            ],
            raw_bps:   1_500,
            final_bps: 1_500,
        };
        let entry = AuditLogEntry::for_breakdown(&breakdown);
        assert_eq!(entry.id, None);
        assert_eq!(entry.customer_id, "c-9");
        assert_eq!(entry.discount_bps, 1_500);
        assert_eq!(entry.bonuses, vec!["tier".to_string(), "tenure".to_string()]);
        assert!(Uuid::parse_str(&entry.entry_id).is_ok());
    }

    #[test]
    fn entry_ids_are_unique() {
        let breakdown = DiscountBreakdown {
            customer_id:  "c-9".into(),
            tenure_years: 0,
            applied:      vec![],
            raw_bps:      0,
            final_bps:    0,
        };
        let a = AuditLogEntry::for_breakdown(&breakdown);
        let b = AuditLogEntry::for_breakdown(&breakdown);
        assert_ne!(a.entry_id, b.entry_id);
    }
}
