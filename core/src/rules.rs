//! The discount rule table.
//!
//! Rules are evaluated in a fixed order. Each rule that fires adds a fixed
//! basis-point increment; the sum is then capped. No floating point is
//! involved until `DiscountBreakdown::fraction`.

use crate::{
    config::DiscountConfig,
    customer::Customer,
    error::DiscountResult,
    types::{bps_to_fraction, BasisPoints, CustomerId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Tier,
    Tenure,
    Volume,
    Promotion,
}

impl BonusKind {
    /// Evaluation order. NEVER reorder: exclusivity checks look backwards.
    pub const ORDER: [BonusKind; 4] = [
        BonusKind::Tier,
        BonusKind::Tenure,
        BonusKind::Volume,
        BonusKind::Promotion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tier      => "tier",
            Self::Tenure    => "tenure",
            Self::Volume    => "volume",
            Self::Promotion => "promotion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedBonus {
    pub kind: BonusKind,
    pub bps:  BasisPoints,
}

/// Result of evaluating the rule table for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub customer_id:  CustomerId,
    pub tenure_years: u32,
    pub applied:      Vec<AppliedBonus>,
    /// Sum of all applied increments before the cap.
    pub raw_bps:      BasisPoints,
    pub final_bps:    BasisPoints,
}

impl DiscountBreakdown {
    pub fn fraction(&self) -> f64 {
        bps_to_fraction(self.final_bps)
    }

    pub fn clamped(&self) -> bool {
        self.raw_bps > self.final_bps
    }

    pub fn has(&self, kind: BonusKind) -> bool {
        self.applied.iter().any(|b| b.kind == kind)
    }

    pub fn bonus_names(&self) -> Vec<&'static str> {
        self.applied.iter().map(|b| b.kind.name()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    config: DiscountConfig,
}

impl RuleTable {
    pub fn new(config: DiscountConfig) -> DiscountResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Evaluate every rule for `customer` as of `today`. Pure.
    pub fn evaluate(&self, customer: &Customer, today: NaiveDate) -> DiscountBreakdown {
        let tenure_years = customer.tenure_years(today);
        let mut applied: Vec<AppliedBonus> = Vec::with_capacity(BonusKind::ORDER.len());

        for kind in BonusKind::ORDER {
            if let Some(bps) = self.increment(kind, customer, tenure_years, &applied) {
                applied.push(AppliedBonus { kind, bps });
            }
        }

        let raw_bps: BasisPoints = applied.iter().map(|b| b.bps).sum();
        let final_bps = raw_bps.min(self.config.max_discount_bps);

        DiscountBreakdown {
            customer_id: customer.id().to_string(),
            tenure_years,
            applied,
            raw_bps,
            final_bps,
        }
    }

    /// The increment `kind` contributes, or None when the rule does not fire.
    fn increment(
        &self,
        kind: BonusKind,
        customer: &Customer,
        tenure_years: u32,
        applied: &[AppliedBonus],
    ) -> Option<BasisPoints> {
        let c = &self.config;
        match kind {
            BonusKind::Tier => Some(c.tier_bonus_bps.for_level(customer.loyalty_level())),
            BonusKind::Tenure => (tenure_years > c.tenure.threshold).then_some(c.tenure.bonus_bps),
            BonusKind::Volume => {
                let tenure_fired = applied.iter().any(|b| b.kind == BonusKind::Tenure);
                if c.tenure_volume_exclusive && tenure_fired {
                    return None;
                }
                (customer.total_orders() > c.volume.threshold).then_some(c.volume.bonus_bps)
            }
            BonusKind::Promotion => customer
                .has_active_promotion()
                .then_some(c.promotion_bonus_bps),
        }
    }
}
