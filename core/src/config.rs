//! Rule-table configuration.
//!
//! All increments are basis points (500 = 0.05). The JSON file at
//! `data/discount_rules.json` mirrors `DiscountConfig::default()`.

use crate::{
    customer::LoyaltyLevel,
    error::{DiscountError, DiscountResult},
    types::{BasisPoints, MAX_DISCOUNT_BPS},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBonuses {
    pub basic:    BasisPoints,
    pub silver:   BasisPoints,
    pub gold:     BasisPoints,
    pub platinum: BasisPoints,
}

impl TierBonuses {
    pub fn for_level(&self, level: LoyaltyLevel) -> BasisPoints {
        match level {
            LoyaltyLevel::Basic    => self.basic,
            LoyaltyLevel::Silver   => self.silver,
            LoyaltyLevel::Gold     => self.gold,
            LoyaltyLevel::Platinum => self.platinum,
        }
    }
}

/// A bonus that fires when a count is strictly greater than `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBonus {
    pub threshold: u32,
    pub bonus_bps: BasisPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountConfig {
    pub tier_bonus_bps:      TierBonuses,
    /// Tenure is whole years since joining.
    pub tenure:              ThresholdBonus,
    /// Volume is the customer's lifetime order count.
    pub volume:              ThresholdBonus,
    pub promotion_bonus_bps: BasisPoints,
    pub max_discount_bps:    BasisPoints,
    /// When set, the volume bonus is skipped for customers who already
    /// earned the tenure bonus.
    #[serde(default)]
    pub tenure_volume_exclusive: bool,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            tier_bonus_bps: TierBonuses {
                basic:    0,
                silver:   500,
                gold:     1_000,
                platinum: 1_500,
            },
            tenure: ThresholdBonus { threshold: 5, bonus_bps: 500 },
            volume: ThresholdBonus { threshold: 100, bonus_bps: 500 },
            promotion_bonus_bps: 1_000,
            max_discount_bps:    3_000,
            tenure_volume_exclusive: false,
        }
    }
}

impl DiscountConfig {
    /// Load and validate a rule table from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DiscountConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        log::info!("config: loaded discount rules from {path}");
        Ok(config)
    }

    /// The cap may not exceed `MAX_DISCOUNT_BPS`, and no single increment
    /// may exceed the cap.
    pub fn validate(&self) -> DiscountResult<()> {
        if self.max_discount_bps > MAX_DISCOUNT_BPS {
            return Err(DiscountError::InvalidConfig(format!(
                "max_discount_bps {} exceeds ceiling {MAX_DISCOUNT_BPS}",
                self.max_discount_bps
            )));
        }

        let increments = LoyaltyLevel::ALL
            .iter()
            .map(|level| (level.as_str(), self.tier_bonus_bps.for_level(*level)))
            .chain([
                ("tenure", self.tenure.bonus_bps),
                ("volume", self.volume.bonus_bps),
                ("promotion", self.promotion_bonus_bps),
            ]);
        for (name, bps) in increments {
            if bps > self.max_discount_bps {
                return Err(DiscountError::InvalidConfig(format!(
                    "{name} bonus {bps} bps exceeds max_discount_bps {}",
                    self.max_discount_bps
                )));
            }
        }
        Ok(())
    }
}
