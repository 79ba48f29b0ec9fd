//! Customer value object and loyalty tiers.

use crate::{
    clock::whole_years_between,
    error::{DiscountError, DiscountResult},
    types::CustomerId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Ordinal loyalty tier. Declaration order is the tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoyaltyLevel {
    Basic,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyLevel {
    pub const ALL: [LoyaltyLevel; 4] = [
        LoyaltyLevel::Basic,
        LoyaltyLevel::Silver,
        LoyaltyLevel::Gold,
        LoyaltyLevel::Platinum,
    ];

    /// Stable name used in the database and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic    => "BASIC",
            Self::Silver   => "SILVER",
            Self::Gold     => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

impl fmt::Display for LoyaltyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoyaltyLevel {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC"    => Ok(Self::Basic),
            "SILVER"   => Ok(Self::Silver),
            "GOLD"     => Ok(Self::Gold),
            "PLATINUM" => Ok(Self::Platinum),
            _ => Err(DiscountError::UnknownLoyaltyLevel { value: s.to_string() }),
        }
    }
}

/// Loyalty-relevant attributes of one customer.
///
/// Fields are private: once built, a Customer cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    id:                   CustomerId,
    join_date:            NaiveDate,
    total_orders:         u32,
    loyalty_level:        LoyaltyLevel,
    has_active_promotion: bool,
}

impl Customer {
    /// Build a customer. The id must contain something other than whitespace.
    pub fn new(
        id: impl Into<CustomerId>,
        join_date: NaiveDate,
        total_orders: u32,
        loyalty_level: LoyaltyLevel,
        has_active_promotion: bool,
    ) -> DiscountResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DiscountError::invalid_argument("customer id must not be empty"));
        }
        Ok(Self {
            id,
            join_date,
            total_orders,
            loyalty_level,
            has_active_promotion,
        })
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn join_date(&self) -> NaiveDate { self.join_date }
    pub fn total_orders(&self) -> u32 { self.total_orders }
    pub fn loyalty_level(&self) -> LoyaltyLevel { self.loyalty_level }
    pub fn has_active_promotion(&self) -> bool { self.has_active_promotion }

    /// Whole years since joining, as of `today`.
    pub fn tenure_years(&self, today: NaiveDate) -> u32 {
        whole_years_between(self.join_date, today)
    }
}
