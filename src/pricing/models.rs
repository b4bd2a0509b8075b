//! Database models for the outfitter pricing catalog.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog category for guide-fee plans
pub const CATEGORY_GUIDE_FEES: &str = "guide_fees";
/// Catalog category for per-unit add-ons
pub const CATEGORY_ADD_ONS: &str = "add_ons";

/// Machine-readable add-on classification.
///
/// Order here is the canonical bill line order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonType {
    ExtraDays,
    NonHunter,
    Spotter,
    RifleRental,
}

impl AddonType {
    pub const ALL: [AddonType; 4] = [
        AddonType::ExtraDays,
        AddonType::NonHunter,
        AddonType::Spotter,
        AddonType::RifleRental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddonType::ExtraDays => "extra_days",
            AddonType::NonHunter => "non_hunter",
            AddonType::Spotter => "spotter",
            AddonType::RifleRental => "rifle_rental",
        }
    }

    pub fn parse(s: &str) -> Option<AddonType> {
        match s {
            "extra_days" => Some(AddonType::ExtraDays),
            "non_hunter" => Some(AddonType::NonHunter),
            "spotter" => Some(AddonType::Spotter),
            "rifle_rental" => Some(AddonType::RifleRental),
            _ => None,
        }
    }

    /// Per-unit rate used when the outfitter has not configured this add-on
    pub fn default_rate(&self) -> Decimal {
        match self {
            AddonType::ExtraDays => Decimal::from(100),
            AddonType::NonHunter => Decimal::from(75),
            AddonType::Spotter => Decimal::from(50),
            AddonType::RifleRental => Decimal::from(500),
        }
    }

    /// Label used on bill line items
    pub fn label(&self) -> &'static str {
        match self {
            AddonType::ExtraDays => "Extra Days",
            AddonType::NonHunter => "Non-Hunters",
            AddonType::Spotter => "Spotters",
            AddonType::RifleRental => "Rifle Rental",
        }
    }

    /// Unit suffix for the rate in bill line items
    pub fn unit(&self) -> &'static str {
        match self {
            AddonType::ExtraDays => "day",
            AddonType::NonHunter => "person",
            AddonType::Spotter => "spotter",
            AddonType::RifleRental => "rental",
        }
    }
}

/// Pricing catalog row from pricing_items
#[derive(Debug, Clone, FromRow)]
pub struct PricingItem {
    pub id: Uuid,
    pub outfitter_id: Uuid,
    pub title: String,
    pub category: String,
    pub addon_type: Option<String>,
    /// Amount in whole currency units
    pub amount: Decimal,
    /// Day count bundled into a guide-fee plan, when declared
    pub included_days: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PricingItem {
    pub fn is_guide_fee(&self) -> bool {
        self.category == CATEGORY_GUIDE_FEES
    }

    pub fn is_addon(&self) -> bool {
        self.category == CATEGORY_ADD_ONS
    }
}

/// Resolved per-unit add-on rates for one outfitter.
///
/// Every field is populated: unconfigured add-ons fall back to the
/// documented defaults, so bill computation never fails on a sparse catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonRates {
    #[serde(with = "rust_decimal::serde::str")]
    pub extra_day: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub non_hunter: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub spotter: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rifle_rental: Decimal,
}

impl AddonRates {
    pub fn rate(&self, addon: AddonType) -> Decimal {
        match addon {
            AddonType::ExtraDays => self.extra_day,
            AddonType::NonHunter => self.non_hunter,
            AddonType::Spotter => self.spotter,
            AddonType::RifleRental => self.rifle_rental,
        }
    }
}

impl Default for AddonRates {
    fn default() -> Self {
        Self {
            extra_day: AddonType::ExtraDays.default_rate(),
            non_hunter: AddonType::NonHunter.default_rate(),
            spotter: AddonType::Spotter.default_rate(),
            rifle_rental: AddonType::RifleRental.default_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_addon_type_round_trip() {
        for addon in AddonType::ALL {
            assert_eq!(AddonType::parse(addon.as_str()), Some(addon));
        }
        assert_eq!(AddonType::parse("boat_charter"), None);
    }

    #[test]
    fn test_default_rates() {
        assert_eq!(AddonType::ExtraDays.default_rate(), dec!(100));
        assert_eq!(AddonType::NonHunter.default_rate(), dec!(75));
        assert_eq!(AddonType::Spotter.default_rate(), dec!(50));
        assert_eq!(AddonType::RifleRental.default_rate(), dec!(500));
    }

    #[test]
    fn test_default_addon_rates_match_documented_defaults() {
        let rates = AddonRates::default();
        for addon in AddonType::ALL {
            assert_eq!(rates.rate(addon), addon.default_rate());
        }
    }
}
