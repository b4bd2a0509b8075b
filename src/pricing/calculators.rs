//! Core bill calculation functions.
//!
//! Pure functions for contract bill math - no database access.
//! Submission and repair both go through `compute_bill`, so a bill computed
//! twice from the same inputs is byte-identical.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{AddonRates, AddonType};

/// Separator line that opens every rendered bill section.
pub const BILL_SEPARATOR: &str = "----------------------------------------";

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use huntworks_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Format a currency amount with exactly two decimal places (no symbol).
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount, 2))
}

/// Convert a currency amount to minor units for persistence.
pub fn to_cents(amount: Decimal) -> i64 {
    (round_money(amount, 2) * Decimal::from(100))
        .to_i64()
        .unwrap_or(0)
}

/// Non-negative add-on quantities from a contract completion payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddonQuantities {
    pub extra_days: u32,
    pub extra_non_hunters: u32,
    pub extra_spotters: u32,
    pub rifle_rental: u32,
}

impl AddonQuantities {
    pub fn quantity(&self, addon: AddonType) -> u32 {
        match addon {
            AddonType::ExtraDays => self.extra_days,
            AddonType::NonHunter => self.extra_non_hunters,
            AddonType::Spotter => self.extra_spotters,
            AddonType::RifleRental => self.rifle_rental,
        }
    }

    /// Read quantities from arbitrary JSON, clamping to non-negative integers.
    ///
    /// Missing, non-numeric, or negative values read as zero; this never fails.
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            extra_days: read_quantity(value, "extra_days"),
            extra_non_hunters: read_quantity(value, "extra_non_hunters"),
            extra_spotters: read_quantity(value, "extra_spotters"),
            rifle_rental: read_quantity(value, "rifle_rental"),
        }
    }
}

fn read_quantity(value: &serde_json::Value, key: &str) -> u32 {
    let raw = match value.get(key) {
        Some(v) => v,
        None => return 0,
    };
    raw.as_i64()
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
        .map(|q| q.max(0) as u32)
        .unwrap_or(0)
}

/// One line of an itemized bill
#[derive(Debug, Clone, Serialize)]
pub struct BillLine {
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Itemized bill with its canonical rendered text
#[derive(Debug, Clone, Serialize)]
pub struct Bill {
    pub line_items: Vec<BillLine>,
    #[serde(with = "rust_decimal::serde::str")]
    pub guide_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub addons_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub text: String,
}

/// Compute the itemized bill for a contract.
///
/// The guide-fee line is always present, even at zero. Add-on lines appear
/// only for quantities above zero, in canonical order (extra days,
/// non-hunters, spotters, rifle rental).
///
/// # Arguments
/// * `guide_fee` - Base guide-fee amount in whole currency units
/// * `guide_fee_title` - Label for the guide-fee line (the plan title)
/// * `rates` - Resolved per-unit add-on rates
/// * `quantities` - Add-on quantities from the completion payload
pub fn compute_bill(
    guide_fee: Decimal,
    guide_fee_title: &str,
    rates: &AddonRates,
    quantities: &AddonQuantities,
) -> Bill {
    let guide_fee = round_money(guide_fee.max(Decimal::ZERO), 2);
    let label = if guide_fee_title.trim().is_empty() {
        "Guide Fee".to_string()
    } else {
        guide_fee_title.trim().to_string()
    };

    let mut line_items = vec![BillLine {
        label,
        amount: guide_fee,
    }];

    let mut addons_total = Decimal::ZERO;
    for addon in AddonType::ALL {
        let qty = quantities.quantity(addon);
        if qty == 0 {
            continue;
        }
        let rate = rates.rate(addon);
        let amount = round_money(rate * Decimal::from(qty), 2);
        addons_total += amount;
        line_items.push(BillLine {
            label: format!(
                "{} ({} × ${}/{})",
                addon.label(),
                qty,
                format_money(rate),
                addon.unit()
            ),
            amount,
        });
    }

    let total = guide_fee + addons_total;
    let text = render_bill_text(&line_items, total);

    Bill {
        line_items,
        guide_fee,
        addons_total,
        total,
        text,
    }
}

/// Render the canonical BILL text block.
fn render_bill_text(line_items: &[BillLine], total: Decimal) -> String {
    let mut out = String::new();
    out.push_str(BILL_SEPARATOR);
    out.push('\n');
    out.push_str("BILL\n\n");
    for line in line_items {
        out.push_str(&format!("{}: ${}\n", line.label, format_money(line.amount)));
    }
    out.push('\n');
    out.push_str(&format!("Total: ${}", format_money(total)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn quantities(days: u32, non_hunters: u32, spotters: u32, rifles: u32) -> AddonQuantities {
        AddonQuantities {
            extra_days: days,
            extra_non_hunters: non_hunters,
            extra_spotters: spotters,
            rifle_rental: rifles,
        }
    }

    // ==================== format_money tests ====================

    #[test]
    fn test_format_money_two_decimals() {
        assert_eq!(format_money(dec!(5)), "5.00");
        assert_eq!(format_money(dec!(75.5)), "75.50");
        assert_eq!(format_money(dec!(100.004)), "100.00");
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(to_cents(dec!(52.75)), 5275);
        assert_eq!(to_cents(dec!(0)), 0);
        assert_eq!(to_cents(dec!(5000)), 500000);
    }

    // ==================== quantity clamping tests ====================

    #[test]
    fn test_quantities_from_json() {
        let q = AddonQuantities::from_json(&json!({
            "extra_days": 2,
            "extra_non_hunters": 1,
            "extra_spotters": 0,
            "rifle_rental": 1,
        }));
        assert_eq!(q, quantities(2, 1, 0, 1));
    }

    #[test]
    fn test_quantities_negative_clamped_to_zero() {
        let q = AddonQuantities::from_json(&json!({ "extra_days": -3 }));
        assert_eq!(q.extra_days, 0);
    }

    #[test]
    fn test_quantities_non_numeric_read_as_zero() {
        let q = AddonQuantities::from_json(&json!({
            "extra_days": "lots",
            "extra_non_hunters": null,
            "extra_spotters": {"n": 2},
        }));
        assert_eq!(q, AddonQuantities::default());
    }

    #[test]
    fn test_quantities_numeric_strings_accepted() {
        let q = AddonQuantities::from_json(&json!({ "extra_days": "2" }));
        assert_eq!(q.extra_days, 2);
    }

    #[test]
    fn test_quantities_missing_keys_default_to_zero() {
        let q = AddonQuantities::from_json(&json!({}));
        assert_eq!(q, AddonQuantities::default());
    }

    // ==================== compute_bill tests ====================

    #[test]
    fn test_guide_fee_line_always_present() {
        let bill = compute_bill(
            Decimal::ZERO,
            "",
            &AddonRates::default(),
            &AddonQuantities::default(),
        );
        assert_eq!(bill.line_items.len(), 1);
        assert_eq!(bill.line_items[0].label, "Guide Fee");
        assert_eq!(bill.total, dec!(0));
        assert!(bill.text.contains("Guide Fee: $0.00"));
        assert!(bill.text.contains("Total: $0.00"));
    }

    #[test]
    fn test_zero_quantity_addons_omitted() {
        let bill = compute_bill(
            dec!(5000),
            "5-Day Elk Hunt",
            &AddonRates::default(),
            &quantities(0, 0, 3, 0),
        );
        assert_eq!(bill.line_items.len(), 2);
        assert_eq!(bill.line_items[1].label, "Spotters (3 × $50.00/spotter)");
        assert!(!bill.text.contains("Extra Days"));
        assert!(!bill.text.contains("Rifle Rental"));
    }

    #[test]
    fn test_default_rate_fallback_total() {
        // Unconfigured outfitter: extra days at 100, non-hunters at 75
        let bill = compute_bill(
            dec!(5000),
            "5-Day Elk Hunt",
            &AddonRates::default(),
            &quantities(2, 1, 0, 0),
        );
        assert_eq!(bill.addons_total, dec!(275));
        assert_eq!(bill.total, dec!(5275));
        assert!(bill.text.contains("Extra Days (2 × $100.00/day): $200.00"));
        assert!(bill.text.contains("Non-Hunters (1 × $75.00/person): $75.00"));
        assert!(bill.text.contains("Total: $5275.00"));
    }

    #[test]
    fn test_line_items_in_canonical_order() {
        let bill = compute_bill(
            dec!(4500),
            "Archery Mule Deer",
            &AddonRates::default(),
            &quantities(1, 1, 1, 1),
        );
        let labels: Vec<&str> = bill
            .line_items
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(labels[0], "Archery Mule Deer");
        assert!(labels[1].starts_with("Extra Days"));
        assert!(labels[2].starts_with("Non-Hunters"));
        assert!(labels[3].starts_with("Spotters"));
        assert!(labels[4].starts_with("Rifle Rental"));
    }

    #[test]
    fn test_bill_text_structure() {
        let bill = compute_bill(
            dec!(5000),
            "5-Day Elk Hunt",
            &AddonRates::default(),
            &quantities(2, 0, 0, 0),
        );
        let lines: Vec<&str> = bill.text.lines().collect();
        assert_eq!(lines[0], BILL_SEPARATOR);
        assert_eq!(lines[1], "BILL");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "5-Day Elk Hunt: $5000.00");
        assert_eq!(lines[4], "Extra Days (2 × $100.00/day): $200.00");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Total: $5200.00");
    }

    #[test]
    fn test_compute_bill_idempotent() {
        let rates = AddonRates {
            extra_day: dec!(150),
            non_hunter: dec!(80),
            spotter: dec!(50),
            rifle_rental: dec!(400),
        };
        let q = quantities(2, 1, 0, 1);
        let first = compute_bill(dec!(6500), "7-Day Bull Elk (Rifle)", &rates, &q);
        let second = compute_bill(dec!(6500), "7-Day Bull Elk (Rifle)", &rates, &q);
        assert_eq!(first.text, second.text);
        assert_eq!(first.total, second.total);
    }

    #[test]
    fn test_negative_guide_fee_clamped() {
        let bill = compute_bill(
            dec!(-100),
            "Guide Fee",
            &AddonRates::default(),
            &AddonQuantities::default(),
        );
        assert_eq!(bill.guide_fee, dec!(0));
        assert_eq!(bill.total, dec!(0));
    }

    #[test]
    fn test_fractional_rates_round_to_two_decimals() {
        let rates = AddonRates {
            extra_day: dec!(99.999),
            non_hunter: dec!(75),
            spotter: dec!(50),
            rifle_rental: dec!(500),
        };
        let bill = compute_bill(dec!(0), "Guide Fee", &rates, &quantities(1, 0, 0, 0));
        assert!(bill.text.contains("Extra Days (1 × $100.00/day): $100.00"));
    }
}
