//! Pricing catalog resolution.
//!
//! The add-on matching precedence lives here and nowhere else; every caller
//! that needs a rate goes through this module so the rules cannot drift
//! between call sites.
//!
//! Precedence:
//! 1. An explicit machine-readable `addon_type` tag on a catalog item.
//! 2. Otherwise only add-on-category items are considered (a guide-fee plan
//!    titled "5-Day Hunt" must never match as an extra day).
//! 3. Within add-on items, case-insensitive title substring rules.
//! 4. Documented default rates when nothing matches.

use rust_decimal::Decimal;

use super::models::{AddonRates, AddonType, PricingItem};

/// Find the catalog item for an add-on classification, if configured.
pub fn find_addon_item<'a>(
    items: &'a [PricingItem],
    addon: AddonType,
) -> Option<&'a PricingItem> {
    let live = || items.iter().filter(|i| i.deleted_at.is_none());

    // 1. Explicit tag wins over any title heuristics
    if let Some(tagged) = live().find(|i| i.addon_type.as_deref() == Some(addon.as_str())) {
        return Some(tagged);
    }

    // 2 + 3. Title rules, restricted to the add-ons category
    live()
        .filter(|i| i.is_addon())
        .find(|i| title_matches(&i.title, addon))
}

/// Case-insensitive title substring rules for untagged add-on items.
fn title_matches(title: &str, addon: AddonType) -> bool {
    let t = title.to_lowercase();
    match addon {
        AddonType::ExtraDays => {
            !t.contains("non")
                && (t.contains("additional day") || t.contains("extra day") || t.contains("day"))
        }
        AddonType::NonHunter => t.contains("non") && t.contains("hunter"),
        AddonType::Spotter => t.contains("spotter"),
        AddonType::RifleRental => t.contains("rifle") && (t.contains("rental") || t.contains("rent")),
    }
}

/// Per-unit rate for one add-on, falling back to the documented default.
pub fn addon_rate(items: &[PricingItem], addon: AddonType) -> Decimal {
    find_addon_item(items, addon)
        .map(|i| i.amount)
        .unwrap_or_else(|| addon.default_rate())
}

/// Resolve all four add-on rates for an outfitter's catalog.
pub fn resolve_addon_rates(items: &[PricingItem]) -> AddonRates {
    AddonRates {
        extra_day: addon_rate(items, AddonType::ExtraDays),
        non_hunter: addon_rate(items, AddonType::NonHunter),
        spotter: addon_rate(items, AddonType::Spotter),
        rifle_rental: addon_rate(items, AddonType::RifleRental),
    }
}

/// Find a guide-fee plan whose title mentions the species and weapon.
pub fn find_guide_fee_plan<'a>(
    items: &'a [PricingItem],
    species: &str,
    weapon: &str,
) -> Option<&'a PricingItem> {
    let species = species.trim().to_lowercase();
    let weapon = weapon.trim().to_lowercase();
    items
        .iter()
        .filter(|i| i.deleted_at.is_none() && i.is_guide_fee())
        .find(|i| {
            let t = i.title.to_lowercase();
            (species.is_empty() || t.contains(&species)) && (weapon.is_empty() || t.contains(&weapon))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{CATEGORY_ADD_ONS, CATEGORY_GUIDE_FEES};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(title: &str, category: &str, addon_type: Option<&str>, amount: Decimal) -> PricingItem {
        PricingItem {
            id: Uuid::new_v4(),
            outfitter_id: Uuid::new_v4(),
            title: title.to_string(),
            category: category.to_string(),
            addon_type: addon_type.map(|s| s.to_string()),
            amount,
            included_days: None,
            deleted_at: None,
        }
    }

    // ==================== precedence tests ====================

    #[test]
    fn test_explicit_tag_beats_title_match() {
        let items = vec![
            item("Additional Day", CATEGORY_ADD_ONS, None, dec!(125)),
            item("Day Rate", CATEGORY_ADD_ONS, Some("extra_days"), dec!(150)),
        ];
        let found = find_addon_item(&items, AddonType::ExtraDays).unwrap();
        assert_eq!(found.amount, dec!(150));
    }

    #[test]
    fn test_guide_fee_plan_never_matches_as_addon() {
        // "5-Day Hunt" contains "day" but is a guide-fee plan
        let items = vec![item("5-Day Hunt", CATEGORY_GUIDE_FEES, None, dec!(5000))];
        assert!(find_addon_item(&items, AddonType::ExtraDays).is_none());
        assert_eq!(addon_rate(&items, AddonType::ExtraDays), dec!(100));
    }

    #[test]
    fn test_deleted_items_ignored() {
        let mut deleted = item("Extra Day", CATEGORY_ADD_ONS, None, dec!(250));
        deleted.deleted_at = Some(chrono::Utc::now());
        assert!(find_addon_item(&[deleted], AddonType::ExtraDays).is_none());
    }

    // ==================== title rule tests ====================

    #[test]
    fn test_extra_day_title_rules() {
        let additional = vec![item("Additional Day", CATEGORY_ADD_ONS, None, dec!(120))];
        assert!(find_addon_item(&additional, AddonType::ExtraDays).is_some());

        // "non" in the title excludes it from extra-day matching
        let non = vec![item("Non-Hunter Day Pass", CATEGORY_ADD_ONS, None, dec!(75))];
        assert!(find_addon_item(&non, AddonType::ExtraDays).is_none());
    }

    #[test]
    fn test_non_hunter_title_rules() {
        for title in ["Non-Hunter", "Non Hunter Companion", "NON-HUNTER FEE"] {
            let items = vec![item(title, CATEGORY_ADD_ONS, None, dec!(80))];
            assert!(
                find_addon_item(&items, AddonType::NonHunter).is_some(),
                "expected match for {title:?}"
            );
        }
        let items = vec![item("Hunter Day", CATEGORY_ADD_ONS, None, dec!(80))];
        assert!(find_addon_item(&items, AddonType::NonHunter).is_none());
    }

    #[test]
    fn test_rifle_rental_title_rules() {
        let rental = vec![item("Rifle Rental", CATEGORY_ADD_ONS, None, dec!(450))];
        assert!(find_addon_item(&rental, AddonType::RifleRental).is_some());

        let rent = vec![item("Rent a Rifle", CATEGORY_ADD_ONS, None, dec!(450))];
        assert!(find_addon_item(&rent, AddonType::RifleRental).is_some());

        let scope = vec![item("Rifle Scope", CATEGORY_ADD_ONS, None, dec!(450))];
        assert!(find_addon_item(&scope, AddonType::RifleRental).is_none());
    }

    #[test]
    fn test_spotter_title_rule() {
        let items = vec![item("Spotter Service", CATEGORY_ADD_ONS, None, dec!(60))];
        assert!(find_addon_item(&items, AddonType::Spotter).is_some());
    }

    // ==================== rate resolution tests ====================

    #[test]
    fn test_empty_catalog_yields_documented_defaults() {
        let rates = resolve_addon_rates(&[]);
        assert_eq!(rates.extra_day, dec!(100));
        assert_eq!(rates.non_hunter, dec!(75));
        assert_eq!(rates.spotter, dec!(50));
        assert_eq!(rates.rifle_rental, dec!(500));
    }

    #[test]
    fn test_configured_rates_override_defaults() {
        let items = vec![
            item("Extra Day", CATEGORY_ADD_ONS, None, dec!(150)),
            item("Spotter", CATEGORY_ADD_ONS, Some("spotter"), dec!(65)),
        ];
        let rates = resolve_addon_rates(&items);
        assert_eq!(rates.extra_day, dec!(150));
        assert_eq!(rates.spotter, dec!(65));
        // unconfigured types still fall back
        assert_eq!(rates.non_hunter, dec!(75));
        assert_eq!(rates.rifle_rental, dec!(500));
    }

    // ==================== guide-fee plan tests ====================

    #[test]
    fn test_find_guide_fee_plan_by_species_and_weapon() {
        let items = vec![
            item("5-Day Elk Hunt (Rifle)", CATEGORY_GUIDE_FEES, None, dec!(5000)),
            item("5-Day Elk Hunt (Archery)", CATEGORY_GUIDE_FEES, None, dec!(4500)),
        ];
        let plan = find_guide_fee_plan(&items, "elk", "archery").unwrap();
        assert_eq!(plan.amount, dec!(4500));
    }

    #[test]
    fn test_find_guide_fee_plan_ignores_addons() {
        let items = vec![item("Elk Rifle Rental", CATEGORY_ADD_ONS, None, dec!(450))];
        assert!(find_guide_fee_plan(&items, "elk", "rifle").is_none());
    }
}
