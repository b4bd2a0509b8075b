//! Contract content materialization.
//!
//! Rewrites the BILL section of a contract's text from its completion
//! payload and the outfitter's current catalog, keeping stored text and
//! stored totals in sync. Used at submission time and as a repair pass over
//! existing contracts; running it twice with unchanged inputs is byte-stable.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::Result;
use crate::pricing::{self, calculators, catalog, Bill};

use super::models::{CompletionPayload, HuntContract};
use super::queries;

/// Find the byte offset where the BILL section starts, if present.
///
/// Tolerant of the stored shapes in the wild: a separator line of dashes,
/// equals signs, or underscores followed (optionally across blank lines) by
/// a heading whose text starts with "BILL" case-insensitively, with or
/// without leading dashes; a bare "BILL" heading line also counts.
pub fn locate_bill_section(content: &str) -> Option<usize> {
    let mut offset = 0;
    let mut pending_separator: Option<usize> = None;

    for line in content.split_inclusive('\n') {
        let text = line.trim_end_matches('\n').trim();

        if is_separator(text) {
            // Remember the most recent separator; a run of separators keeps the first
            if pending_separator.is_none() {
                pending_separator = Some(offset);
            }
        } else if text.is_empty() {
            // Blank lines between separator and heading are fine
        } else if is_bill_heading(text) && (pending_separator.is_some() || is_exact_bill(text)) {
            return Some(pending_separator.unwrap_or(offset));
        } else {
            pending_separator = None;
        }

        offset += line.len();
    }

    None
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '=' | '_'))
}

fn is_bill_heading(line: &str) -> bool {
    line.trim_start_matches(['-', ' '])
        .to_uppercase()
        .starts_with("BILL")
}

/// A heading standing alone, with no separator above it, must be exactly
/// "BILL" so prose beginning with the word cannot truncate a contract.
fn is_exact_bill(line: &str) -> bool {
    line.trim_matches(['-', ' ', ':'])
        .eq_ignore_ascii_case("bill")
}

/// Replace a contract's BILL section with freshly rendered bill text.
///
/// Everything from the located section to end-of-text is replaced; when no
/// section exists the bill is appended after a blank line.
pub fn patch_content(content: &str, bill_text: &str) -> String {
    match locate_bill_section(content) {
        Some(offset) => format!("{}{}", &content[..offset], bill_text),
        None => {
            if content.trim().is_empty() {
                bill_text.to_string()
            } else {
                format!("{}\n\n{}", content.trim_end(), bill_text)
            }
        }
    }
}

/// Compute a contract's current bill from its payload and catalog state.
pub async fn compute_current_bill(
    pool: &PgPool,
    cache: &AppCache,
    contract: &HuntContract,
    payload: &CompletionPayload,
) -> Result<Bill> {
    let items = pricing::services::load_catalog(pool, cache, contract.outfitter_id).await?;
    let rates = catalog::resolve_addon_rates(&items);

    let plan = contract
        .pricing_item_id
        .and_then(|id| items.iter().find(|i| i.id == id));
    let (guide_fee, title) = match plan {
        Some(item) => (item.amount, item.title.as_str()),
        None => (Decimal::ZERO, "Guide Fee"),
    };

    Ok(calculators::compute_bill(
        guide_fee,
        title,
        &rates,
        &payload.quantities,
    ))
}

/// Recompute one contract's bill and persist the patched content and totals.
pub async fn repair_contract(
    pool: &PgPool,
    cache: &AppCache,
    contract: &HuntContract,
) -> Result<HuntContract> {
    let payload = contract.completion();
    let bill = compute_current_bill(pool, cache, contract, &payload).await?;
    let content = patch_content(&contract.content, &bill.text);

    queries::update_bill(
        pool,
        contract.id,
        &content,
        calculators::to_cents(bill.guide_fee),
        calculators::to_cents(bill.addons_total),
        calculators::to_cents(bill.total),
    )
    .await
}

/// Outcome of a batch repair pass
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RepairSummary {
    pub repaired: u32,
    pub failed: u32,
}

/// Repair every contract (optionally one outfitter's), fire-and-continue.
///
/// One contract's failure never aborts the batch; failures are logged and
/// counted.
pub async fn repair_all(
    pool: &PgPool,
    cache: &AppCache,
    outfitter_id: Option<Uuid>,
) -> Result<RepairSummary> {
    let contracts = queries::list_contracts(pool, outfitter_id).await?;
    let mut summary = RepairSummary::default();

    for contract in &contracts {
        match repair_contract(pool, cache, contract).await {
            Ok(_) => summary.repaired += 1,
            Err(e) => {
                warn!("Repair failed for contract {}: {}", contract.id, e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Repair pass complete: {} repaired, {} failed",
        summary.repaired, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{compute_bill, AddonQuantities, AddonRates};
    use rust_decimal_macros::dec;

    fn sample_bill_text() -> String {
        compute_bill(
            dec!(5000),
            "5-Day Elk Hunt",
            &AddonRates::default(),
            &AddonQuantities {
                extra_days: 2,
                extra_non_hunters: 1,
                extra_spotters: 0,
                rifle_rental: 0,
            },
        )
        .text
    }

    // ==================== locate tests ====================

    #[test]
    fn test_locate_canonical_section() {
        let content = "Some contract prose.\n\n----------------------------------------\nBILL\n\nGuide Fee: $0.00\n\nTotal: $0.00";
        let offset = locate_bill_section(content).unwrap();
        assert!(content[offset..].starts_with("-----"));
    }

    #[test]
    fn test_locate_tolerates_blank_line_and_case() {
        let content = "Prose.\n===\n\n  bill of charges\nrest";
        assert!(locate_bill_section(content).is_some());
    }

    #[test]
    fn test_locate_tolerates_dashed_heading() {
        let content = "Prose.\n---------\n--- BILL ---\nrest";
        let offset = locate_bill_section(content).unwrap();
        assert_eq!(&content[offset..offset + 9], "---------");
    }

    #[test]
    fn test_locate_bare_heading_without_separator() {
        let content = "Prose about the hunt.\nBILL\nGuide Fee: $100.00";
        let offset = locate_bill_section(content).unwrap();
        assert!(content[offset..].starts_with("BILL"));
    }

    #[test]
    fn test_locate_ignores_prose_mentioning_billing() {
        // "Billing" prose after a separator is a heading match only when the
        // line starts with it; embedded mentions are not.
        let content = "Payment and billing questions go to the office.\nNo section here.";
        assert!(locate_bill_section(content).is_none());
    }

    #[test]
    fn test_separator_without_heading_is_not_a_section() {
        let content = "Prose.\n--------\nMore prose, no heading.";
        assert!(locate_bill_section(content).is_none());
    }

    // ==================== patch tests ====================

    #[test]
    fn test_patch_replaces_existing_section_to_end() {
        let stale = "PREAMBLE TEXT\n\n----------------------------------------\nBILL\n\nGuide Fee: $1.00\n\nTotal: $1.00";
        let bill = sample_bill_text();
        let patched = patch_content(stale, &bill);

        assert!(patched.starts_with("PREAMBLE TEXT\n\n"));
        assert!(patched.ends_with(&bill));
        assert!(!patched.contains("Total: $1.00"));
    }

    #[test]
    fn test_patch_appends_when_no_section() {
        let content = "Just prose, never billed.";
        let bill = sample_bill_text();
        let patched = patch_content(content, &bill);
        assert!(patched.starts_with("Just prose, never billed.\n\n"));
        assert!(patched.ends_with(&bill));
    }

    #[test]
    fn test_patch_on_empty_content() {
        let bill = sample_bill_text();
        assert_eq!(patch_content("", &bill), bill);
    }

    #[test]
    fn test_patch_is_idempotent() {
        let bill = sample_bill_text();
        let original = format!("PREAMBLE\n\n{}", "old bill section replaced below");
        let once = patch_content(&original, &bill);
        let twice = patch_content(&once, &bill);
        assert_eq!(once, twice);

        // And stable across an already-patched canonical document
        let canonical = format!("PREAMBLE\n\n{bill}");
        assert_eq!(patch_content(&canonical, &bill), canonical);
    }
}
