//! Booking completion service.
//!
//! Records a client's chosen guide-fee plan, add-on quantities, and hunt
//! dates against the hunt's season window, then refreshes the contract's
//! payload, bill, and content. Validation is pure; persistence happens only
//! after every rule passes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::Hunt;
use crate::pricing::{self, calculators, catalog, AddonQuantities, PricingItem};
use crate::seasons;

use super::lifecycle::{self, check_window};
use super::materializer;
use super::models::HuntContract;
use super::queries;

/// Validated booking inputs
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub pricing_item_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quantities: AddonQuantities,
}

/// Validate a booking against the chosen plan and season window.
///
/// A plan that declares `included_days` pins the inclusive day span to
/// `included_days + extra_days` exactly; the mismatch error carries both the
/// required and actual counts so the client can self-correct.
pub fn validate_booking(
    plan: &PricingItem,
    input: &BookingInput,
    window: Option<(NaiveDate, NaiveDate)>,
) -> Result<()> {
    if !plan.is_guide_fee() {
        return Err(AppError::validation(format!(
            "Pricing item {:?} is not a guide-fee plan",
            plan.title
        )));
    }

    check_window(input.start_date, input.end_date, window)?;

    if let Some(included_days) = plan.included_days {
        let required = i64::from(included_days) + i64::from(input.quantities.extra_days);
        let actual = (input.end_date - input.start_date).num_days() + 1;
        if actual != required {
            return Err(AppError::validation_with(
                format!(
                    "Selected dates span {actual} days but the {} plan with {} extra days requires exactly {required} days",
                    plan.title, input.quantities.extra_days
                ),
                serde_json::json!({
                    "required_days": required,
                    "actual_days": actual,
                    "included_days": included_days,
                    "extra_days": input.quantities.extra_days,
                }),
            ));
        }
    }

    Ok(())
}

/// First instant of the day, UTC
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last second of the day, UTC
fn day_end(date: NaiveDate) -> DateTime<Utc> {
    match NaiveTime::from_hms_opt(23, 59, 59) {
        Some(t) => date.and_time(t).and_utc(),
        None => day_start(date),
    }
}

/// Complete a hunt's booking: persist plan and dates on the hunt, merge the
/// payload into its contract, and rematerialize the bill.
pub async fn complete_booking(
    pool: &PgPool,
    cache: &AppCache,
    hunt_id: Uuid,
    input: BookingInput,
) -> Result<(Hunt, HuntContract)> {
    let hunt = db::queries::get_hunt(pool, hunt_id).await?;

    let items = pricing::services::load_catalog(pool, cache, hunt.outfitter_id).await?;
    let plan = items
        .iter()
        .find(|i| i.id == input.pricing_item_id)
        .ok_or(AppError::NotFound("pricing item"))?;

    let window = seasons::resolve_window(pool, cache, &hunt).await;
    validate_booking(plan, &input, window)?;

    let hunt = db::queries::update_hunt_booking(
        pool,
        hunt.id,
        plan.id,
        day_start(input.start_date),
        day_end(input.end_date),
    )
    .await?;

    // The contract normally exists by the time booking completes; create it
    // here if the tag-confirmation event never fired.
    let contract = match queries::find_contract_by_hunt(pool, hunt.id).await? {
        Some(contract) => contract,
        None => lifecycle::auto_create_for_hunt(pool, &hunt).await?,
    };

    let mut payload = contract.completion();
    payload.quantities = input.quantities;
    payload.start_date = Some(input.start_date);
    payload.end_date = Some(input.end_date);

    let rates = catalog::resolve_addon_rates(&items);
    let bill = calculators::compute_bill(plan.amount, &plan.title, &rates, &payload.quantities);
    let content = materializer::patch_content(&contract.content, &bill.text);

    let contract = queries::store_booking(
        pool,
        contract.id,
        plan.id,
        &payload.to_value(),
        &content,
        calculators::to_cents(bill.guide_fee),
        calculators::to_cents(bill.addons_total),
        calculators::to_cents(bill.total),
    )
    .await?;

    info!(
        "Booking complete for hunt {}: plan {:?}, {} to {}",
        hunt.id, plan.title, input.start_date, input.end_date
    );
    Ok((hunt, contract))
}
