//! Contract lifecycle state machine.
//!
//! Owns the contract status field and enforces legal transitions:
//! auto-creation on tag confirmation, client submission, admin approval,
//! signature handoff, and execution. Transition rules are pure functions;
//! the async wrappers do the record-store I/O.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Hunt, TagStatus};
use crate::pricing::{calculators, AddonQuantities, AddonRates};
use crate::seasons;

use super::materializer;
use super::models::{
    signature_status, CompletionPayload, ContractStatus, HuntContract, SignerRole,
};
use super::queries;

/// Whether a tag-status change should create a contract for this hunt.
///
/// The existence check makes retried and double-fired intake events
/// idempotent: one hunt, one contract.
pub fn should_create_contract(hunt: &Hunt, existing: Option<&HuntContract>) -> bool {
    existing.is_none()
        && hunt
            .tag_status()
            .map(|s| s.triggers_contract())
            .unwrap_or(false)
}

/// Render the initial contract body: prose preamble plus a zero bill.
pub fn render_initial_content(hunt: &Hunt) -> String {
    let mut out = String::new();
    out.push_str("HUNT CONTRACT\n\n");
    out.push_str(&format!("Hunt: {}\n", hunt.title));
    out.push_str(&format!(
        "Species: {} | Unit: {} | Weapon: {}\n",
        hunt.species, hunt.unit, hunt.weapon
    ));
    if let Some(email) = hunt.client_email.as_deref() {
        out.push_str(&format!("Client: {}\n", email));
    }
    if let Some(code) = hunt.hunt_code.as_deref() {
        out.push_str(&format!("Hunt Code: {}\n", code));
    }
    out.push('\n');

    let bill = calculators::compute_bill(
        Decimal::ZERO,
        "Guide Fee",
        &AddonRates::default(),
        &AddonQuantities::default(),
    );
    out.push_str(&bill.text);
    out
}

fn require_status(contract: &HuntContract, expected: ContractStatus) -> Result<()> {
    match contract.status() {
        Some(s) if s == expected => Ok(()),
        Some(other) => Err(AppError::conflict(other.as_str())),
        None => Err(AppError::Internal(format!(
            "contract {} has unrecognized status {:?}",
            contract.id, contract.status
        ))),
    }
}

/// Validate a date range against an optional season window.
pub fn check_window(
    start: NaiveDate,
    end: NaiveDate,
    window: Option<(NaiveDate, NaiveDate)>,
) -> Result<()> {
    if start > end {
        return Err(AppError::validation_with(
            format!("Hunt start date {start} is after end date {end}"),
            serde_json::json!({ "start_date": start, "end_date": end }),
        ));
    }
    if let Some((window_start, window_end)) = window {
        if start < window_start || end > window_end {
            return Err(AppError::validation_with(
                format!(
                    "Hunt dates {start} to {end} fall outside the season window {window_start} to {window_end}"
                ),
                serde_json::json!({
                    "start_date": start,
                    "end_date": end,
                    "window_start": window_start,
                    "window_end": window_end,
                }),
            ));
        }
    }
    Ok(())
}

/// Validate a client submission; returns the resolved date range.
///
/// Dates come from the submission payload first, else from the linked hunt
/// record. Window violations are validation failures, never silent clamps.
pub fn validate_submission(
    contract: &HuntContract,
    hunt: Option<&Hunt>,
    payload: &CompletionPayload,
    window: Option<(NaiveDate, NaiveDate)>,
) -> Result<(NaiveDate, NaiveDate)> {
    require_status(contract, ContractStatus::PendingClientCompletion)?;

    if !payload.acknowledged {
        return Err(AppError::validation(
            "Contract terms must be acknowledged before submission",
        ));
    }

    let (start, end) = payload
        .dates()
        .or_else(|| hunt.and_then(|h| h.booked_dates()))
        .ok_or_else(|| {
            AppError::validation(
                "Hunt start and end dates could not be resolved from the submission or the hunt record",
            )
        })?;

    check_window(start, end, window)?;
    Ok((start, end))
}

/// Validate a signature recording; returns the timestamps and derived status.
pub fn validate_signature(
    contract: &HuntContract,
    role: SignerRole,
    now: DateTime<Utc>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>, ContractStatus)> {
    let status = match contract.status() {
        Some(s) => s,
        None => {
            return Err(AppError::Internal(format!(
                "contract {} has unrecognized status {:?}",
                contract.id, contract.status
            )))
        }
    };

    if !matches!(
        status,
        ContractStatus::SentToDocusign | ContractStatus::ClientSigned | ContractStatus::AdminSigned
    ) {
        return Err(AppError::conflict(status.as_str()));
    }

    if contract.needs_complete_booking() {
        return Err(AppError::validation(
            "Contract cannot be signed until a guide-fee plan and hunt dates are selected",
        ));
    }

    let (client_at, admin_at) = match role {
        SignerRole::Client => {
            if contract.client_signed_at.is_some() {
                return Err(AppError::conflict(status.as_str()));
            }
            (Some(now), contract.admin_signed_at)
        }
        SignerRole::Admin => {
            if contract.admin_signed_at.is_some() {
                return Err(AppError::conflict(status.as_str()));
            }
            (contract.client_signed_at, Some(now))
        }
    };

    Ok((client_at, admin_at, signature_status(client_at, admin_at)))
}

/// Create the contract for a hunt if none exists yet (idempotent).
pub async fn auto_create_for_hunt(pool: &PgPool, hunt: &Hunt) -> Result<HuntContract> {
    // Pre-insert existence check immediately before insert
    if let Some(existing) = queries::find_contract_by_hunt(pool, hunt.id).await? {
        debug!(
            "Contract {} already exists for hunt {}, skipping create",
            existing.id, hunt.id
        );
        return Ok(existing);
    }

    let client_email = hunt
        .client_email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            AppError::validation(format!(
                "Hunt {} has no client email on file; cannot create a contract",
                hunt.id
            ))
        })?;

    let content = render_initial_content(hunt);
    let contract = queries::insert_contract(
        pool,
        hunt.outfitter_id,
        Some(hunt.id),
        &client_email,
        ContractStatus::PendingClientCompletion.as_str(),
        &content,
    )
    .await?;

    info!("Auto-created contract {} for hunt {}", contract.id, hunt.id);
    Ok(contract)
}

/// Record a tag-status change and auto-create the contract when it becomes
/// drawn or confirmed.
pub async fn record_tag_status(
    pool: &PgPool,
    hunt_id: Uuid,
    raw_status: &str,
) -> Result<(Hunt, Option<HuntContract>)> {
    let status = TagStatus::parse(raw_status)
        .ok_or_else(|| AppError::validation(format!("Unknown tag status {raw_status:?}")))?;

    let hunt = db::queries::update_tag_status(pool, hunt_id, status.as_str()).await?;

    let contract = if status.triggers_contract() {
        Some(auto_create_for_hunt(pool, &hunt).await?)
    } else {
        None
    };

    Ok((hunt, contract))
}

/// Client submission: validate, recompute the bill, store the payload, and
/// advance to admin review.
pub async fn submit_completion(
    pool: &PgPool,
    cache: &AppCache,
    contract_id: Uuid,
    client_email: &str,
    raw_payload: &serde_json::Value,
) -> Result<HuntContract> {
    let contract = queries::get_contract(pool, contract_id).await?;
    if !contract.owned_by(client_email) {
        return Err(AppError::Ownership);
    }

    let hunt = match contract.hunt_id {
        Some(id) => Some(db::queries::get_hunt(pool, id).await?),
        None => None,
    };

    let window = match &hunt {
        Some(h) => seasons::resolve_window(pool, cache, h).await,
        None => None,
    };

    let mut payload = CompletionPayload::from_value(raw_payload);
    let (start, end) = validate_submission(&contract, hunt.as_ref(), &payload, window)?;
    payload.start_date = Some(start);
    payload.end_date = Some(end);

    let bill = materializer::compute_current_bill(pool, cache, &contract, &payload).await?;
    let content = materializer::patch_content(&contract.content, &bill.text);

    let contract = queries::store_submission(
        pool,
        contract.id,
        &payload.to_value(),
        &content,
        calculators::to_cents(bill.guide_fee),
        calculators::to_cents(bill.addons_total),
        calculators::to_cents(bill.total),
        ContractStatus::PendingAdminReview.as_str(),
    )
    .await?;

    info!("Contract {} submitted for admin review", contract.id);
    Ok(contract)
}

/// Admin approval: `pending_admin_review` to `ready_for_signature`.
pub async fn approve(pool: &PgPool, contract_id: Uuid) -> Result<HuntContract> {
    let contract = queries::get_contract(pool, contract_id).await?;
    require_status(&contract, ContractStatus::PendingAdminReview)?;

    if contract.needs_complete_booking() {
        return Err(AppError::validation(
            "Contract cannot be approved for signature until a guide-fee plan and hunt dates are selected",
        ));
    }

    let contract =
        queries::update_status(pool, contract.id, ContractStatus::ReadyForSignature.as_str())
            .await?;
    info!("Contract {} approved for signature", contract.id);
    Ok(contract)
}

/// Signature handoff: `ready_for_signature` to `sent_to_docusign`.
pub async fn send_for_signature(pool: &PgPool, contract_id: Uuid) -> Result<HuntContract> {
    let contract = queries::get_contract(pool, contract_id).await?;
    require_status(&contract, ContractStatus::ReadyForSignature)?;

    let contract =
        queries::update_status(pool, contract.id, ContractStatus::SentToDocusign.as_str()).await?;
    info!("Contract {} handed to signature channel", contract.id);
    Ok(contract)
}

/// Record a signature from either party, deriving the resulting status.
pub async fn record_signature(
    pool: &PgPool,
    cache: &AppCache,
    contract_id: Uuid,
    role: SignerRole,
) -> Result<HuntContract> {
    let contract = queries::get_contract(pool, contract_id).await?;
    let (client_at, admin_at, status) = validate_signature(&contract, role, Utc::now())?;

    let contract =
        queries::record_signature(pool, contract.id, client_at, admin_at, status.as_str()).await?;

    if status == ContractStatus::FullyExecuted {
        // Final guide-fee billing: the executed copy and stored totals must
        // reflect the rates in force at execution time.
        let contract = materializer::repair_contract(pool, cache, &contract).await?;
        info!(
            "Contract {} fully executed; final total {} cents",
            contract.id, contract.total_cents
        );
        return Ok(contract);
    }

    info!(
        "Recorded {} signature on contract {}",
        role.as_str(),
        contract.id
    );
    Ok(contract)
}
