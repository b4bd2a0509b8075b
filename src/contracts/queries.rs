//! Database queries for hunt contracts.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::models::HuntContract;

/// Get a contract by id
pub async fn get_contract(pool: &PgPool, contract_id: Uuid) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        SELECT
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        FROM hunt_contracts
        WHERE id = $1
        "#,
    )
    .bind(contract_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("contract"))
}

/// Find the contract attached to a hunt, if one exists
pub async fn find_contract_by_hunt(pool: &PgPool, hunt_id: Uuid) -> Result<Option<HuntContract>> {
    let contract = sqlx::query_as::<_, HuntContract>(
        r#"
        SELECT
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        FROM hunt_contracts
        WHERE hunt_id = $1
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(hunt_id)
    .fetch_optional(pool)
    .await?;

    Ok(contract)
}

/// List a client's contracts by normalized email
pub async fn list_contracts_for_client(
    pool: &PgPool,
    client_email: &str,
) -> Result<Vec<HuntContract>> {
    let contracts = sqlx::query_as::<_, HuntContract>(
        r#"
        SELECT
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        FROM hunt_contracts
        WHERE LOWER(TRIM(client_email)) = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(client_email.trim().to_lowercase())
    .fetch_all(pool)
    .await?;

    Ok(contracts)
}

/// List contracts, optionally restricted to one outfitter (repair pass)
pub async fn list_contracts(
    pool: &PgPool,
    outfitter_id: Option<Uuid>,
) -> Result<Vec<HuntContract>> {
    let contracts = match outfitter_id {
        Some(outfitter) => {
            sqlx::query_as::<_, HuntContract>(
                r#"
                SELECT
                    id, outfitter_id, hunt_id, client_email, status, content,
                    pricing_item_id, guide_fee_cents, addons_cents, total_cents,
                    completion, client_completed_at, client_signed_at, admin_signed_at,
                    created_at, updated_at
                FROM hunt_contracts
                WHERE outfitter_id = $1
                ORDER BY created_at
                "#,
            )
            .bind(outfitter)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, HuntContract>(
                r#"
                SELECT
                    id, outfitter_id, hunt_id, client_email, status, content,
                    pricing_item_id, guide_fee_cents, addons_cents, total_cents,
                    completion, client_completed_at, client_signed_at, admin_signed_at,
                    created_at, updated_at
                FROM hunt_contracts
                ORDER BY created_at
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(contracts)
}

/// Insert a newly created contract
pub async fn insert_contract(
    pool: &PgPool,
    outfitter_id: Uuid,
    hunt_id: Option<Uuid>,
    client_email: &str,
    status: &str,
    content: &str,
) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        INSERT INTO hunt_contracts (
            id, outfitter_id, hunt_id, client_email, status, content,
            guide_fee_cents, addons_cents, total_cents, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, 0, 0, 0, NOW(), NOW())
        RETURNING
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(outfitter_id)
    .bind(hunt_id)
    .bind(client_email)
    .bind(status)
    .bind(content)
    .fetch_one(pool)
    .await
    .map_err(AppError::from)
}

/// Persist a validated client submission and advance to admin review
#[allow(clippy::too_many_arguments)]
pub async fn store_submission(
    pool: &PgPool,
    contract_id: Uuid,
    completion: &serde_json::Value,
    content: &str,
    guide_fee_cents: i64,
    addons_cents: i64,
    total_cents: i64,
    status: &str,
) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        UPDATE hunt_contracts
        SET completion = $2,
            content = $3,
            guide_fee_cents = $4,
            addons_cents = $5,
            total_cents = $6,
            status = $7,
            client_completed_at = NOW(),
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        "#,
    )
    .bind(contract_id)
    .bind(completion)
    .bind(content)
    .bind(guide_fee_cents)
    .bind(addons_cents)
    .bind(total_cents)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("contract"))
}

/// Persist booking-completion results on the contract
#[allow(clippy::too_many_arguments)]
pub async fn store_booking(
    pool: &PgPool,
    contract_id: Uuid,
    pricing_item_id: Uuid,
    completion: &serde_json::Value,
    content: &str,
    guide_fee_cents: i64,
    addons_cents: i64,
    total_cents: i64,
) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        UPDATE hunt_contracts
        SET pricing_item_id = $2,
            completion = $3,
            content = $4,
            guide_fee_cents = $5,
            addons_cents = $6,
            total_cents = $7,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        "#,
    )
    .bind(contract_id)
    .bind(pricing_item_id)
    .bind(completion)
    .bind(content)
    .bind(guide_fee_cents)
    .bind(addons_cents)
    .bind(total_cents)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("contract"))
}

/// Move a contract to a new status
pub async fn update_status(
    pool: &PgPool,
    contract_id: Uuid,
    status: &str,
) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        UPDATE hunt_contracts
        SET status = $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        "#,
    )
    .bind(contract_id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("contract"))
}

/// Record signature timestamps and the status derived from them
pub async fn record_signature(
    pool: &PgPool,
    contract_id: Uuid,
    client_signed_at: Option<DateTime<Utc>>,
    admin_signed_at: Option<DateTime<Utc>>,
    status: &str,
) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        UPDATE hunt_contracts
        SET client_signed_at = $2,
            admin_signed_at = $3,
            status = $4,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        "#,
    )
    .bind(contract_id)
    .bind(client_signed_at)
    .bind(admin_signed_at)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("contract"))
}

/// Rewrite a contract's content and stored bill amounts (repair pass)
pub async fn update_bill(
    pool: &PgPool,
    contract_id: Uuid,
    content: &str,
    guide_fee_cents: i64,
    addons_cents: i64,
    total_cents: i64,
) -> Result<HuntContract> {
    sqlx::query_as::<_, HuntContract>(
        r#"
        UPDATE hunt_contracts
        SET content = $2,
            guide_fee_cents = $3,
            addons_cents = $4,
            total_cents = $5,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, outfitter_id, hunt_id, client_email, status, content,
            pricing_item_id, guide_fee_cents, addons_cents, total_cents,
            completion, client_completed_at, client_signed_at, admin_signed_at,
            created_at, updated_at
        "#,
    )
    .bind(contract_id)
    .bind(content)
    .bind(guide_fee_cents)
    .bind(addons_cents)
    .bind(total_cents)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("contract"))
}
