//! Database queries for hunts and season windows

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Hunt, SeasonWindow};

/// Get a hunt by id
pub async fn get_hunt(pool: &PgPool, hunt_id: Uuid) -> Result<Hunt> {
    sqlx::query_as::<_, Hunt>(
        r#"
        SELECT
            id, outfitter_id, title, species, unit, weapon,
            start_at, end_at, hunt_code, window_start, window_end,
            private_land_tag_id, client_email, tag_status, pricing_item_id, deleted_at
        FROM hunts
        WHERE id = $1
          AND deleted_at IS NULL
        "#,
    )
    .bind(hunt_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("hunt"))
}

/// Record a tag-status change on a hunt
pub async fn update_tag_status(pool: &PgPool, hunt_id: Uuid, tag_status: &str) -> Result<Hunt> {
    sqlx::query_as::<_, Hunt>(
        r#"
        UPDATE hunts
        SET tag_status = $2
        WHERE id = $1
          AND deleted_at IS NULL
        RETURNING
            id, outfitter_id, title, species, unit, weapon,
            start_at, end_at, hunt_code, window_start, window_end,
            private_land_tag_id, client_email, tag_status, pricing_item_id, deleted_at
        "#,
    )
    .bind(hunt_id)
    .bind(tag_status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("hunt"))
}

/// Persist a hunt's chosen guide-fee plan and booked date range
pub async fn update_hunt_booking(
    pool: &PgPool,
    hunt_id: Uuid,
    pricing_item_id: Uuid,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Result<Hunt> {
    sqlx::query_as::<_, Hunt>(
        r#"
        UPDATE hunts
        SET pricing_item_id = $2,
            start_at = $3,
            end_at = $4
        WHERE id = $1
          AND deleted_at IS NULL
        RETURNING
            id, outfitter_id, title, species, unit, weapon,
            start_at, end_at, hunt_code, window_start, window_end,
            private_land_tag_id, client_email, tag_status, pricing_item_id, deleted_at
        "#,
    )
    .bind(hunt_id)
    .bind(pricing_item_id)
    .bind(start_at)
    .bind(end_at)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("hunt"))
}

/// Look up a regulatory season window by hunt code
pub async fn find_season_window(pool: &PgPool, hunt_code: &str) -> Result<Option<SeasonWindow>> {
    let window = sqlx::query_as::<_, SeasonWindow>(
        r#"
        SELECT hunt_code, start_date, end_date
        FROM season_windows
        WHERE hunt_code = $1
        "#,
    )
    .bind(hunt_code)
    .fetch_optional(pool)
    .await?;

    Ok(window)
}

/// Get all season windows (for cache warming)
pub async fn get_all_season_windows(pool: &PgPool) -> Result<Vec<SeasonWindow>> {
    let windows = sqlx::query_as::<_, SeasonWindow>(
        r#"
        SELECT hunt_code, start_date, end_date
        FROM season_windows
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(windows)
}
