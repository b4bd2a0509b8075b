//! Database queries for the pricing catalog.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

use super::models::PricingItem;

/// List an outfitter's active pricing catalog
pub async fn list_pricing_items(pool: &PgPool, outfitter_id: Uuid) -> Result<Vec<PricingItem>> {
    let items = sqlx::query_as::<_, PricingItem>(
        r#"
        SELECT
            id, outfitter_id, title, category, addon_type,
            amount, included_days, deleted_at
        FROM pricing_items
        WHERE outfitter_id = $1
          AND deleted_at IS NULL
        ORDER BY category, title
        "#,
    )
    .bind(outfitter_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Get one pricing item by id, scoped to an outfitter
pub async fn get_pricing_item(
    pool: &PgPool,
    outfitter_id: Uuid,
    item_id: Uuid,
) -> Result<Option<PricingItem>> {
    let item = sqlx::query_as::<_, PricingItem>(
        r#"
        SELECT
            id, outfitter_id, title, category, addon_type,
            amount, included_days, deleted_at
        FROM pricing_items
        WHERE id = $1
          AND outfitter_id = $2
          AND deleted_at IS NULL
        "#,
    )
    .bind(item_id)
    .bind(outfitter_id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}
