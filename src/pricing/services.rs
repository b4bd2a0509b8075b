//! Pricing service functions with database access.
//!
//! Cache-aside loading of outfitter catalogs; the matching rules themselves
//! live in `catalog` and stay pure.

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::Result;

use super::catalog;
use super::models::{AddonRates, PricingItem};
use super::queries;

/// Load an outfitter's pricing catalog through the cache.
pub async fn load_catalog(
    pool: &PgPool,
    cache: &AppCache,
    outfitter_id: Uuid,
) -> Result<Arc<Vec<PricingItem>>> {
    if let Some(cached) = cache.catalogs.get(&outfitter_id).await {
        tracing::debug!("Cache HIT for catalog: {}", outfitter_id);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for catalog: {}", outfitter_id);
    let items = Arc::new(queries::list_pricing_items(pool, outfitter_id).await?);
    cache.catalogs.insert(outfitter_id, items.clone()).await;
    Ok(items)
}

/// Resolve the add-on rate card for an outfitter (defaults fill any gaps).
pub async fn addon_rates_for_outfitter(
    pool: &PgPool,
    cache: &AppCache,
    outfitter_id: Uuid,
) -> Result<AddonRates> {
    let items = load_catalog(pool, cache, outfitter_id).await?;
    Ok(catalog::resolve_addon_rates(&items))
}
