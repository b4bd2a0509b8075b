//! Season-window resolution for hunts.
//!
//! A hunt's window comes from its stored window fields when present, else
//! from the season lookup by hunt code. Lookup failures and timeouts degrade
//! to "window unknown" so a slow or missing season source never blocks a
//! booking or submission; callers then skip window validation.

use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::cache::AppCache;
use crate::db::queries;
use crate::models::Hunt;

/// Upper bound on a season lookup before degrading to "unknown"
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Resolve the season window constraining a hunt, if any.
pub async fn resolve_window(
    pool: &PgPool,
    cache: &AppCache,
    hunt: &Hunt,
) -> Option<(NaiveDate, NaiveDate)> {
    if let Some(window) = hunt.stored_window() {
        return Some(window);
    }

    let hunt_code = hunt.hunt_code.as_deref()?;
    lookup_by_code(pool, cache, hunt_code).await
}

/// Cache-aside season lookup by hunt code with a bounded timeout.
pub async fn lookup_by_code(
    pool: &PgPool,
    cache: &AppCache,
    hunt_code: &str,
) -> Option<(NaiveDate, NaiveDate)> {
    if let Some(cached) = cache.seasons.get(hunt_code).await {
        return Some((cached.start_date, cached.end_date));
    }

    match tokio::time::timeout(LOOKUP_TIMEOUT, queries::find_season_window(pool, hunt_code)).await
    {
        Ok(Ok(Some(window))) => {
            let dates = (window.start_date, window.end_date);
            cache
                .seasons
                .insert(hunt_code.to_string(), Arc::new(window))
                .await;
            Some(dates)
        }
        Ok(Ok(None)) => None,
        Ok(Err(e)) => {
            warn!("Season lookup failed for hunt code {}: {}", hunt_code, e);
            None
        }
        Err(_) => {
            warn!(
                "Season lookup timed out for hunt code {} after {:?}",
                hunt_code, LOOKUP_TIMEOUT
            );
            None
        }
    }
}
