//! In-memory caching using moka
//!
//! Provides application-level caching for outfitter pricing catalogs and
//! hunt-code season windows. Season windows are regulatory data that changes
//! at most yearly, so aggressive TTLs are used.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::models::SeasonWindow;
use crate::pricing::PricingItem;

/// Application cache holding pricing catalogs and season windows
#[derive(Clone)]
pub struct AppCache {
    /// Pricing catalogs (outfitter id -> catalog items)
    pub catalogs: Cache<Uuid, Arc<Vec<PricingItem>>>,
    /// Season windows (hunt code -> window)
    pub seasons: Cache<String, Arc<SeasonWindow>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Catalogs: 500 outfitters, 10 min TTL so rate edits show up quickly
            catalogs: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),

            // Season windows: 2000 hunt codes, 12 hour TTL (rarely changes)
            seasons: Cache::builder()
                .max_capacity(2000)
                .time_to_live(Duration::from_secs(12 * 60 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            catalogs_size: self.catalogs.entry_count(),
            seasons_size: self.seasons.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.catalogs.invalidate_all();
        self.seasons.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate one outfitter's catalog after a pricing edit
    pub async fn invalidate_catalog(&self, outfitter_id: Uuid) {
        self.catalogs.invalidate(&outfitter_id).await;
        info!("Catalog cache invalidated for outfitter: {}", outfitter_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub catalogs_size: u64,
    pub seasons_size: u64,
}

/// Start background cache warmer
///
/// Warms the season-window cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh every 10 minutes
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with commonly accessed data
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::get_all_season_windows(db).await {
        Ok(windows) => {
            for window in windows {
                cache
                    .seasons
                    .insert(window.hunt_code.clone(), Arc::new(window))
                    .await;
            }
        }
        Err(e) => warn!("Failed to warm season-window cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
