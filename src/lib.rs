//! HuntWorks outfitter operations backend.
//!
//! Contract lifecycle, booking completion, and pricing for guided hunts,
//! served as a JSON API over a shared PostgreSQL store.

pub mod cache;
pub mod contracts;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod pricing;
pub mod seasons;

use sqlx::PgPool;

use cache::AppCache;

/// Shared application state for route handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
