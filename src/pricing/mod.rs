//! Pricing engine module.
//!
//! Catalog resolution and bill computation for hunt contracts. The matching
//! precedence and the bill math are pure; database access is confined to
//! `queries` and `services`.

pub mod calculators;
pub mod catalog;
pub mod models;
pub mod queries;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_bill, format_money, round_money, to_cents, AddonQuantities, Bill};
pub use catalog::{find_guide_fee_plan, resolve_addon_rates};
pub use models::{AddonRates, AddonType, PricingItem};
