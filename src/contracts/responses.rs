//! Response DTOs for contract API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Hunt;
use crate::pricing::{AddonRates, PricingItem};

use super::models::HuntContract;

/// Contract as returned to API callers
#[derive(Debug, Serialize)]
pub struct ContractResponse {
    pub id: Uuid,
    pub hunt_id: Option<Uuid>,
    pub client_email: String,
    pub status: String,
    pub needs_complete_booking: bool,
    pub content: String,
    pub pricing_item_id: Option<Uuid>,
    pub guide_fee_cents: i64,
    pub addons_cents: i64,
    pub total_cents: i64,
    pub client_completed_at: Option<DateTime<Utc>>,
    pub client_signed_at: Option<DateTime<Utc>>,
    pub admin_signed_at: Option<DateTime<Utc>>,
}

impl ContractResponse {
    pub fn from_contract(contract: &HuntContract) -> Self {
        Self {
            id: contract.id,
            hunt_id: contract.hunt_id,
            client_email: contract.client_email.clone(),
            status: contract.status.clone(),
            needs_complete_booking: contract.needs_complete_booking(),
            content: contract.content.clone(),
            pricing_item_id: contract.pricing_item_id,
            guide_fee_cents: contract.guide_fee_cents,
            addons_cents: contract.addons_cents,
            total_cents: contract.total_cents,
            client_completed_at: contract.client_completed_at,
            client_signed_at: contract.client_signed_at,
            admin_signed_at: contract.admin_signed_at,
        }
    }
}

/// Hunt summary embedded in contract listings
#[derive(Debug, Serialize)]
pub struct HuntSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub species: String,
    pub unit: String,
    pub weapon: String,
    pub tag_status: String,
    pub hunt_code: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl HuntSummaryResponse {
    pub fn from_hunt(hunt: &Hunt) -> Self {
        Self {
            id: hunt.id,
            title: hunt.title.clone(),
            species: hunt.species.clone(),
            unit: hunt.unit.clone(),
            weapon: hunt.weapon.clone(),
            tag_status: hunt.tag_status.clone(),
            hunt_code: hunt.hunt_code.clone(),
            start_at: hunt.start_at,
            end_at: hunt.end_at,
        }
    }
}

/// Guide-fee plan surfaced to clients who have not picked one yet
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub included_days: Option<i32>,
}

impl PlanResponse {
    pub fn from_item(item: &PricingItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            amount: item.amount,
            included_days: item.included_days,
        }
    }
}

/// One entry in the client contract listing
#[derive(Debug, Serialize)]
pub struct ClientContractResponse {
    pub contract: ContractResponse,
    pub hunt: Option<HuntSummaryResponse>,
    /// Current per-unit add-on rates (defaults fill unconfigured types)
    pub addon_rates: AddonRates,
    /// Catalog plan matching the hunt's species and weapon, offered when
    /// no plan has been selected yet
    pub suggested_plan: Option<PlanResponse>,
}

/// Response for booking completion
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub hunt: HuntSummaryResponse,
    pub contract: ContractResponse,
}

/// Response for tag-status intake
#[derive(Debug, Serialize)]
pub struct TagStatusResponse {
    pub hunt: HuntSummaryResponse,
    pub contract: Option<ContractResponse>,
}
