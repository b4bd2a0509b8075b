//! Contract route handlers

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::identity::ClientIdentity;
use crate::pricing;
use crate::AppState;

use super::booking;
use super::lifecycle;
use super::materializer::{self, RepairSummary};
use super::models::SignerRole;
use super::queries;
use super::requests::{CompleteBookingRequest, RepairRequest, SignContractRequest, TagStatusRequest};
use super::responses::{
    BookingResponse, ClientContractResponse, ContractResponse, HuntSummaryResponse, PlanResponse,
    TagStatusResponse,
};

/// Build the contract API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/client/contracts", get(list_for_client))
        .route("/api/client/contracts/:id/submit", post(submit))
        .route("/api/hunts/:id/complete-booking", post(complete_booking))
        .route("/api/hunts/:id/tag-status", post(tag_status))
        .route("/api/contracts/:id/approve", post(approve))
        .route("/api/contracts/:id/send", post(send_for_signature))
        .route("/api/contracts/:id/sign", post(sign))
        .route("/api/admin/contracts/repair", post(repair))
}

/// List the authenticated client's contracts with hunt summaries and the
/// current add-on rate snapshot
async fn list_for_client(
    State(state): State<AppState>,
    ClientIdentity(email): ClientIdentity,
) -> Result<Json<Vec<ClientContractResponse>>> {
    let contracts = queries::list_contracts_for_client(&state.db, &email).await?;

    let mut out = Vec::with_capacity(contracts.len());
    for contract in contracts {
        // Read-repair: bring stored bill text and totals up to current rates.
        // A failed repair falls back to the stored row rather than failing
        // the whole listing.
        let contract =
            match materializer::repair_contract(&state.db, &state.cache, &contract).await {
                Ok(repaired) => repaired,
                Err(e) => {
                    warn!("Read-repair failed for contract {}: {}", contract.id, e);
                    contract
                }
            };

        let hunt = match contract.hunt_id {
            Some(hunt_id) => db::queries::get_hunt(&state.db, hunt_id).await.ok(),
            None => None,
        };

        let items =
            pricing::services::load_catalog(&state.db, &state.cache, contract.outfitter_id)
                .await?;
        let addon_rates = pricing::resolve_addon_rates(&items);
        let suggested_plan = match (&hunt, contract.pricing_item_id) {
            (Some(h), None) => pricing::find_guide_fee_plan(&items, &h.species, &h.weapon)
                .map(PlanResponse::from_item),
            _ => None,
        };

        out.push(ClientContractResponse {
            contract: ContractResponse::from_contract(&contract),
            hunt: hunt.as_ref().map(HuntSummaryResponse::from_hunt),
            addon_rates,
            suggested_plan,
        });
    }

    Ok(Json(out))
}

/// Client submits their completed contract
async fn submit(
    State(state): State<AppState>,
    ClientIdentity(email): ClientIdentity,
    Path(contract_id): Path<Uuid>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ContractResponse>> {
    let contract =
        lifecycle::submit_completion(&state.db, &state.cache, contract_id, &email, &payload)
            .await?;
    Ok(Json(ContractResponse::from_contract(&contract)))
}

/// Complete a hunt's booking (plan, dates, add-on quantities)
async fn complete_booking(
    State(state): State<AppState>,
    Path(hunt_id): Path<Uuid>,
    Json(request): Json<CompleteBookingRequest>,
) -> Result<Json<BookingResponse>> {
    let (hunt, contract) =
        booking::complete_booking(&state.db, &state.cache, hunt_id, request.into_input()).await?;
    Ok(Json(BookingResponse {
        hunt: HuntSummaryResponse::from_hunt(&hunt),
        contract: ContractResponse::from_contract(&contract),
    }))
}

/// Draw-result / tag-purchase intake hook
async fn tag_status(
    State(state): State<AppState>,
    Path(hunt_id): Path<Uuid>,
    Json(request): Json<TagStatusRequest>,
) -> Result<Json<TagStatusResponse>> {
    let (hunt, contract) =
        lifecycle::record_tag_status(&state.db, hunt_id, &request.tag_status).await?;
    Ok(Json(TagStatusResponse {
        hunt: HuntSummaryResponse::from_hunt(&hunt),
        contract: contract.as_ref().map(ContractResponse::from_contract),
    }))
}

/// Admin approves a reviewed contract for signature
async fn approve(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> Result<Json<ContractResponse>> {
    let contract = lifecycle::approve(&state.db, contract_id).await?;
    Ok(Json(ContractResponse::from_contract(&contract)))
}

/// Hand an approved contract to the signature channel
async fn send_for_signature(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> Result<Json<ContractResponse>> {
    let contract = lifecycle::send_for_signature(&state.db, contract_id).await?;
    Ok(Json(ContractResponse::from_contract(&contract)))
}

/// Record a signature from the channel callback
async fn sign(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
    Json(request): Json<SignContractRequest>,
) -> Result<Json<ContractResponse>> {
    let role = SignerRole::parse(&request.signer)
        .ok_or_else(|| AppError::validation(format!("Unknown signer role {:?}", request.signer)))?;
    let contract = lifecycle::record_signature(&state.db, &state.cache, contract_id, role).await?;
    Ok(Json(ContractResponse::from_contract(&contract)))
}

/// Batch repair pass over stored contracts
async fn repair(
    State(state): State<AppState>,
    request: Option<Json<RepairRequest>>,
) -> Result<Json<RepairSummary>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let summary =
        materializer::repair_all(&state.db, &state.cache, request.outfitter_id).await?;
    Ok(Json(summary))
}
