//! Hunt contract models and status machine data.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::AddonQuantities;

/// Contract status lifecycle.
///
/// `fully_executed` is exactly "both signature timestamps present"; signature
/// recording derives the status from the timestamps so the two never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Draft,
    PendingClientCompletion,
    PendingAdminReview,
    ReadyForSignature,
    SentToDocusign,
    ClientSigned,
    AdminSigned,
    FullyExecuted,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::PendingClientCompletion => "pending_client_completion",
            ContractStatus::PendingAdminReview => "pending_admin_review",
            ContractStatus::ReadyForSignature => "ready_for_signature",
            ContractStatus::SentToDocusign => "sent_to_docusign",
            ContractStatus::ClientSigned => "client_signed",
            ContractStatus::AdminSigned => "admin_signed",
            ContractStatus::FullyExecuted => "fully_executed",
        }
    }

    pub fn parse(s: &str) -> Option<ContractStatus> {
        match s {
            "draft" => Some(ContractStatus::Draft),
            "pending_client_completion" => Some(ContractStatus::PendingClientCompletion),
            "pending_admin_review" => Some(ContractStatus::PendingAdminReview),
            "ready_for_signature" => Some(ContractStatus::ReadyForSignature),
            "sent_to_docusign" => Some(ContractStatus::SentToDocusign),
            "client_signed" => Some(ContractStatus::ClientSigned),
            "admin_signed" => Some(ContractStatus::AdminSigned),
            "fully_executed" => Some(ContractStatus::FullyExecuted),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Party recording a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerRole {
    Client,
    Admin,
}

impl SignerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerRole::Client => "client",
            SignerRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<SignerRole> {
        match s {
            "client" => Some(SignerRole::Client),
            "admin" => Some(SignerRole::Admin),
            _ => None,
        }
    }
}

/// Derive the post-signature status from which timestamps are present.
pub fn signature_status(
    client_signed_at: Option<DateTime<Utc>>,
    admin_signed_at: Option<DateTime<Utc>>,
) -> ContractStatus {
    match (client_signed_at, admin_signed_at) {
        (Some(_), Some(_)) => ContractStatus::FullyExecuted,
        (Some(_), None) => ContractStatus::ClientSigned,
        (None, Some(_)) => ContractStatus::AdminSigned,
        (None, None) => ContractStatus::SentToDocusign,
    }
}

/// Client-submitted completion data embedded in a contract.
///
/// Read tolerantly from stored JSON: quantities clamp to non-negative
/// integers, malformed dates read as unset, a missing payload reads as
/// the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionPayload {
    pub quantities: AddonQuantities,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub acknowledged: bool,
}

impl CompletionPayload {
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self {
            quantities: AddonQuantities::from_json(value),
            start_date: read_date(value, "start_date"),
            end_date: read_date(value, "end_date"),
            acknowledged: value
                .get("acknowledged")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "extra_days": self.quantities.extra_days,
            "extra_non_hunters": self.quantities.extra_non_hunters,
            "extra_spotters": self.quantities.extra_spotters,
            "rifle_rental": self.quantities.rifle_rental,
            "start_date": self.start_date,
            "end_date": self.end_date,
            "acknowledged": self.acknowledged,
        })
    }

    /// Client-chosen date range, when both ends are present
    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

fn read_date(value: &serde_json::Value, key: &str) -> Option<NaiveDate> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| s.trim().parse().ok())
}

/// Hunt contract from hunt_contracts
#[derive(Debug, Clone, FromRow)]
pub struct HuntContract {
    pub id: Uuid,
    pub outfitter_id: Uuid,
    pub hunt_id: Option<Uuid>,
    pub client_email: String,
    pub status: String,
    pub content: String,
    pub pricing_item_id: Option<Uuid>,
    pub guide_fee_cents: i64,
    pub addons_cents: i64,
    pub total_cents: i64,
    pub completion: Option<serde_json::Value>,
    pub client_completed_at: Option<DateTime<Utc>>,
    pub client_signed_at: Option<DateTime<Utc>>,
    pub admin_signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HuntContract {
    pub fn status(&self) -> Option<ContractStatus> {
        ContractStatus::parse(&self.status)
    }

    /// Parse the stored completion payload (default when missing)
    pub fn completion(&self) -> CompletionPayload {
        self.completion
            .as_ref()
            .map(CompletionPayload::from_value)
            .unwrap_or_default()
    }

    /// Derived on every read, never stored: the contract still needs a
    /// guide-fee plan or a complete client-chosen date range.
    ///
    /// A contract with this flag true is not signable.
    pub fn needs_complete_booking(&self) -> bool {
        let completion = self.completion();
        self.pricing_item_id.is_none()
            || completion.start_date.is_none()
            || completion.end_date.is_none()
    }

    /// Case-insensitive ownership check against an authenticated client email
    pub fn owned_by(&self, client_email: &str) -> bool {
        self.client_email
            .trim()
            .eq_ignore_ascii_case(client_email.trim())
    }
}
