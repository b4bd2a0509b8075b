//! Request DTOs for contract API endpoints.
//!
//! Client submission payloads are accepted as raw JSON and parsed
//! tolerantly (see `CompletionPayload::from_value`); the DTOs here cover
//! the strictly typed endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::pricing::AddonQuantities;

use super::booking::BookingInput;

/// Request to complete a hunt booking
#[derive(Debug, Deserialize)]
pub struct CompleteBookingRequest {
    pub pricing_item_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub extra_days: i64,
    #[serde(default)]
    pub extra_non_hunters: i64,
    #[serde(default)]
    pub extra_spotters: i64,
    #[serde(default)]
    pub rifle_rental: i64,
}

impl CompleteBookingRequest {
    /// Clamp quantities and assemble the service input
    pub fn into_input(self) -> BookingInput {
        BookingInput {
            pricing_item_id: self.pricing_item_id,
            start_date: self.start_date,
            end_date: self.end_date,
            quantities: AddonQuantities {
                extra_days: self.extra_days.max(0) as u32,
                extra_non_hunters: self.extra_non_hunters.max(0) as u32,
                extra_spotters: self.extra_spotters.max(0) as u32,
                rifle_rental: self.rifle_rental.max(0) as u32,
            },
        }
    }
}

/// Request to record a tag-status change (draw-result or tag-purchase intake)
#[derive(Debug, Deserialize)]
pub struct TagStatusRequest {
    pub tag_status: String,
}

/// Request to record a signature
#[derive(Debug, Deserialize)]
pub struct SignContractRequest {
    pub signer: String,
}

/// Request to run a repair pass
#[derive(Debug, Default, Deserialize)]
pub struct RepairRequest {
    #[serde(default)]
    pub outfitter_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_request_clamps_negative_quantities() {
        let request = CompleteBookingRequest {
            pricing_item_id: Uuid::new_v4(),
            start_date: "2025-09-01".parse().unwrap(),
            end_date: "2025-09-07".parse().unwrap(),
            extra_days: -2,
            extra_non_hunters: 1,
            extra_spotters: 0,
            rifle_rental: -1,
        };
        let input = request.into_input();
        assert_eq!(input.quantities.extra_days, 0);
        assert_eq!(input.quantities.extra_non_hunters, 1);
        assert_eq!(input.quantities.rifle_rental, 0);
    }
}
