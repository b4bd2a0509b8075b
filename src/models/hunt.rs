//! Hunt and season-window models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Tag status lifecycle for a hunt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStatus {
    Pending,
    Applied,
    Drawn,
    Unsuccessful,
    Confirmed,
}

impl TagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagStatus::Pending => "pending",
            TagStatus::Applied => "applied",
            TagStatus::Drawn => "drawn",
            TagStatus::Unsuccessful => "unsuccessful",
            TagStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<TagStatus> {
        match s {
            "pending" => Some(TagStatus::Pending),
            "applied" => Some(TagStatus::Applied),
            "drawn" => Some(TagStatus::Drawn),
            "unsuccessful" => Some(TagStatus::Unsuccessful),
            "confirmed" => Some(TagStatus::Confirmed),
            _ => None,
        }
    }

    /// Statuses that trigger contract auto-creation
    pub fn triggers_contract(&self) -> bool {
        matches!(self, TagStatus::Drawn | TagStatus::Confirmed)
    }
}

/// Scheduled hunt from hunts
#[derive(Debug, Clone, FromRow)]
pub struct Hunt {
    pub id: Uuid,
    pub outfitter_id: Uuid,
    pub title: String,
    pub species: String,
    pub unit: String,
    pub weapon: String,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub hunt_code: Option<String>,
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub private_land_tag_id: Option<Uuid>,
    pub client_email: Option<String>,
    pub tag_status: String,
    pub pricing_item_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Hunt {
    pub fn tag_status(&self) -> Option<TagStatus> {
        TagStatus::parse(&self.tag_status)
    }

    /// Season window stored directly on the hunt, when both ends are present
    pub fn stored_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Booked dates as calendar days, when both ends are present
    pub fn booked_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => Some((start.date_naive(), end.date_naive())),
            _ => None,
        }
    }
}

/// Regulatory season window from season_windows, keyed by hunt code
#[derive(Debug, Clone, FromRow)]
pub struct SeasonWindow {
    pub hunt_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
