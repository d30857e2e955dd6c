//! Trip requests: travellers announcing a trip they would like to join

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{OptionId, UserId};

pub type TripRequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub id: TripRequestId,
    pub owner_id: UserId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_max: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub travel_styles: Vec<OptionId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequestPayload {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_max: u32,
    pub description: String,
    pub travel_styles: Vec<OptionId>,
}
