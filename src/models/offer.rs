//! Offers to join a trip vacancy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserId, VacancyId};

pub type OfferId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl OfferStatus {
    #[must_use]
    pub fn is_final(self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub vacancy_id: VacancyId,
    pub sender_id: UserId,
    pub message: String,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferPayload {
    pub vacancy_id: VacancyId,
    pub message: String,
}
