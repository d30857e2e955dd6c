//! Trip vacancies: trips posted by travellers looking for companions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{OptionId, UserId};

pub type VacancyId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacancyStatus {
    Open,
    Full,
    Closed,
}

/// Which companions the organiser is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderPreference {
    #[default]
    Any,
    Male,
    Female,
}

impl GenderPreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GenderPreference::Any => "any",
            GenderPreference::Male => "male",
            GenderPreference::Female => "female",
        }
    }
}

impl std::str::FromStr for GenderPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(GenderPreference::Any),
            "male" => Ok(GenderPreference::Male),
            "female" => Ok(GenderPreference::Female),
            other => Err(format!("unknown gender preference '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripVacancy {
    pub id: VacancyId,
    pub owner_id: UserId,
    pub title: String,
    pub destination: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_min: u32,
    pub budget_max: u32,
    pub currency: String,
    pub spots_total: u32,
    pub spots_available: u32,
    #[serde(default)]
    pub preferred_gender: GenderPreference,
    #[serde(default)]
    pub min_age: Option<u8>,
    #[serde(default)]
    pub max_age: Option<u8>,
    #[serde(default)]
    pub languages: Vec<OptionId>,
    #[serde(default)]
    pub interests: Vec<OptionId>,
    #[serde(default)]
    pub travel_styles: Vec<OptionId>,
    pub status: VacancyStatus,
    pub created_at: DateTime<Utc>,
}

impl TripVacancy {
    /// Number of calendar days covered, both ends included
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == VacancyStatus::Open && self.spots_available > 0
    }

    #[must_use]
    pub fn format_budget(&self) -> String {
        if self.budget_min == self.budget_max {
            format!("{} {}", self.budget_max, self.currency)
        } else {
            format!("{}-{} {}", self.budget_min, self.budget_max, self.currency)
        }
    }

    #[must_use]
    pub fn format_dates(&self) -> String {
        format!(
            "{} - {} ({} days)",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.duration_days()
        )
    }
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyPayload {
    pub title: String,
    pub destination: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_min: u32,
    pub budget_max: u32,
    pub currency: String,
    pub spots_total: u32,
    pub preferred_gender: GenderPreference,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub languages: Vec<OptionId>,
    pub interests: Vec<OptionId>,
    pub travel_styles: Vec<OptionId>,
}
