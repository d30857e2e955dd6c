use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FormErrors, char_len};
use crate::models::{GenderPreference, OptionId, TripVacancy, VacancyPayload};

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_SPOTS: u32 = 20;
pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 99;

/// Create/edit form for a trip vacancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyForm {
    pub title: String,
    pub destination: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub currency: String,
    pub spots_total: Option<u32>,
    pub preferred_gender: GenderPreference,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub languages: Vec<OptionId>,
    pub interests: Vec<OptionId>,
    pub travel_styles: Vec<OptionId>,
}

impl Default for VacancyForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            destination: String::new(),
            description: String::new(),
            start_date: None,
            end_date: None,
            budget_min: None,
            budget_max: None,
            currency: "EUR".to_string(),
            spots_total: Some(1),
            preferred_gender: GenderPreference::Any,
            min_age: None,
            max_age: None,
            languages: Vec::new(),
            interests: Vec::new(),
            travel_styles: Vec::new(),
        }
    }
}

impl VacancyForm {
    /// Prefill the form for editing an existing vacancy
    #[must_use]
    pub fn from_vacancy(vacancy: &TripVacancy) -> Self {
        Self {
            title: vacancy.title.clone(),
            destination: vacancy.destination.clone(),
            description: vacancy.description.clone(),
            start_date: Some(vacancy.start_date),
            end_date: Some(vacancy.end_date),
            budget_min: Some(vacancy.budget_min),
            budget_max: Some(vacancy.budget_max),
            currency: vacancy.currency.clone(),
            spots_total: Some(vacancy.spots_total),
            preferred_gender: vacancy.preferred_gender,
            min_age: vacancy.min_age,
            max_age: vacancy.max_age,
            languages: vacancy.languages.clone(),
            interests: vacancy.interests.clone(),
            travel_styles: vacancy.travel_styles.clone(),
        }
    }

    /// Validate against `today` and build the request payload
    pub fn validate(&self, today: NaiveDate) -> Result<VacancyPayload, FormErrors> {
        let mut errors = FormErrors::default();
        let title = self.title.trim();
        let destination = self.destination.trim();
        let description = self.description.trim();
        let currency = self.currency.trim().to_ascii_uppercase();

        errors.check(!title.is_empty(), "title", "Title is required");
        errors.check(
            char_len(title) <= MAX_TITLE_LENGTH,
            "title",
            "Title must be at most 120 characters",
        );
        errors.check(!destination.is_empty(), "destination", "Destination is required");
        errors.check(
            char_len(description) <= MAX_DESCRIPTION_LENGTH,
            "description",
            "Description must be at most 2000 characters",
        );

        match self.start_date {
            None => errors.add("start_date", "Start date is required"),
            Some(start) if start < today => {
                errors.add("start_date", "Start date cannot be in the past");
            }
            Some(_) => {}
        }
        match (self.start_date, self.end_date) {
            (_, None) => errors.add("end_date", "End date is required"),
            (Some(start), Some(end)) if end < start => {
                errors.add("end_date", "End date must be on or after the start date");
            }
            _ => {}
        }

        let budget_min = self.budget_min.unwrap_or(0);
        match self.budget_max {
            None | Some(0) => errors.add("budget_max", "Maximum budget is required"),
            Some(max) if budget_min > max => {
                errors.add("budget_min", "Minimum budget cannot exceed maximum budget");
            }
            Some(_) => {}
        }

        errors.check(
            currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()),
            "currency",
            "Currency must be a 3-letter code",
        );

        match self.spots_total {
            Some(spots) if (1..=MAX_SPOTS).contains(&spots) => {}
            _ => errors.add("spots_total", "Companions must be between 1 and 20"),
        }

        let age_range = MIN_AGE..=MAX_AGE;
        if let Some(min_age) = self.min_age {
            errors.check(age_range.contains(&min_age), "min_age", "Age must be between 18 and 99");
        }
        if let Some(max_age) = self.max_age {
            errors.check(age_range.contains(&max_age), "max_age", "Age must be between 18 and 99");
        }
        if let (Some(min_age), Some(max_age)) = (self.min_age, self.max_age) {
            errors.check(
                min_age <= max_age,
                "max_age",
                "Maximum age cannot be below minimum age",
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // Required fields were checked above
        let (Some(start_date), Some(end_date), Some(budget_max), Some(spots_total)) = (
            self.start_date,
            self.end_date,
            self.budget_max,
            self.spots_total,
        ) else {
            return Err(errors);
        };

        Ok(VacancyPayload {
            title: title.to_string(),
            destination: destination.to_string(),
            description: description.to_string(),
            start_date,
            end_date,
            budget_min,
            budget_max,
            currency,
            spots_total,
            preferred_gender: self.preferred_gender,
            min_age: self.min_age,
            max_age: self.max_age,
            languages: self.languages.clone(),
            interests: self.interests.clone(),
            travel_styles: self.travel_styles.clone(),
        })
    }
}
