use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::vacancy::MAX_DESCRIPTION_LENGTH;
use super::{FormErrors, char_len};
use crate::models::{OptionId, TripRequestPayload};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequestForm {
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget_max: Option<u32>,
    pub description: String,
    pub travel_styles: Vec<OptionId>,
}

impl TripRequestForm {
    pub fn validate(&self, today: NaiveDate) -> Result<TripRequestPayload, FormErrors> {
        let mut errors = FormErrors::default();
        let destination = self.destination.trim();
        let description = self.description.trim();

        errors.check(!destination.is_empty(), "destination", "Destination is required");
        errors.check(
            char_len(description) <= MAX_DESCRIPTION_LENGTH,
            "description",
            "Description must be at most 2000 characters",
        );
        errors.check(
            self.budget_max.is_some_and(|b| b > 0),
            "budget_max",
            "Budget must be greater than zero",
        );

        let dates = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                errors.check(start >= today, "start_date", "Start date cannot be in the past");
                errors.check(end >= start, "end_date", "End date must be on or after the start date");
                Some((start, end))
            }
            (start, end) => {
                errors.check(start.is_some(), "start_date", "Start date is required");
                errors.check(end.is_some(), "end_date", "End date is required");
                None
            }
        };

        match (dates, self.budget_max) {
            (Some((start_date, end_date)), Some(budget_max)) if errors.is_empty() => {
                Ok(TripRequestPayload {
                    destination: destination.to_string(),
                    start_date,
                    end_date,
                    budget_max,
                    description: description.to_string(),
                    travel_styles: self.travel_styles.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let form = TripRequestForm {
            destination: "Kyoto".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 14),
            budget_max: Some(2500),
            ..TripRequestForm::default()
        };
        let payload = form.validate(today()).unwrap();
        assert_eq!(payload.destination, "Kyoto");
    }

    #[test]
    fn test_missing_fields() {
        let errors = TripRequestForm::default().validate(today()).unwrap_err();
        assert_eq!(errors.get("destination"), Some("Destination is required"));
        assert_eq!(errors.get("start_date"), Some("Start date is required"));
        assert_eq!(errors.get("budget_max"), Some("Budget must be greater than zero"));
    }
}
