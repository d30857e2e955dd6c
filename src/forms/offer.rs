use serde::{Deserialize, Serialize};

use super::{FORM_FIELD, FormErrors, char_len};
use crate::models::{OfferPayload, TripVacancy, User};

pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// "Join this trip" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferForm {
    pub message: String,
}

impl OfferForm {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Validate the message and check the trip can take this user
    pub fn validate(&self, vacancy: &TripVacancy, sender: &User) -> Result<OfferPayload, FormErrors> {
        let mut errors = FormErrors::default();
        let message = self.message.trim();

        errors.check(!message.is_empty(), "message", "Tell the organiser a bit about yourself");
        errors.check(
            char_len(message) <= MAX_MESSAGE_LENGTH,
            "message",
            "Message must be at most 1000 characters",
        );
        errors.check(
            vacancy.owner_id != sender.id,
            FORM_FIELD,
            "You cannot join your own trip",
        );
        errors.check(
            vacancy.is_open(),
            FORM_FIELD,
            "This trip is no longer accepting companions",
        );

        errors.into_result(OfferPayload {
            vacancy_id: vacancy.id,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderPreference, VacancyStatus};
    use chrono::{NaiveDate, Utc};

    fn vacancy(owner_id: u64) -> TripVacancy {
        TripVacancy {
            id: 10,
            owner_id,
            title: "Road trip".to_string(),
            destination: "Iceland".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 9).unwrap(),
            budget_min: 1000,
            budget_max: 1500,
            currency: "EUR".to_string(),
            spots_total: 2,
            spots_available: 2,
            preferred_gender: GenderPreference::Any,
            min_age: None,
            max_age: None,
            languages: vec![],
            interests: vec![],
            travel_styles: vec![],
            status: VacancyStatus::Open,
            created_at: Utc::now(),
        }
    }

    fn user(id: u64) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[test]
    fn test_valid_offer() {
        let payload = OfferForm::new(" Count me in! ").validate(&vacancy(1), &user(2)).unwrap();
        assert_eq!(payload.vacancy_id, 10);
        assert_eq!(payload.message, "Count me in!");
    }

    #[test]
    fn test_own_trip_rejected() {
        let errors = OfferForm::new("hi").validate(&vacancy(1), &user(1)).unwrap_err();
        assert_eq!(errors.get(FORM_FIELD), Some("You cannot join your own trip"));
    }

    #[test]
    fn test_full_trip_rejected() {
        let mut full = vacancy(1);
        full.spots_available = 0;
        full.status = VacancyStatus::Full;
        let errors = OfferForm::new("hi").validate(&full, &user(2)).unwrap_err();
        assert!(errors.get(FORM_FIELD).is_some());
    }

    #[test]
    fn test_blank_message_rejected() {
        let errors = OfferForm::new("   ").validate(&vacancy(1), &user(2)).unwrap_err();
        assert!(errors.get("message").is_some());
    }
}
