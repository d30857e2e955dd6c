//! Listing filters and their query-string form
//!
//! The same filter value is sent to the backend as query pairs and, in the
//! mock backend, parsed back and evaluated locally with `matches`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TripmateError;
use crate::forms::FormErrors;
use crate::models::{GenderPreference, OptionId, TripRequest, TripVacancy};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Browse filters for trip vacancies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyFilter {
    /// Case-insensitive substring of the destination
    pub destination: Option<String>,
    /// Trip starts on or after this date
    pub starts_after: Option<NaiveDate>,
    /// Trip ends on or before this date
    pub ends_before: Option<NaiveDate>,
    /// Trip budget range must reach at least this much
    pub budget_min: Option<u32>,
    /// Trip must be affordable within this much
    pub budget_max: Option<u32>,
    /// Traveller gender; trips preferring the other gender are hidden
    pub gender: Option<GenderPreference>,
    /// Traveller age checked against the trip's age window
    pub age: Option<u8>,
    /// Trip shares at least one of these languages
    pub languages: Vec<OptionId>,
    /// Trip shares at least one of these travel styles
    pub travel_styles: Vec<OptionId>,
    pub only_open: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn join_ids(ids: &[OptionId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, TripmateError> {
    value.trim().parse().map_err(|_| {
        let mut errors = FormErrors::default();
        errors.add(key, format!("Invalid value '{value}'"));
        TripmateError::Validation { errors }
    })
}

fn parse_ids(key: &str, value: &str) -> Result<Vec<OptionId>, TripmateError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_value(key, part))
        .collect()
}

impl VacancyFilter {
    /// Query pairs understood by `/trip-vacancies/`
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: String| query.push((key.to_string(), value));

        if let Some(destination) = self.destination.as_deref().map(str::trim) {
            if !destination.is_empty() {
                push("destination", destination.to_string());
            }
        }
        if let Some(date) = self.starts_after {
            push("start_date_after", date.format("%Y-%m-%d").to_string());
        }
        if let Some(date) = self.ends_before {
            push("end_date_before", date.format("%Y-%m-%d").to_string());
        }
        if let Some(budget) = self.budget_min {
            push("budget_min", budget.to_string());
        }
        if let Some(budget) = self.budget_max {
            push("budget_max", budget.to_string());
        }
        if let Some(gender) = self.gender {
            push("gender", gender.as_str().to_string());
        }
        if let Some(age) = self.age {
            push("age", age.to_string());
        }
        if !self.languages.is_empty() {
            push("languages", join_ids(&self.languages));
        }
        if !self.travel_styles.is_empty() {
            push("travel_styles", join_ids(&self.travel_styles));
        }
        if self.only_open {
            push("status", "open".to_string());
        }
        if let Some(page) = self.page {
            push("page", page.to_string());
        }
        if let Some(page_size) = self.page_size {
            push("page_size", page_size.to_string());
        }
        query
    }

    /// Parse query pairs; unknown keys are ignored
    pub fn from_query(query: &[(String, String)]) -> Result<Self, TripmateError> {
        let mut filter = Self::default();
        for (key, value) in query {
            match key.as_str() {
                "destination" => filter.destination = Some(value.clone()),
                "start_date_after" => filter.starts_after = Some(parse_value(key, value)?),
                "end_date_before" => filter.ends_before = Some(parse_value(key, value)?),
                "budget_min" => filter.budget_min = Some(parse_value(key, value)?),
                "budget_max" => filter.budget_max = Some(parse_value(key, value)?),
                "gender" => filter.gender = Some(parse_value(key, value)?),
                "age" => filter.age = Some(parse_value(key, value)?),
                "languages" => filter.languages = parse_ids(key, value)?,
                "travel_styles" => filter.travel_styles = parse_ids(key, value)?,
                "status" => filter.only_open = value == "open",
                "page" => filter.page = Some(parse_value(key, value)?),
                "page_size" => filter.page_size = Some(parse_value(key, value)?),
                _ => {}
            }
        }
        Ok(filter)
    }

    /// Evaluate the filter against one vacancy
    #[must_use]
    pub fn matches(&self, vacancy: &TripVacancy) -> bool {
        let destination_ok = self.destination.as_deref().is_none_or(|wanted| {
            vacancy
                .destination
                .to_lowercase()
                .contains(&wanted.trim().to_lowercase())
        });
        let starts_ok = self.starts_after.is_none_or(|date| vacancy.start_date >= date);
        let ends_ok = self.ends_before.is_none_or(|date| vacancy.end_date <= date);
        let budget_min_ok = self.budget_min.is_none_or(|min| vacancy.budget_max >= min);
        let budget_max_ok = self.budget_max.is_none_or(|max| vacancy.budget_min <= max);
        let gender_ok = self.gender.is_none_or(|gender| {
            vacancy.preferred_gender == GenderPreference::Any
                || gender == GenderPreference::Any
                || vacancy.preferred_gender == gender
        });
        let age_ok = self.age.is_none_or(|age| {
            vacancy.min_age.is_none_or(|min| age >= min)
                && vacancy.max_age.is_none_or(|max| age <= max)
        });
        let languages_ok = self.languages.is_empty()
            || self.languages.iter().any(|id| vacancy.languages.contains(id));
        let styles_ok = self.travel_styles.is_empty()
            || self
                .travel_styles
                .iter()
                .any(|id| vacancy.travel_styles.contains(id));
        let open_ok = !self.only_open || vacancy.is_open();

        destination_ok
            && starts_ok
            && ends_ok
            && budget_min_ok
            && budget_max_ok
            && gender_ok
            && age_ok
            && languages_ok
            && styles_ok
            && open_ok
    }

    /// 1-based page number
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Browse filters for trip requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequestFilter {
    pub destination: Option<String>,
    pub page: Option<u32>,
}

impl TripRequestFilter {
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(destination) = self.destination.as_deref().map(str::trim) {
            if !destination.is_empty() {
                query.push(("destination".to_string(), destination.to_string()));
            }
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        query
    }

    pub fn from_query(query: &[(String, String)]) -> Result<Self, TripmateError> {
        let mut filter = Self::default();
        for (key, value) in query {
            match key.as_str() {
                "destination" => filter.destination = Some(value.clone()),
                "page" => filter.page = Some(parse_value(key, value)?),
                _ => {}
            }
        }
        Ok(filter)
    }

    #[must_use]
    pub fn matches(&self, request: &TripRequest) -> bool {
        self.destination.as_deref().is_none_or(|wanted| {
            request
                .destination
                .to_lowercase()
                .contains(&wanted.trim().to_lowercase())
        })
    }

    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VacancyStatus;
    use chrono::Utc;
    use rstest::rstest;

    fn vacancy() -> TripVacancy {
        TripVacancy {
            id: 1,
            owner_id: 2,
            title: "Surf week".to_string(),
            destination: "Ericeira, Portugal".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 17).unwrap(),
            budget_min: 400,
            budget_max: 700,
            currency: "EUR".to_string(),
            spots_total: 3,
            spots_available: 2,
            preferred_gender: GenderPreference::Female,
            min_age: Some(21),
            max_age: Some(35),
            languages: vec![1, 3],
            interests: vec![],
            travel_styles: vec![5],
            status: VacancyStatus::Open,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_query_round_trip() {
        let filter = VacancyFilter {
            destination: Some("Portugal".to_string()),
            starts_after: NaiveDate::from_ymd_opt(2026, 6, 1),
            budget_max: Some(800),
            gender: Some(GenderPreference::Female),
            languages: vec![1, 2],
            only_open: true,
            page: Some(2),
            ..VacancyFilter::default()
        };
        let query = filter.to_query();
        assert!(query.contains(&("languages".to_string(), "1,2".to_string())));
        assert!(query.contains(&("start_date_after".to_string(), "2026-06-01".to_string())));
        assert_eq!(VacancyFilter::from_query(&query).unwrap(), filter);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(VacancyFilter::default().to_query().is_empty());
        assert!(VacancyFilter::default().matches(&vacancy()));
    }

    #[rstest]
    #[case(VacancyFilter { destination: Some("portugal".into()), ..Default::default() }, true)]
    #[case(VacancyFilter { destination: Some("Spain".into()), ..Default::default() }, false)]
    #[case(VacancyFilter { budget_max: Some(300), ..Default::default() }, false)]
    #[case(VacancyFilter { budget_max: Some(400), ..Default::default() }, true)]
    #[case(VacancyFilter { budget_min: Some(800), ..Default::default() }, false)]
    #[case(VacancyFilter { gender: Some(GenderPreference::Male), ..Default::default() }, false)]
    #[case(VacancyFilter { gender: Some(GenderPreference::Female), ..Default::default() }, true)]
    #[case(VacancyFilter { age: Some(19), ..Default::default() }, false)]
    #[case(VacancyFilter { age: Some(30), ..Default::default() }, true)]
    #[case(VacancyFilter { languages: vec![2, 3], ..Default::default() }, true)]
    #[case(VacancyFilter { languages: vec![2], ..Default::default() }, false)]
    #[case(VacancyFilter { travel_styles: vec![4], ..Default::default() }, false)]
    #[case(VacancyFilter { starts_after: NaiveDate::from_ymd_opt(2026, 6, 11), ..Default::default() }, false)]
    #[case(VacancyFilter { ends_before: NaiveDate::from_ymd_opt(2026, 6, 17), ..Default::default() }, true)]
    fn test_matches(#[case] filter: VacancyFilter, #[case] expected: bool) {
        assert_eq!(filter.matches(&vacancy()), expected);
    }

    #[test]
    fn test_only_open_hides_full_trips() {
        let mut full = vacancy();
        full.spots_available = 0;
        let filter = VacancyFilter {
            only_open: true,
            ..VacancyFilter::default()
        };
        assert!(!filter.matches(&full));
    }

    #[test]
    fn test_invalid_query_value() {
        let query = vec![("budget_max".to_string(), "lots".to_string())];
        let err = VacancyFilter::from_query(&query).unwrap_err();
        assert!(err.form_errors().and_then(|e| e.get("budget_max")).is_some());
    }

    #[test]
    fn test_page_size_is_clamped() {
        let filter = VacancyFilter {
            page: Some(0),
            page_size: Some(500),
            ..VacancyFilter::default()
        };
        assert_eq!(filter.page_number(), 1);
        assert_eq!(filter.effective_page_size(), MAX_PAGE_SIZE);
    }
}
