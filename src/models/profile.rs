//! Traveller profiles and the option catalogs they reference

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::UserId;

pub type OptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Entry of the language, interest or travel style catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: OptionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub languages: Vec<OptionId>,
    #[serde(default)]
    pub interests: Vec<OptionId>,
    #[serde(default)]
    pub travel_styles: Vec<OptionId>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Profile {
    /// Age in whole years on `today`, if a birth date is known
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.map(|born| age_between(born, today))
    }
}

/// Whole years from `born` to `today`, zero if `today` is earlier
#[must_use]
pub fn age_between(born: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<OptionId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<OptionId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_styles: Option<Vec<OptionId>>,
}

impl ProfileUpdate {
    /// Apply the present fields to `profile`
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(first_name) = &self.first_name {
            profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            profile.last_name.clone_from(last_name);
        }
        if let Some(bio) = &self.bio {
            profile.bio.clone_from(bio);
        }
        if self.birth_date.is_some() {
            profile.birth_date = self.birth_date;
        }
        if self.gender.is_some() {
            profile.gender = self.gender;
        }
        if self.city.is_some() {
            profile.city.clone_from(&self.city);
        }
        if let Some(languages) = &self.languages {
            profile.languages.clone_from(languages);
        }
        if let Some(interests) = &self.interests {
            profile.interests.clone_from(interests);
        }
        if let Some(travel_styles) = &self.travel_styles {
            profile.travel_styles.clone_from(travel_styles);
        }
    }
}
