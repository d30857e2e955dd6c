use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FormErrors, char_len};
use crate::models::{Gender, OptionId, Profile, ProfileUpdate, age_between};

pub const MAX_BIO_LENGTH: usize = 500;
pub const MIN_PROFILE_AGE: u32 = 18;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub city: String,
    pub languages: Vec<OptionId>,
    pub interests: Vec<OptionId>,
    pub travel_styles: Vec<OptionId>,
}

impl ProfileForm {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            bio: profile.bio.clone(),
            birth_date: profile.birth_date,
            gender: profile.gender,
            city: profile.city.clone().unwrap_or_default(),
            languages: profile.languages.clone(),
            interests: profile.interests.clone(),
            travel_styles: profile.travel_styles.clone(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<ProfileUpdate, FormErrors> {
        let mut errors = FormErrors::default();
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let bio = self.bio.trim();
        let city = self.city.trim();

        errors.check(!first_name.is_empty(), "first_name", "First name is required");
        errors.check(!last_name.is_empty(), "last_name", "Last name is required");
        errors.check(
            char_len(bio) <= MAX_BIO_LENGTH,
            "bio",
            "Bio must be at most 500 characters",
        );
        if let Some(born) = self.birth_date {
            errors.check(
                age_between(born, today) >= MIN_PROFILE_AGE,
                "birth_date",
                "You must be at least 18 years old",
            );
        }

        errors.into_result(ProfileUpdate {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            bio: Some(bio.to_string()),
            birth_date: self.birth_date,
            gender: self.gender,
            city: (!city.is_empty()).then(|| city.to_string()),
            languages: Some(self.languages.clone()),
            interests: Some(self.interests.clone()),
            travel_styles: Some(self.travel_styles.clone()),
        })
    }
}
