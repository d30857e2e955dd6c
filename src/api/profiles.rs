use super::{TripmateClient, endpoint};
use crate::error::TripmateError;
use crate::http::ApiRequest;
use crate::models::{CatalogOption, Profile, ProfileUpdate, UserId};

impl TripmateClient {
    pub async fn my_profile(&self) -> Result<Profile, TripmateError> {
        self.authed(ApiRequest::get(endpoint("profiles/me/"))).await
    }

    pub async fn update_my_profile(&self, update: &ProfileUpdate) -> Result<Profile, TripmateError> {
        self.authed(ApiRequest::patch(endpoint("profiles/me/")).json(update)?)
            .await
    }

    /// Another traveller's profile, by user id
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, TripmateError> {
        self.authed(ApiRequest::get(endpoint(&format!("profiles/{user_id}/"))))
            .await
    }

    pub async fn languages(&self) -> Result<Vec<CatalogOption>, TripmateError> {
        self.public(ApiRequest::get(endpoint("profiles/languages/"))).await
    }

    pub async fn interests(&self) -> Result<Vec<CatalogOption>, TripmateError> {
        self.public(ApiRequest::get(endpoint("profiles/interests/"))).await
    }

    pub async fn travel_styles(&self) -> Result<Vec<CatalogOption>, TripmateError> {
        self.public(ApiRequest::get(endpoint("profiles/travel-styles/"))).await
    }
}
