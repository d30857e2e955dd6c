use tracing::instrument;

use super::{TripmateClient, endpoint};
use crate::error::TripmateError;
use crate::http::ApiRequest;
use crate::models::{Offer, OfferId, OfferPayload};

impl TripmateClient {
    /// Ask to join a vacancy
    #[instrument(skip(self, payload), fields(vacancy_id = payload.vacancy_id))]
    pub async fn submit_offer(&self, payload: &OfferPayload) -> Result<Offer, TripmateError> {
        self.authed(ApiRequest::post(endpoint("offers/")).json(payload)?)
            .await
    }

    /// Offers the signed-in user has sent
    pub async fn my_offers(&self) -> Result<Vec<Offer>, TripmateError> {
        self.authed(ApiRequest::get(endpoint("offers/mine/"))).await
    }

    pub async fn accept_offer(&self, id: OfferId) -> Result<Offer, TripmateError> {
        self.offer_action(id, "accept").await
    }

    pub async fn reject_offer(&self, id: OfferId) -> Result<Offer, TripmateError> {
        self.offer_action(id, "reject").await
    }

    pub async fn withdraw_offer(&self, id: OfferId) -> Result<Offer, TripmateError> {
        self.offer_action(id, "withdraw").await
    }

    async fn offer_action(&self, id: OfferId, action: &str) -> Result<Offer, TripmateError> {
        self.authed(ApiRequest::post(endpoint(&format!("offers/{id}/{action}/"))))
            .await
    }
}
