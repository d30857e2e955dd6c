use super::{TripmateClient, endpoint};
use crate::error::TripmateError;
use crate::filters::TripRequestFilter;
use crate::http::ApiRequest;
use crate::models::{Page, TripRequest, TripRequestId, TripRequestPayload};

impl TripmateClient {
    pub async fn list_trip_requests(
        &self,
        filter: &TripRequestFilter,
    ) -> Result<Page<TripRequest>, TripmateError> {
        let request = ApiRequest::get(endpoint("trip-requests/")).with_query(filter.to_query());
        self.public(request).await
    }

    pub async fn my_trip_requests(&self) -> Result<Vec<TripRequest>, TripmateError> {
        self.authed(ApiRequest::get(endpoint("trip-requests/mine/")))
            .await
    }

    pub async fn create_trip_request(
        &self,
        payload: &TripRequestPayload,
    ) -> Result<TripRequest, TripmateError> {
        self.authed(ApiRequest::post(endpoint("trip-requests/")).json(payload)?)
            .await
    }

    pub async fn delete_trip_request(&self, id: TripRequestId) -> Result<(), TripmateError> {
        self.authed_empty(ApiRequest::delete(endpoint(&format!("trip-requests/{id}/"))))
            .await
    }
}
