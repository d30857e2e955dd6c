use tracing::instrument;

use super::{TripmateClient, endpoint};
use crate::error::TripmateError;
use crate::filters::VacancyFilter;
use crate::http::ApiRequest;
use crate::models::{Offer, Page, TripVacancy, VacancyId, VacancyPayload};

impl TripmateClient {
    /// Browse vacancies; public
    #[instrument(level = "debug", skip(self))]
    pub async fn list_vacancies(
        &self,
        filter: &VacancyFilter,
    ) -> Result<Page<TripVacancy>, TripmateError> {
        let request = ApiRequest::get(endpoint("trip-vacancies/")).with_query(filter.to_query());
        self.public(request).await
    }

    pub async fn vacancy(&self, id: VacancyId) -> Result<TripVacancy, TripmateError> {
        self.public(ApiRequest::get(endpoint(&format!("trip-vacancies/{id}/"))))
            .await
    }

    /// Vacancies posted by the signed-in user
    pub async fn my_vacancies(&self) -> Result<Vec<TripVacancy>, TripmateError> {
        self.authed(ApiRequest::get(endpoint("trip-vacancies/mine/")))
            .await
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_vacancy(
        &self,
        payload: &VacancyPayload,
    ) -> Result<TripVacancy, TripmateError> {
        self.authed(ApiRequest::post(endpoint("trip-vacancies/")).json(payload)?)
            .await
    }

    pub async fn update_vacancy(
        &self,
        id: VacancyId,
        payload: &VacancyPayload,
    ) -> Result<TripVacancy, TripmateError> {
        let request = ApiRequest::patch(endpoint(&format!("trip-vacancies/{id}/"))).json(payload)?;
        self.authed(request).await
    }

    pub async fn delete_vacancy(&self, id: VacancyId) -> Result<(), TripmateError> {
        self.authed_empty(ApiRequest::delete(endpoint(&format!("trip-vacancies/{id}/"))))
            .await
    }

    /// Offers received for one of the user's vacancies
    pub async fn offers_for_vacancy(&self, id: VacancyId) -> Result<Vec<Offer>, TripmateError> {
        self.authed(ApiRequest::get(endpoint(&format!("trip-vacancies/{id}/offers/"))))
            .await
    }
}
