//! In-memory data and backend rules for the mock server

use std::collections::HashSet;

use chrono::{NaiveDate, TimeDelta, Utc};
use serde_json::{Map, Value, json};

use crate::filters::{DEFAULT_PAGE_SIZE, TripRequestFilter, VacancyFilter};
use crate::forms::{FORM_FIELD, FormErrors};
use crate::http::ApiRequest;
use crate::models::{
    CatalogOption, GenderPreference, Offer, OfferId, OfferPayload, OfferStatus, Page, Profile,
    ProfileUpdate, Registration, TripRequest, TripRequestId, TripRequestPayload, TripVacancy,
    User, UserId, VacancyId, VacancyPayload, VacancyStatus,
};

pub const DEMO_EMAIL: &str = "demo@tripmate.test";
pub const DEMO_PASSWORD: &str = "tripmate123";
pub const HOST_EMAIL: &str = "host@tripmate.test";
pub const HOST_PASSWORD: &str = "tripmate123";

const NO_PERMISSION: &str = "You do not have permission to perform this action.";

/// A request the mock backend refuses, with the status a real backend uses
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Invalid(FormErrors),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl Rejection {
    pub fn form(message: &str) -> Self {
        Self::field(FORM_FIELD, message)
    }

    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FormErrors::default();
        errors.add(field, message);
        Self::Invalid(errors)
    }

    fn forbidden() -> Self {
        Self::Forbidden(NO_PERMISSION.to_string())
    }

    fn not_found() -> Self {
        Self::NotFound("Not found.".to_string())
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Rejection::Invalid(_) => 400,
            Rejection::Unauthorized(_) => 401,
            Rejection::Forbidden(_) => 403,
            Rejection::NotFound(_) => 404,
            Rejection::Internal(_) => 500,
        }
    }

    /// Error body in the shape the REST backend produces
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Rejection::Invalid(errors) => {
                let mut body = Map::new();
                for (field, message) in errors.iter() {
                    let key = if field == FORM_FIELD { "non_field_errors" } else { field };
                    body.insert(key.to_string(), json!([message]));
                }
                Value::Object(body)
            }
            Rejection::Unauthorized(detail)
            | Rejection::Forbidden(detail)
            | Rejection::NotFound(detail)
            | Rejection::Internal(detail) => json!({ "detail": detail }),
        }
    }
}

pub type MockResult<T> = Result<T, Rejection>;

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Everything the mock backend knows
#[derive(Debug, Default)]
pub struct MockStore {
    accounts: Vec<Account>,
    profiles: Vec<Profile>,
    languages: Vec<CatalogOption>,
    interests: Vec<CatalogOption>,
    travel_styles: Vec<CatalogOption>,
    vacancies: Vec<TripVacancy>,
    trip_requests: Vec<TripRequest>,
    offers: Vec<Offer>,
    revoked: HashSet<String>,
    last_id: u64,
}

fn catalog(names: &[&str]) -> Vec<CatalogOption> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| CatalogOption {
            id,
            name: (*name).to_string(),
        })
        .collect()
}

/// Page `page` of `items`; out-of-range pages are a 404 like the backend's
fn paginate<T>(
    items: Vec<T>,
    page: u32,
    page_size: u32,
    path: &str,
    mut query: Vec<(String, String)>,
) -> MockResult<Page<T>> {
    let count = items.len();
    let size = page_size.max(1) as usize;
    let start = (page.max(1) as usize - 1) * size;
    if start > 0 && start >= count {
        return Err(Rejection::NotFound("Invalid page.".to_string()));
    }
    query.retain(|(key, _)| key != "page");
    let link = |page: usize| {
        let mut query = query.clone();
        query.push(("page".to_string(), page.to_string()));
        ApiRequest::get(path).with_query(query).path_and_query()
    };
    let current = page.max(1) as usize;
    Ok(Page {
        count: count as u64,
        next: (start + size < count).then(|| link(current + 1)),
        previous: (current > 1).then(|| link(current - 1)),
        results: items.into_iter().skip(start).take(size).collect(),
    })
}

fn check_vacancy_payload(payload: &VacancyPayload) -> MockResult<()> {
    let mut errors = FormErrors::default();
    errors.check(!payload.title.trim().is_empty(), "title", "This field may not be blank.");
    errors.check(
        !payload.destination.trim().is_empty(),
        "destination",
        "This field may not be blank.",
    );
    errors.check(
        payload.end_date >= payload.start_date,
        "end_date",
        "End date must not be before the start date.",
    );
    errors.check(
        payload.budget_min <= payload.budget_max,
        "budget_max",
        "Maximum budget must not be below the minimum.",
    );
    errors.check(
        payload.spots_total >= 1,
        "spots_total",
        "Ensure this value is greater than or equal to 1.",
    );
    errors.into_result(()).map_err(Rejection::Invalid)
}

impl MockStore {
    /// Minimal usable data set: a demo user, a host with two open trips and
    /// one trip request, and the option catalogs.
    #[must_use]
    pub fn seeded(today: NaiveDate) -> Self {
        let mut store = MockStore {
            languages: catalog(&["English", "Spanish", "German", "French", "Portuguese"]),
            interests: catalog(&["Hiking", "Food", "Museums", "Photography", "Nightlife"]),
            travel_styles: catalog(&["Backpacking", "Comfort", "Road trip", "Adventure"]),
            ..MockStore::default()
        };
        let demo = store.add_account(DEMO_EMAIL, DEMO_PASSWORD, "Alex", "Demo");
        let host = store.add_account(HOST_EMAIL, HOST_PASSWORD, "Sam", "Host");
        if let Some(profile) = store.profiles.iter_mut().find(|p| p.user_id == demo) {
            profile.bio = "Weekend traveller looking for company".to_string();
            profile.city = Some("Berlin".to_string());
            profile.languages = vec![1, 3];
            profile.interests = vec![1, 2];
        }

        let days = TimeDelta::days;
        let now = Utc::now();
        let lisbon = TripVacancy {
            id: store.next_id(),
            owner_id: host,
            title: "Lisbon long weekend".to_string(),
            destination: "Lisbon, Portugal".to_string(),
            description: "Tram 28, pastel de nata and a day trip to Sintra.".to_string(),
            start_date: today + days(30),
            end_date: today + days(33),
            budget_min: 300,
            budget_max: 500,
            currency: "EUR".to_string(),
            spots_total: 2,
            spots_available: 2,
            preferred_gender: GenderPreference::Any,
            min_age: None,
            max_age: None,
            languages: vec![1, 5],
            interests: vec![2, 3],
            travel_styles: vec![2],
            status: VacancyStatus::Open,
            created_at: now,
        };
        let dolomites = TripVacancy {
            id: store.next_id(),
            title: "Dolomites hut to hut".to_string(),
            destination: "Dolomites, Italy".to_string(),
            description: "Seven days on the Alta Via 1.".to_string(),
            start_date: today + days(60),
            end_date: today + days(66),
            budget_min: 600,
            budget_max: 900,
            spots_total: 3,
            spots_available: 3,
            min_age: Some(21),
            max_age: Some(45),
            languages: vec![1, 3],
            interests: vec![1, 4],
            travel_styles: vec![1, 4],
            ..lisbon.clone()
        };
        store.vacancies.extend([lisbon, dolomites]);

        let request = TripRequest {
            id: store.next_id(),
            owner_id: host,
            destination: "Iceland".to_string(),
            start_date: today + days(90),
            end_date: today + days(97),
            budget_max: 1500,
            description: "Ring road in a camper van.".to_string(),
            travel_styles: vec![3],
            created_at: now,
        };
        store.trip_requests.push(request);
        store
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn add_account(&mut self, email: &str, password: &str, first: &str, last: &str) -> UserId {
        let id = self.next_id();
        let user = User {
            id,
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        };
        self.profiles.push(Profile {
            id,
            user_id: id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            bio: String::new(),
            birth_date: None,
            gender: None,
            city: None,
            languages: Vec::new(),
            interests: Vec::new(),
            travel_styles: Vec::new(),
            avatar_url: None,
        });
        self.accounts.push(Account {
            user,
            password: password.to_string(),
        });
        id
    }

    // Accounts and tokens

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.accounts.iter().map(|a| &a.user).find(|u| u.id == id)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> MockResult<User> {
        self.accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email.trim()) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| {
                Rejection::Unauthorized("No active account found with the given credentials".to_string())
            })
    }

    pub fn register(&mut self, registration: &Registration) -> MockResult<User> {
        let email = registration.email.trim().to_lowercase();
        if self.accounts.iter().any(|a| a.user.email == email) {
            return Err(Rejection::field("email", "A user with this email already exists."));
        }
        if registration.password.chars().count() < 8 {
            return Err(Rejection::field(
                "password",
                "This password is too short. It must contain at least 8 characters.",
            ));
        }
        let id = self.add_account(
            &email,
            &registration.password,
            registration.first_name.trim(),
            registration.last_name.trim(),
        );
        self.user(id)
            .cloned()
            .ok_or_else(|| Rejection::Internal("account vanished".to_string()))
    }

    pub fn revoke(&mut self, refresh_token: &str) {
        self.revoked.insert(refresh_token.to_string());
    }

    #[must_use]
    pub fn is_revoked(&self, refresh_token: &str) -> bool {
        self.revoked.contains(refresh_token)
    }

    // Profiles and catalogs

    pub fn profile(&self, user_id: UserId) -> MockResult<Profile> {
        self.profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(Rejection::not_found)
    }

    pub fn update_profile(&mut self, user_id: UserId, update: &ProfileUpdate) -> MockResult<Profile> {
        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or_else(Rejection::not_found)?;
        update.apply_to(profile);
        let updated = profile.clone();
        if let Some(account) = self.accounts.iter_mut().find(|a| a.user.id == user_id) {
            account.user.first_name.clone_from(&updated.first_name);
            account.user.last_name.clone_from(&updated.last_name);
        }
        Ok(updated)
    }

    #[must_use]
    pub fn languages(&self) -> &[CatalogOption] {
        &self.languages
    }

    #[must_use]
    pub fn interests(&self) -> &[CatalogOption] {
        &self.interests
    }

    #[must_use]
    pub fn travel_styles(&self) -> &[CatalogOption] {
        &self.travel_styles
    }

    // Trip vacancies

    pub fn list_vacancies(&self, filter: &VacancyFilter, path: &str) -> MockResult<Page<TripVacancy>> {
        let mut matching: Vec<TripVacancy> = self
            .vacancies
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        matching.sort_by_key(|v| (v.start_date, v.id));
        paginate(
            matching,
            filter.page_number(),
            filter.effective_page_size(),
            path,
            filter.to_query(),
        )
    }

    pub fn vacancy(&self, id: VacancyId) -> MockResult<TripVacancy> {
        self.vacancies
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(Rejection::not_found)
    }

    #[must_use]
    pub fn vacancies_of(&self, owner: UserId) -> Vec<TripVacancy> {
        self.vacancies
            .iter()
            .filter(|v| v.owner_id == owner)
            .cloned()
            .collect()
    }

    fn owned_vacancy_mut(&mut self, owner: UserId, id: VacancyId) -> MockResult<&mut TripVacancy> {
        let vacancy = self
            .vacancies
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(Rejection::not_found)?;
        if vacancy.owner_id != owner {
            return Err(Rejection::forbidden());
        }
        Ok(vacancy)
    }

    pub fn create_vacancy(&mut self, owner: UserId, payload: &VacancyPayload) -> MockResult<TripVacancy> {
        check_vacancy_payload(payload)?;
        let vacancy = TripVacancy {
            id: self.next_id(),
            owner_id: owner,
            title: payload.title.trim().to_string(),
            destination: payload.destination.trim().to_string(),
            description: payload.description.clone(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            budget_min: payload.budget_min,
            budget_max: payload.budget_max,
            currency: payload.currency.clone(),
            spots_total: payload.spots_total,
            spots_available: payload.spots_total,
            preferred_gender: payload.preferred_gender,
            min_age: payload.min_age,
            max_age: payload.max_age,
            languages: payload.languages.clone(),
            interests: payload.interests.clone(),
            travel_styles: payload.travel_styles.clone(),
            status: VacancyStatus::Open,
            created_at: Utc::now(),
        };
        self.vacancies.push(vacancy.clone());
        Ok(vacancy)
    }

    pub fn update_vacancy(
        &mut self,
        owner: UserId,
        id: VacancyId,
        payload: &VacancyPayload,
    ) -> MockResult<TripVacancy> {
        check_vacancy_payload(payload)?;
        let accepted = self.accepted_count(id);
        let vacancy = self.owned_vacancy_mut(owner, id)?;
        if payload.spots_total < accepted {
            return Err(Rejection::field(
                "spots_total",
                "Cannot offer fewer spots than travellers already accepted.",
            ));
        }
        vacancy.title = payload.title.trim().to_string();
        vacancy.destination = payload.destination.trim().to_string();
        vacancy.description.clone_from(&payload.description);
        vacancy.start_date = payload.start_date;
        vacancy.end_date = payload.end_date;
        vacancy.budget_min = payload.budget_min;
        vacancy.budget_max = payload.budget_max;
        vacancy.currency.clone_from(&payload.currency);
        vacancy.spots_total = payload.spots_total;
        vacancy.spots_available = payload.spots_total - accepted;
        vacancy.preferred_gender = payload.preferred_gender;
        vacancy.min_age = payload.min_age;
        vacancy.max_age = payload.max_age;
        vacancy.languages.clone_from(&payload.languages);
        vacancy.interests.clone_from(&payload.interests);
        vacancy.travel_styles.clone_from(&payload.travel_styles);
        if vacancy.status != VacancyStatus::Closed {
            vacancy.status = if vacancy.spots_available == 0 {
                VacancyStatus::Full
            } else {
                VacancyStatus::Open
            };
        }
        Ok(vacancy.clone())
    }

    pub fn delete_vacancy(&mut self, owner: UserId, id: VacancyId) -> MockResult<()> {
        self.owned_vacancy_mut(owner, id)?;
        self.vacancies.retain(|v| v.id != id);
        self.offers.retain(|o| o.vacancy_id != id);
        Ok(())
    }

    pub fn offers_for_vacancy(&mut self, owner: UserId, id: VacancyId) -> MockResult<Vec<Offer>> {
        self.owned_vacancy_mut(owner, id)?;
        Ok(self
            .offers
            .iter()
            .filter(|o| o.vacancy_id == id)
            .cloned()
            .collect())
    }

    fn accepted_count(&self, id: VacancyId) -> u32 {
        let accepted = self
            .offers
            .iter()
            .filter(|o| o.vacancy_id == id && o.status == OfferStatus::Accepted)
            .count();
        u32::try_from(accepted).unwrap_or(u32::MAX)
    }

    // Trip requests

    pub fn list_trip_requests(
        &self,
        filter: &TripRequestFilter,
        path: &str,
    ) -> MockResult<Page<TripRequest>> {
        let matching: Vec<TripRequest> = self
            .trip_requests
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        paginate(
            matching,
            filter.page_number(),
            DEFAULT_PAGE_SIZE,
            path,
            filter.to_query(),
        )
    }

    #[must_use]
    pub fn trip_requests_of(&self, owner: UserId) -> Vec<TripRequest> {
        self.trip_requests
            .iter()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect()
    }

    pub fn create_trip_request(
        &mut self,
        owner: UserId,
        payload: &TripRequestPayload,
    ) -> MockResult<TripRequest> {
        let mut errors = FormErrors::default();
        errors.check(
            !payload.destination.trim().is_empty(),
            "destination",
            "This field may not be blank.",
        );
        errors.check(
            payload.end_date >= payload.start_date,
            "end_date",
            "End date must not be before the start date.",
        );
        errors.into_result(()).map_err(Rejection::Invalid)?;

        let request = TripRequest {
            id: self.next_id(),
            owner_id: owner,
            destination: payload.destination.trim().to_string(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            budget_max: payload.budget_max,
            description: payload.description.clone(),
            travel_styles: payload.travel_styles.clone(),
            created_at: Utc::now(),
        };
        self.trip_requests.push(request.clone());
        Ok(request)
    }

    pub fn delete_trip_request(&mut self, owner: UserId, id: TripRequestId) -> MockResult<()> {
        let request = self
            .trip_requests
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(Rejection::not_found)?;
        if request.owner_id != owner {
            return Err(Rejection::forbidden());
        }
        self.trip_requests.retain(|r| r.id != id);
        Ok(())
    }

    // Offers

    pub fn submit_offer(&mut self, sender: UserId, payload: &OfferPayload) -> MockResult<Offer> {
        let vacancy = self
            .vacancies
            .iter()
            .find(|v| v.id == payload.vacancy_id)
            .ok_or_else(|| Rejection::field("vacancy_id", "Trip vacancy does not exist."))?;
        if payload.message.trim().is_empty() {
            return Err(Rejection::field("message", "This field may not be blank."));
        }
        if vacancy.owner_id == sender {
            return Err(Rejection::form("You cannot send an offer to your own trip."));
        }
        if !vacancy.is_open() {
            return Err(Rejection::form("This trip is not accepting offers."));
        }
        let duplicate = self.offers.iter().any(|o| {
            o.vacancy_id == payload.vacancy_id && o.sender_id == sender && o.status == OfferStatus::Pending
        });
        if duplicate {
            return Err(Rejection::form("You already have a pending offer for this trip."));
        }

        let offer = Offer {
            id: self.next_id(),
            vacancy_id: payload.vacancy_id,
            sender_id: sender,
            message: payload.message.trim().to_string(),
            status: OfferStatus::Pending,
            created_at: Utc::now(),
        };
        self.offers.push(offer.clone());
        Ok(offer)
    }

    #[must_use]
    pub fn offers_from(&self, sender: UserId) -> Vec<Offer> {
        self.offers
            .iter()
            .filter(|o| o.sender_id == sender)
            .cloned()
            .collect()
    }

    fn offer_index(&self, id: OfferId) -> MockResult<usize> {
        self.offers
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(Rejection::not_found)
    }

    /// Owner decision on a pending offer
    pub fn decide_offer(&mut self, owner: UserId, id: OfferId, accept: bool) -> MockResult<Offer> {
        let index = self.offer_index(id)?;
        let vacancy_id = self.offers[index].vacancy_id;
        let spots_available = self.owned_vacancy_mut(owner, vacancy_id)?.spots_available;
        if self.offers[index].status != OfferStatus::Pending {
            return Err(Rejection::form("Only pending offers can be answered."));
        }
        if !accept {
            self.offers[index].status = OfferStatus::Rejected;
            return Ok(self.offers[index].clone());
        }
        if spots_available == 0 {
            return Err(Rejection::form("This trip is already full."));
        }

        self.offers[index].status = OfferStatus::Accepted;
        let vacancy = self.owned_vacancy_mut(owner, vacancy_id)?;
        vacancy.spots_available -= 1;
        if vacancy.spots_available == 0 {
            vacancy.status = VacancyStatus::Full;
        }
        Ok(self.offers[index].clone())
    }

    pub fn withdraw_offer(&mut self, sender: UserId, id: OfferId) -> MockResult<Offer> {
        let index = self.offer_index(id)?;
        let offer = &mut self.offers[index];
        if offer.sender_id != sender {
            return Err(Rejection::forbidden());
        }
        if offer.status != OfferStatus::Pending {
            return Err(Rejection::form("Only pending offers can be withdrawn."));
        }
        offer.status = OfferStatus::Withdrawn;
        Ok(offer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn store() -> (MockStore, UserId, UserId) {
        let store = MockStore::seeded(today());
        let demo = store.authenticate(DEMO_EMAIL, DEMO_PASSWORD).unwrap().id;
        let host = store.authenticate(HOST_EMAIL, HOST_PASSWORD).unwrap().id;
        (store, demo, host)
    }

    fn offer(vacancy_id: VacancyId) -> OfferPayload {
        OfferPayload {
            vacancy_id,
            message: "Count me in".to_string(),
        }
    }

    #[test]
    fn test_seed_has_two_host_vacancies() {
        let (store, demo, host) = store();
        assert_eq!(store.vacancies_of(host).len(), 2);
        assert!(store.vacancies_of(demo).is_empty());
        assert!(store.profile(demo).unwrap().city.is_some());
    }

    #[test]
    fn test_bad_password_is_unauthorized() {
        let (store, ..) = store();
        let err = store.authenticate(DEMO_EMAIL, "wrong").unwrap_err();
        assert_eq!(err.status(), 401);
    }

    #[test]
    fn test_accepting_last_spot_marks_full() {
        let (mut store, demo, host) = store();
        let vacancy_id = store.vacancies_of(host)[0].id;
        let first = store.submit_offer(demo, &offer(vacancy_id)).unwrap();
        store.decide_offer(host, first.id, true).unwrap();

        let third = store.add_account("third@tripmate.test", "password1", "Kim", "Third");
        let second = store.submit_offer(third, &offer(vacancy_id)).unwrap();
        let accepted = store.decide_offer(host, second.id, true).unwrap();
        assert_eq!(accepted.status, OfferStatus::Accepted);

        let vacancy = store.vacancy(vacancy_id).unwrap();
        assert_eq!(vacancy.spots_available, 0);
        assert_eq!(vacancy.status, VacancyStatus::Full);

        let fourth = store.add_account("fourth@tripmate.test", "password1", "Lee", "Fourth");
        let err = store.submit_offer(fourth, &offer(vacancy_id)).unwrap_err();
        assert_eq!(
            err.body()["non_field_errors"][0],
            "This trip is not accepting offers."
        );
    }

    #[test]
    fn test_offer_rules() {
        let (mut store, demo, host) = store();
        let vacancy_id = store.vacancies_of(host)[0].id;

        let own = store.submit_offer(host, &offer(vacancy_id)).unwrap_err();
        assert_eq!(own.status(), 400);

        let sent = store.submit_offer(demo, &offer(vacancy_id)).unwrap();
        let duplicate = store.submit_offer(demo, &offer(vacancy_id)).unwrap_err();
        assert_eq!(duplicate.status(), 400);

        let not_owner = store.decide_offer(demo, sent.id, true).unwrap_err();
        assert_eq!(not_owner.status(), 403);
        let not_sender = store.withdraw_offer(host, sent.id).unwrap_err();
        assert_eq!(not_sender.status(), 403);

        let withdrawn = store.withdraw_offer(demo, sent.id).unwrap();
        assert_eq!(withdrawn.status, OfferStatus::Withdrawn);
        assert!(store.withdraw_offer(demo, sent.id).is_err());
        assert!(store.submit_offer(demo, &offer(vacancy_id)).is_ok());
    }

    #[test]
    fn test_pagination_links() {
        let (store, ..) = store();
        let filter = VacancyFilter {
            page_size: Some(1),
            ..VacancyFilter::default()
        };
        let page = store.list_vacancies(&filter, "/api/v1/trip-vacancies/").unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.results.len(), 1);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/trip-vacancies/?page_size=1&page=2")
        );
        assert!(page.previous.is_none());

        let past_end = VacancyFilter {
            page: Some(5),
            ..filter
        };
        let err = store
            .list_vacancies(&past_end, "/api/v1/trip-vacancies/")
            .unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_duplicate_registration_is_field_error() {
        let (mut store, ..) = store();
        let registration = Registration {
            email: DEMO_EMAIL.to_uppercase(),
            password: "long enough".to_string(),
            first_name: "Dup".to_string(),
            last_name: "User".to_string(),
        };
        let err = store.register(&registration).unwrap_err();
        assert_eq!(err.body()["email"][0], "A user with this email already exists.");
    }
}
