//! Data models for the Tripmate client
//!
//! Plain request/response records mirrored from the backend API:
//! - User: accounts and authentication payloads
//! - Profile: traveller profiles and option catalogs
//! - Vacancy: trips looking for companions
//! - Trip request / Offer: demand side of the matching
//! - Page: list pagination envelope

pub mod offer;
pub mod page;
pub mod profile;
pub mod trip_request;
pub mod user;
pub mod vacancy;

// Re-export all public types for convenient access
pub use offer::{Offer, OfferId, OfferPayload, OfferStatus};
pub use page::Page;
pub use profile::{CatalogOption, Gender, OptionId, Profile, ProfileUpdate, age_between};
pub use trip_request::{TripRequest, TripRequestId, TripRequestPayload};
pub use user::{AuthResponse, Credentials, RefreshRequest, RefreshResponse, Registration, User, UserId};
pub use vacancy::{GenderPreference, TripVacancy, VacancyId, VacancyPayload, VacancyStatus};
