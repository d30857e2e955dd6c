//! Tripmate - find travel companions and join trips
//!
//! Typed client for the Tripmate REST backend: trip vacancies, trip
//! requests, offers and profiles, behind an authentication layer that keeps
//! bearer tokens fresh. An in-memory backend in [`mock`] stands in for the
//! network during development and tests.

pub mod api;
pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod http;
pub mod logging;
pub mod mock;
pub mod models;
pub mod session;

// Re-export core types for public API
pub use api::TripmateClient;
pub use auth::{AuthenticatedClient, RefreshCoordinator};
pub use config::TripmateConfig;
pub use error::{RefreshError, TripmateError};
pub use filters::{TripRequestFilter, VacancyFilter};
pub use forms::FormErrors;
pub use http::{ApiRequest, ApiResponse, HttpTransport};
pub use mock::MockServer;
pub use session::{Session, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripmateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
