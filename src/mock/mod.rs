//! In-memory backend for offline use and tests
//!
//! [`MockServer`] plugs in where the reqwest transport would, so the
//! authenticated client, refresh logic and API client run unchanged.

pub mod server;
pub mod store;
pub mod tokens;

pub use server::MockServer;
pub use store::{DEMO_EMAIL, DEMO_PASSWORD, HOST_EMAIL, HOST_PASSWORD, MockStore, Rejection};
