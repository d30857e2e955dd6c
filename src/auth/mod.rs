//! Authentication: token inspection, refresh and authenticated requests

pub mod client;
pub mod refresh;
pub mod token;

pub use client::AuthenticatedClient;
pub use refresh::{REFRESH_PATH, RefreshCoordinator};
pub use token::{decode_expiry, expires_within};
