//! HTTP plumbing shared by the authenticated wrapper and the API client

pub mod request;
pub mod transport;

pub use request::{ApiRequest, ApiResponse, Method};
pub use transport::{HttpTransport, ReqwestTransport};
