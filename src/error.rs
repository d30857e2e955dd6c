//! Error types and handling for the Tripmate client

use thiserror::Error;

use crate::forms::FormErrors;

/// Failure of a token refresh.
///
/// Every caller waiting on the same in-flight refresh receives a clone of
/// this value, so it only carries owned, cloneable data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The session holds no refresh token
    #[error("no refresh token in session")]
    MissingRefreshToken,

    /// The backend refused the refresh token
    #[error("refresh token rejected with status {status}")]
    Rejected { status: u16 },

    /// The refresh call never produced a response
    #[error("refresh request failed: {message}")]
    Transport { message: String },

    /// The backend answered with something other than a token
    #[error("invalid refresh response: {message}")]
    InvalidResponse { message: String },

    /// Reading or writing the session failed mid-refresh
    #[error("session storage failed during refresh: {message}")]
    Storage { message: String },
}

/// Main error type for the Tripmate client
#[derive(Error, Debug)]
pub enum TripmateError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The request never reached the backend or the response was lost
    #[error("Network error: {message}")]
    Network { message: String },

    /// Unexpected backend status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Backend rejected a submitted payload (HTTP 400)
    #[error("Request rejected: {errors}")]
    Rejected { errors: FormErrors },

    /// Client-side form validation failed, nothing was sent
    #[error("Invalid input: {errors}")]
    Validation { errors: FormErrors },

    /// Authenticated but not allowed (HTTP 403)
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Resource does not exist (HTTP 404)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// No usable credentials in the session
    #[error("Not signed in")]
    Unauthenticated,

    /// Credentials were refreshed and still rejected
    #[error("Session expired")]
    SessionExpired,

    /// Token refresh failed; the session has been cleared
    #[error("Token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// Session storage errors
    #[error("Session storage error: {message}")]
    Storage { message: String },

    /// JSON encoding or decoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Client-side validation failures surface as [`TripmateError::Validation`]
impl From<FormErrors> for TripmateError {
    fn from(errors: FormErrors) -> Self {
        Self::Validation { errors }
    }
}

impl TripmateError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// True when the front end should purge local state and show the login screen
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            TripmateError::Unauthenticated
                | TripmateError::SessionExpired
                | TripmateError::Refresh(_)
        )
    }

    /// Field errors to render inline next to form inputs, if any
    #[must_use]
    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            TripmateError::Rejected { errors } | TripmateError::Validation { errors } => {
                Some(errors)
            }
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripmateError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TripmateError::Network { .. } => {
                "Unable to reach Tripmate. Please check your internet connection.".to_string()
            }
            TripmateError::Api { status, .. } => {
                format!("Something went wrong on our side (status {status}). Please try again.")
            }
            TripmateError::Rejected { errors } | TripmateError::Validation { errors } => {
                format!("Please correct the highlighted fields: {errors}")
            }
            TripmateError::Forbidden { .. } => {
                "You are not allowed to do that.".to_string()
            }
            TripmateError::NotFound { .. } => "That item no longer exists.".to_string(),
            TripmateError::Unauthenticated => "Please log in to continue.".to_string(),
            TripmateError::SessionExpired | TripmateError::Refresh(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            TripmateError::Storage { .. } => {
                "Could not access saved session data.".to_string()
            }
            TripmateError::Serialization { .. } => {
                "Received an unexpected response from Tripmate.".to_string()
            }
            TripmateError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures() {
        assert!(TripmateError::Unauthenticated.is_auth_failure());
        assert!(TripmateError::SessionExpired.is_auth_failure());
        assert!(TripmateError::from(RefreshError::MissingRefreshToken).is_auth_failure());
        assert!(!TripmateError::api(500, "boom").is_auth_failure());
        assert!(!TripmateError::network("offline").is_auth_failure());
    }

    #[test]
    fn test_user_messages() {
        assert!(TripmateError::Unauthenticated.user_message().contains("log in"));
        assert!(
            TripmateError::from(RefreshError::Rejected { status: 401 })
                .user_message()
                .contains("expired")
        );

        let mut errors = FormErrors::default();
        errors.add("title", "Title is required");
        let err = TripmateError::Validation { errors };
        assert!(err.user_message().contains("Title is required"));
        assert!(err.form_errors().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TripmateError = io_err.into();
        assert!(matches!(err, TripmateError::Io { .. }));
    }
}
