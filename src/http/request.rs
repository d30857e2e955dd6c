//! Transport-neutral request and response values

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TripmateError;
use crate::forms::FormErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Request against a path relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, TripmateError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Path plus percent-encoded query string
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// JSON response with the given status
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Result<Self, TripmateError> {
        Ok(Self::new(status, serde_json::to_string(value)?))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == STATUS_UNAUTHORIZED
    }

    /// Map non-2xx statuses onto [`TripmateError`]
    pub fn error_for_status(self) -> Result<Self, TripmateError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(match self.status {
            STATUS_BAD_REQUEST => TripmateError::Rejected {
                errors: FormErrors::from_response_body(&self.body),
            },
            STATUS_UNAUTHORIZED => TripmateError::Unauthenticated,
            STATUS_FORBIDDEN => TripmateError::Forbidden {
                message: detail_message(&self.body),
            },
            STATUS_NOT_FOUND => TripmateError::not_found(detail_message(&self.body)),
            status => TripmateError::api(status, detail_message(&self.body)),
        })
    }

    /// Check the status, then decode the JSON body
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, TripmateError> {
        let response = self.error_for_status()?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Check the status and discard the body
    pub fn into_empty(self) -> Result<(), TripmateError> {
        self.error_for_status().map(|_| ())
    }
}

fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_query_is_percent_encoded() {
        let request = ApiRequest::get("/api/v1/trip-vacancies/").with_query(vec![
            ("destination".to_string(), "São Paulo".to_string()),
            ("page".to_string(), "2".to_string()),
        ]);
        assert_eq!(
            request.path_and_query(),
            "/api/v1/trip-vacancies/?destination=S%C3%A3o%20Paulo&page=2"
        );
    }

    #[rstest]
    #[case(400, r#"{"title": ["required"]}"#)]
    #[case(401, "")]
    #[case(403, r#"{"detail": "Not yours"}"#)]
    #[case(404, r#"{"detail": "Not found."}"#)]
    #[case(502, "Bad Gateway")]
    fn test_error_mapping(#[case] status: u16, #[case] body: &str) {
        let err = ApiResponse::new(status, body).error_for_status().unwrap_err();
        match status {
            400 => assert_eq!(
                err.form_errors().and_then(|e| e.get("title")),
                Some("required")
            ),
            401 => assert!(matches!(err, TripmateError::Unauthenticated)),
            403 => assert!(matches!(err, TripmateError::Forbidden { ref message } if message == "Not yours")),
            404 => assert!(matches!(err, TripmateError::NotFound { .. })),
            _ => assert!(matches!(err, TripmateError::Api { status: 502, ref message } if message == "Bad Gateway")),
        }
    }

    #[test]
    fn test_into_json() {
        let response = ApiResponse::new(200, r#"{"count": 3}"#);
        let value: serde_json::Value = response.into_json().unwrap();
        assert_eq!(value["count"], 3);
    }
}
