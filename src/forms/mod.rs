//! Client-side form validation
//!
//! Each form turns raw user input into a request payload or a set of inline
//! [`FormErrors`]. Backend 400 responses land in the same type, so a front
//! end renders messages from one place whichever side rejected the input.

pub mod auth;
pub mod errors;
pub mod offer;
pub mod profile;
pub mod trip_request;
pub mod vacancy;

pub use auth::{LoginForm, RegisterForm};
pub use errors::{FORM_FIELD, FormErrors};
pub use offer::OfferForm;
pub use profile::ProfileForm;
pub use trip_request::TripRequestForm;
pub use vacancy::VacancyForm;

/// Loose shape check: one `@`, non-empty local part, dotted domain
#[must_use]
pub fn looks_like_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

/// Character count, not byte length
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ana@example.com", true)]
    #[case("a.b+c@mail.example.org", true)]
    #[case("ana@localhost", false)]
    #[case("ana@@example.com", false)]
    #[case("@example.com", false)]
    #[case("ana @example.com", false)]
    #[case("ana@example.", false)]
    #[case("", false)]
    fn test_looks_like_email(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(looks_like_email(value), expected);
    }
}
