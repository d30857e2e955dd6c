use serde::{Deserialize, Serialize};

use super::{FormErrors, char_len, looks_like_email};
use crate::models::{Credentials, Registration};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::default();
        let email = self.email.trim().to_lowercase();

        errors.check(!email.is_empty(), "email", "Email is required");
        errors.check(looks_like_email(&email), "email", "Enter a valid email address");
        errors.check(!self.password.is_empty(), "password", "Password is required");

        errors.into_result(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FormErrors> {
        let mut errors = FormErrors::default();
        let email = self.email.trim().to_lowercase();
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();

        errors.check(!email.is_empty(), "email", "Email is required");
        errors.check(looks_like_email(&email), "email", "Enter a valid email address");
        errors.check(!first_name.is_empty(), "first_name", "First name is required");
        errors.check(!last_name.is_empty(), "last_name", "Last name is required");
        errors.check(
            char_len(&self.password) >= MIN_PASSWORD_LENGTH,
            "password",
            "Password must be at least 8 characters",
        );
        errors.check(
            self.password == self.password_confirmation,
            "password_confirmation",
            "Passwords do not match",
        );

        errors.into_result(Registration {
            email,
            password: self.password.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_normalises_email() {
        let credentials = LoginForm::new("  Ana@Example.COM ", "secret").validate().unwrap();
        assert_eq!(credentials.email, "ana@example.com");
    }

    #[test]
    fn test_login_reports_each_field() {
        let errors = LoginForm::new("", "").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_register_password_rules() {
        let form = RegisterForm {
            email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            password: "short".to_string(),
            password_confirmation: "shorter".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("password").is_some());
        assert_eq!(errors.get("password_confirmation"), Some("Passwords do not match"));
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn test_register_valid() {
        let form = RegisterForm {
            email: "ana@example.com".to_string(),
            first_name: " Ana ".to_string(),
            last_name: "Silva".to_string(),
            password: "long enough".to_string(),
            password_confirmation: "long enough".to_string(),
        };
        let registration = form.validate().unwrap();
        assert_eq!(registration.first_name, "Ana");
    }
}
