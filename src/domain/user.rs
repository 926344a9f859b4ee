//! User identity and credential payloads.
//!
//! [`User`] mirrors the backend's profile object. [`LoginRequest`] and
//! [`RegisterRequest`] are the request bodies for the auth endpoints and carry the
//! client-side checks that run before any network call.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::{FieldErrors, Result};

/// Account role assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// An authenticated account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl User {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body returned by `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize, Validate)]
pub struct LoginRequest {
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Runs the login form checks.
    ///
    /// # Errors
    ///
    /// Returns [`super::LibraryError::Validation`] with one message per failing field.
    pub fn check(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        if let Err(e) = self.validate() {
            merge(&mut errors, e);
        }
        errors.into_result()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Runs the registration form checks.
    ///
    /// # Errors
    ///
    /// Returns [`super::LibraryError::Validation`] with one message per failing field.
    pub fn check(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.first_name.trim().is_empty() {
            errors.add("firstName", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.add("lastName", "Last name is required");
        }
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        if let Err(e) = self.validate() {
            merge(&mut errors, e);
        }
        errors.into_result()
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !email.contains('@') {
        errors.add("email", "Email is invalid");
    }
}

// Derived checks run after the hand-written ones so "required" wins on empty input.
fn merge(errors: &mut FieldErrors, derived: validator::ValidationErrors) {
    for (field, message) in FieldErrors::from(derived).iter() {
        errors.add(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LibraryError;

    fn field_errors(result: Result<()>) -> FieldErrors {
        match result {
            Err(LibraryError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn login_accepts_valid_credentials() {
        assert!(LoginRequest::new("ada@example.com", "secret1").check().is_ok());
    }

    #[test]
    fn login_requires_at_sign_in_email() {
        let errors = field_errors(LoginRequest::new("ada.example.com", "secret1").check());
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn login_reports_required_before_length() {
        let errors = field_errors(LoginRequest::new("", "").check());
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn login_password_needs_six_characters() {
        let errors = field_errors(LoginRequest::new("ada@example.com", "12345").check());
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn register_password_needs_eight_characters() {
        let errors = field_errors(
            RegisterRequest::new("Ada", "Lovelace", "ada@example.com", "secret1").check(),
        );
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn register_requires_names() {
        let errors =
            field_errors(RegisterRequest::new(" ", "", "ada@example.com", "longenough").check());
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
    }

    #[test]
    fn register_body_uses_camel_case() {
        let body = serde_json::to_value(RegisterRequest::new(
            "Ada",
            "Lovelace",
            "ada@example.com",
            "longenough",
        ))
        .unwrap();
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["lastName"], "Lovelace");
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", LoginRequest::new("ada@example.com", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn user_deserializes_from_backend_shape() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"ada@example.com","firstName":"Ada","lastName":"Lovelace","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert!(user.is_admin());
    }
}
