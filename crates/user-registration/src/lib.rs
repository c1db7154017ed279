//! User registration data model.
//!
//! Both sides of the auth proxy agree on what a well-formed registration
//! looks like:
//! - the client checks every rule before spending a round-trip
//! - the proxy re-checks presence and email format before going upstream

mod error;

pub use error::ValidationError;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Email shape accepted on both sides of the proxy.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"));

/// Check an email address against [`EMAIL_PATTERN`].
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Registration payload sent to the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Run the client-side rules in order; the first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::UsernameRequired);
        }

        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }

        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(())
    }

    /// Build a request from untyped user data.
    ///
    /// Missing or non-string fields are treated as empty so that
    /// [`validate`](Self::validate) reports them with the usual message.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::MalformedUserData)?;
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Self {
            username: field("username"),
            email: field("email"),
            password: field("password"),
        })
    }
}
