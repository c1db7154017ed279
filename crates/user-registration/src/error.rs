//! Validation errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed user data")]
    MalformedUserData,

    #[error("username required")]
    UsernameRequired,

    #[error("email required")]
    EmailRequired,

    #[error("invalid email format")]
    InvalidEmail,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}
