//! Client for the auth proxy.
//!
//! Validates registration data locally, then calls the proxy and folds
//! every transport or server failure into one `Result`.

mod client;
mod error;

pub use client::UserService;
pub use error::{ClientError, RequestError};
pub use user_registration::{RegistrationRequest, ValidationError};
