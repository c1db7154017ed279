//! Auth Proxy - keeps the BaaS API key on the server side.
//!
//! This proxy sits between a frontend and a backend-as-a-service REST API to:
//! - Check that the upstream API is reachable with the stored key
//! - Validate and forward user registrations
//! - Map every outcome into one JSON envelope shape

pub mod api;
pub mod config;
pub mod error;
pub mod upstream;

pub use api::{create_router, AppState, Envelope};
pub use config::{Config, ConfigError, UpstreamCredentials};
pub use error::ProxyError;
pub use upstream::{BaasClient, UpstreamReply};
