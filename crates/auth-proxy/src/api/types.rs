//! API response types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response body for every outcome the proxy produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,

    /// Upstream body attached to failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// ISO-8601 time of a successful connection test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Created user as returned by upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

impl Envelope {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            details: None,
            timestamp: None,
            user: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at.to_rfc3339_opts(SecondsFormat::Millis, true));
        self
    }

    pub fn with_user(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_optional_fields_are_omitted() {
        let body = serde_json::to_value(Envelope::failure("path not found")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "path not found" }));
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let envelope = Envelope::success("connection succeeded").with_timestamp(at);
        assert_eq!(envelope.timestamp.as_deref(), Some("2024-05-01T12:30:00.000Z"));
    }

    #[test]
    fn test_user_and_details() {
        let body = serde_json::to_value(
            Envelope::success("registration succeeded").with_user(json!({ "id": 1 })),
        )
        .unwrap();
        assert_eq!(body["user"]["id"], 1);
        assert!(body.get("details").is_none());

        let body = serde_json::to_value(
            Envelope::failure("registration failed").with_details(json!({ "raw": "oops" })),
        )
        .unwrap();
        assert_eq!(body["details"]["raw"], "oops");
    }
}
