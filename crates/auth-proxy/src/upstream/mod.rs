//! Upstream BaaS REST API access.

mod client;

pub use client::BaasClient;

use serde_json::{json, Value};

/// Status and raw body of one upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parsed body. An empty body reads as `{}`, and text that is not JSON is wrapped as `{"raw": ...}`.
    pub fn details(&self) -> Value {
        if self.body.trim().is_empty() {
            return json!({});
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| json!({ "raw": self.body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> UpstreamReply {
        UpstreamReply {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_is_success() {
        assert!(reply(200, "").is_success());
        assert!(reply(201, "").is_success());
        assert!(reply(299, "").is_success());
        assert!(!reply(199, "").is_success());
        assert!(!reply(300, "").is_success());
        assert!(!reply(409, "").is_success());
    }

    #[test]
    fn test_details() {
        assert_eq!(reply(200, "").details(), json!({}));
        assert_eq!(reply(200, "[]").details(), json!([]));
        assert_eq!(
            reply(201, r#"{"id":1,"username":"alice"}"#).details(),
            json!({ "id": 1, "username": "alice" })
        );
        assert_eq!(
            reply(502, "Bad Gateway").details(),
            json!({ "raw": "Bad Gateway" })
        );
    }
}
