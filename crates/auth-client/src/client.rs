//! Auth proxy HTTP client.

use crate::error::{ClientError, RequestError};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use user_registration::RegistrationRequest;

/// Facade over the proxy's `/api/auth` routes.
#[derive(Clone)]
pub struct UserService {
    client: Client,
    base_url: String,
}

impl UserService {
    /// Create a new client. `base_url` points at the proxy's `/api/auth` prefix.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::build(Client::builder(), base_url)
    }

    /// Create a new client that gives up on requests after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        Self::build(Client::builder().timeout(timeout), base_url)
    }

    fn build(
        builder: reqwest::ClientBuilder,
        base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the proxy to check its upstream connection.
    pub async fn test_connection(&self) -> Result<Value, ClientError> {
        self.request("/test-connection", Method::GET, None)
            .await
            .map_err(|e| {
                warn!(error = %e, "Connection test failed");
                ClientError::ConnectionTest(e)
            })
    }

    /// Validate and register a user. Nothing is sent if validation fails.
    ///
    /// Failures carry the server's `message`. Without one, the transport text
    /// (`request failed: <status>`, network or parse error) is used instead.
    pub async fn register(&self, user: &RegistrationRequest) -> Result<Value, ClientError> {
        user.validate()?;

        let body = json!({
            "username": user.username,
            "email": user.email,
            "password": user.password,
        });

        self.request("/register", Method::POST, Some(&body))
            .await
            .map_err(|e| {
                warn!(error = %e, "Registration failed");
                ClientError::Registration {
                    status_code: e.status_code(),
                    message: e.to_string(),
                }
            })
    }

    /// Register from untyped user data, e.g. straight from a form.
    pub async fn register_value(&self, user: &Value) -> Result<Value, ClientError> {
        let request = RegistrationRequest::from_value(user)?;
        self.register(&request).await
    }

    /// Send one request to the proxy and return its parsed JSON body.
    #[instrument(skip(self, body), fields(has_body = body.is_some()))]
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, RequestError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let sends_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");
        if let (true, Some(body)) = (sends_body, body) {
            request = request.body(body.to_string());
        }

        debug!(%method, url = %url, "Sending request");

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;

        debug!(%method, url = %url, %status, "Request completed");

        let data: Value = serde_json::from_slice(&bytes).map_err(|_| RequestError::Parse)?;

        if status.is_success() {
            return Ok(data);
        }

        let message = data
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed: {}", status.as_u16()));

        Err(RequestError::Status {
            status_code: status.as_u16(),
            message,
        })
    }
}
