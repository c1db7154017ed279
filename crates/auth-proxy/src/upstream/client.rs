//! BaaS REST API client for the `users` resource.

use super::UpstreamReply;
use crate::config::UpstreamCredentials;
use crate::error::ProxyError;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const USERS_PATH: &str = "/rest/v1/users";

/// Upstream client. The API key is only ever written into request headers.
#[derive(Clone)]
pub struct BaasClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl BaasClient {
    /// Create a new upstream client. `timeout` of `None` waits indefinitely.
    pub fn new(
        credentials: UpstreamCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self, ProxyError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: credentials.base_url,
            api_key: credentials.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}{}", self.base_url, USERS_PATH)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
            .header("Accept", "application/json")
    }

    /// Zero-row read of the users resource, used as a cheap reachability check.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<UpstreamReply, ProxyError> {
        let url = format!("{}?limit=0", self.users_url());
        debug!(url = %url, "Sending connection probe");

        let response = self.authorize(self.client.get(&url)).send().await.map_err(|e| {
            warn!(error = %e, "Upstream connection probe failed");
            ProxyError::from(e)
        })?;

        let reply = read_reply(response).await?;
        info!(status = reply.status, "Upstream probe answered");
        Ok(reply)
    }

    /// Create a user row from the given JSON body.
    #[instrument(skip(self, user))]
    pub async fn create_user(&self, user: &Value) -> Result<UpstreamReply, ProxyError> {
        let url = self.users_url();
        debug!(url = %url, "Sending create-user request");

        let response = self
            .authorize(self.client.post(&url))
            .json(user)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Upstream create-user request failed");
                ProxyError::from(e)
            })?;

        let reply = read_reply(response).await?;
        info!(status = reply.status, "Upstream create-user answered");
        Ok(reply)
    }
}

async fn read_reply(response: reqwest::Response) -> Result<UpstreamReply, ProxyError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(UpstreamReply { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let credentials = UpstreamCredentials {
            base_url: "http://localhost:9999".into(),
            api_key: SecretString::new("test-key".into()),
        };
        let client = BaasClient::new(credentials, Some(Duration::from_secs(5))).unwrap();

        assert_eq!(client.base_url(), "http://localhost:9999");
        assert_eq!(client.users_url(), "http://localhost:9999/rest/v1/users");
    }
}
