//! Configuration for the auth proxy.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variables that must be set for the proxy to reach upstream.
pub const REQUIRED_SETTINGS: [&str; 2] = ["SUPABASE_URL", "SUPABASE_KEY"];

/// Proxy configuration, read from the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Upstream BaaS base URL
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Upstream BaaS API key
    #[serde(default)]
    pub supabase_key: Option<SecretString>,

    /// Listen host (local runs only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Set by the hosting platform
    #[serde(default)]
    pub vercel: Option<String>,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upstream request timeout in seconds (none by default)
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,

    /// `.env` file that was loaded, if any
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

/// Credentials for the upstream REST API.
#[derive(Debug, Clone)]
pub struct UpstreamCredentials {
    pub base_url: String,
    pub api_key: SecretString,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        let env_file = dotenvy::dotenv().ok();

        Self::with_env_file(env_file)
    }

    /// Load configuration after reading variables from the given env file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let env_file = dotenvy::from_path(path).ok().map(|_| path.to_path_buf());

        Self::with_env_file(env_file)
    }

    fn with_env_file(env_file: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::build(config::Environment::default())?;
        config.env_file = env_file;
        Ok(config)
    }

    /// Load configuration from an explicit variable map instead of the process environment.
    pub fn from_source(vars: HashMap<String, String>) -> Result<Self> {
        Self::build(config::Environment::default().source(Some(vars)))
    }

    fn build(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment.separator("__").try_parsing(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Whether the proxy runs under the hosting platform.
    pub fn is_hosted(&self) -> bool {
        self.vercel.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Address to bind. The hosting platform owns the host name, so only the port is kept there.
    pub fn listen_addr(&self) -> String {
        if self.is_hosted() {
            format!("0.0.0.0:{}", self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    /// Upstream credentials, or the names of the settings that are missing.
    ///
    /// Empty values count as missing. There is no fallback value for either setting.
    pub fn credentials(&self) -> Result<UpstreamCredentials, ConfigError> {
        use secrecy::ExposeSecret;

        let base_url = self.supabase_url.as_deref().filter(|v| !v.is_empty());
        let api_key = self
            .supabase_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty());

        match (base_url, api_key) {
            (Some(base_url), Some(api_key)) => Ok(UpstreamCredentials {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.clone(),
            }),
            (base_url, api_key) => {
                let mut missing = Vec::new();
                if base_url.is_none() {
                    missing.push(REQUIRED_SETTINGS[0]);
                }
                if api_key.is_none() {
                    missing.push(REQUIRED_SETTINGS[1]);
                }
                Err(ConfigError::MissingSettings(missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_source(HashMap::new()).unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(!config.is_hosted());
        assert_eq!(config.listen_addr(), "localhost:3000");
        assert!(config.upstream_timeout().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_source(vars(&[
            ("SUPABASE_URL", "https://project.example.co/"),
            ("SUPABASE_KEY", "anon-key"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("UPSTREAM_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.upstream_timeout(), Some(Duration::from_secs(15)));

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.base_url, "https://project.example.co");
        assert_eq!(credentials.api_key.expose_secret(), "anon-key");
    }

    #[test]
    fn test_missing_credentials_are_named() {
        let config = Config::from_source(HashMap::new()).unwrap();
        assert_eq!(
            config.credentials().unwrap_err(),
            ConfigError::MissingSettings(vec!["SUPABASE_URL", "SUPABASE_KEY"])
        );

        let config = Config::from_source(vars(&[
            ("SUPABASE_URL", "https://project.example.co"),
            ("SUPABASE_KEY", ""),
        ]))
        .unwrap();
        let err = config.credentials().unwrap_err();
        assert_eq!(err, ConfigError::MissingSettings(vec!["SUPABASE_KEY"]));
        assert_eq!(
            err.to_string(),
            "missing required environment variables: SUPABASE_KEY"
        );
    }

    #[test]
    fn test_hosted_flag() {
        let config = Config::from_source(vars(&[("VERCEL", "1"), ("PORT", "4000")])).unwrap();
        assert!(config.is_hosted());
        assert_eq!(config.listen_addr(), "0.0.0.0:4000");

        let config = Config::from_source(vars(&[("VERCEL", "")])).unwrap();
        assert!(!config.is_hosted());
    }

    #[test]
    fn test_env_file_is_recorded() {
        let missing = Config::load_from("/nonexistent/auth-proxy/.env").unwrap();
        assert!(missing.env_file.is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "AUTH_PROXY_ENV_FILE_MARKER=1\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.env_file.as_deref(), Some(path.as_path()));
        assert!(Config::from_source(HashMap::new()).unwrap().env_file.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Config::from_source(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
