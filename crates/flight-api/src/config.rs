//! Flight API configuration.
//!
//! Configuration is loaded from environment variables. The identity-provider
//! domain and the expected audience are required; the process must not start
//! serving without them.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5004";

/// Default graceful-shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Flight API configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity-provider domain (bare host, e.g. "tenant.us.auth0.com").
    pub domain: String,

    /// Audience every accepted token must carry.
    pub audience: String,

    /// Server bind address (default: "0.0.0.0:5004").
    pub bind_address: String,

    /// Base URL for outbound calls to the identity provider.
    ///
    /// Defaults to `https://{domain}`. Overriding it does not change the
    /// expected issuer, which is always derived from `domain`.
    pub idp_base_url: String,

    /// Seconds to wait for in-flight requests after a shutdown signal.
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid identity provider domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let domain = required(vars, "AUTH0_DOMAIN")?;

        if domain.contains("://") || domain.contains('/') {
            return Err(ConfigError::InvalidDomain(format!(
                "AUTH0_DOMAIN must be a bare host without scheme or path, got '{}'",
                domain
            )));
        }

        let audience = required(vars, "AUTH0_AUDIENCE")?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let idp_base_url = vars
            .get("AUTH0_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}", domain));

        let drain_seconds = if let Some(value_str) = vars.get("API_DRAIN_SECONDS") {
            value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "API_DRAIN_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_DRAIN_SECONDS
        };

        Ok(Config {
            domain,
            audience,
            bind_address,
            idp_base_url,
            drain_seconds,
        })
    }

    /// Issuer every accepted token must carry: `https://{domain}/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Key-discovery endpoint of the identity provider.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.idp_base_url)
    }

    /// Profile endpoint of the identity provider.
    pub fn userinfo_url(&self) -> String {
        format!("{}/userinfo", self.idp_base_url)
    }
}

/// Fetch a required variable, treating blank values as missing.
fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}
