//! Identity-provider profile lookup.
//!
//! Forwards a verified bearer token to the provider's `/userinfo` endpoint.
//! The lookup is best-effort: every failure yields an empty JSON object and
//! never changes the outcome of the request that asked for it.
//!
//! # Security
//!
//! - Only tokens that already passed verification are forwarded
//! - The token is never logged
//! - Timeouts prevent hanging connections

use common::secret::{ExposeSecret, SecretString};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::observability::metrics::record_userinfo_request;

/// Timeout for profile lookups.
const USERINFO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
enum UserInfoError {
    #[error("Profile request failed: {0}")]
    Request(String),

    #[error("Profile endpoint returned status {0}")]
    Status(u16),

    #[error("Profile response is not JSON: {0}")]
    InvalidBody(String),
}

impl UserInfoError {
    fn label(&self) -> &'static str {
        match self {
            UserInfoError::Request(_) => "request_error",
            UserInfoError::Status(_) => "bad_status",
            UserInfoError::InvalidBody(_) => "invalid_body",
        }
    }
}

/// HTTP client for the provider's profile endpoint.
#[derive(Clone)]
pub struct UserInfoClient {
    client: Client,
    userinfo_url: String,
}

impl UserInfoClient {
    /// Create a client for the given `/userinfo` URL.
    pub fn new(userinfo_url: String) -> Self {
        let client = Client::builder()
            .timeout(USERINFO_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(target: "api.services.userinfo", error = %e, "Failed to build HTTP client with custom config, using defaults");
                Client::new()
            });

        Self {
            client,
            userinfo_url,
        }
    }

    /// Fetch the profile for `token`, or `{}` if it cannot be obtained.
    #[instrument(skip_all, name = "api.services.userinfo")]
    pub async fn fetch_profile(&self, token: &SecretString) -> Value {
        match self.try_fetch(token).await {
            Ok(profile) => {
                record_userinfo_request("success");
                profile
            }
            Err(e) => {
                warn!(target: "api.services.userinfo", error = %e, "Profile lookup failed, returning empty profile");
                record_userinfo_request(e.label());
                Value::Object(serde_json::Map::new())
            }
        }
    }

    async fn try_fetch(&self, token: &SecretString) -> Result<Value, UserInfoError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| UserInfoError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UserInfoError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UserInfoError::InvalidBody(e.to_string()))
    }
}
