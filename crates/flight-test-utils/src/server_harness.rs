//! Test server harness for E2E testing
//!
//! Provides `TestFlightServer` for spawning real flight API instances in tests,
//! pointed at a [`MockIdentityProvider`](crate::idp_mock::MockIdentityProvider).

use flight_api::config::Config;
use flight_api::observability::metrics::detached_metrics_handle;
use flight_api::routes::{self, AppState};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Identity-provider domain used by spawned servers (issuer `https://{domain}/`).
pub const TEST_DOMAIN: &str = "tenant.test.auth0.com";

/// Audience expected by spawned servers.
pub const TEST_AUDIENCE: &str = "https://flights.test.example.com";

/// Test harness for spawning the flight API in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_flow_e2e() -> Result<()> {
///     let idp = MockIdentityProvider::start().await;
///     let server = TestFlightServer::spawn(&idp.uri()).await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestFlightServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestFlightServer {
    /// Spawn a new server instance whose outbound provider calls go to
    /// `idp_base_url`.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    /// - Fetch keys lazily on the first protected request
    pub async fn spawn(idp_base_url: &str) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("AUTH0_DOMAIN".to_string(), TEST_DOMAIN.to_string()),
            ("AUTH0_AUDIENCE".to_string(), TEST_AUDIENCE.to_string()),
            ("AUTH0_BASE_URL".to_string(), idp_base_url.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let metrics_handle = detached_metrics_handle()
            .map_err(|e| anyhow::anyhow!("Failed to build metrics handle: {}", e))?;

        let state = Arc::new(AppState::new(config.clone()));
        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestFlightServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
