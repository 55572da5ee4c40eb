//! HTTP routes for the flight API.
//!
//! Defines the Axum router and application state.

use crate::auth::{KeySetCache, TokenVerifier};
use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth, AuthState};
use crate::repositories::FlightCatalog;
use crate::services::UserInfoClient;
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Request timeout applied to every route.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token verifier, sharing one key-set cache across all requests.
    pub verifier: Arc<TokenVerifier>,

    /// Flight data.
    pub flights: Arc<FlightCatalog>,

    /// Profile lookup client.
    pub userinfo: UserInfoClient,
}

impl AppState {
    /// Wire up the process-wide services from configuration.
    ///
    /// The key-set cache starts empty and is populated by the first request
    /// that needs it.
    pub fn new(config: Config) -> Self {
        let key_cache = Arc::new(KeySetCache::new(config.jwks_url()));
        let verifier = Arc::new(TokenVerifier::new(
            key_cache,
            config.audience.clone(),
            config.issuer(),
        ));
        let userinfo = UserInfoClient::new(config.userinfo_url());

        Self {
            config,
            verifier,
            flights: Arc::new(FlightCatalog::mock()),
            userinfo,
        }
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe - public
/// - `/metrics` - Prometheus metrics endpoint - public
/// - `/verify` - Verified claims plus provider profile - requires authentication
/// - `/flights` - Full flight list - requires authentication
/// - `/flights/search?q=` - Flight-number search - requires authentication
/// - Permissive CORS, TraceLayer, 30 second request timeout
/// - HTTP metrics middleware
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        verifier: Arc::clone(&state.verifier),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/verify", get(handlers::verify_token))
        .route("/flights", get(handlers::list_flights))
        .route("/flights/search", get(handlers::search_flights))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. CorsLayer - Answer preflights, add CORS headers
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::{JwksResponse, KeySetSnapshot};
    use crate::observability::metrics::detached_metrics_handle;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use flight_test_utils::crypto_fixtures::{primary_key, TestSigningKey};
    use flight_test_utils::token_builders::TestTokenBuilder;
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use tower::ServiceExt;

    const DOMAIN: &str = "tenant.example.com";
    const AUDIENCE: &str = "https://flights.example.com";

    fn signer() -> TestSigningKey {
        TestSigningKey::new("key-01", primary_key())
    }

    fn test_config() -> Config {
        Config::from_vars(&HashMap::from([
            ("AUTH0_DOMAIN".to_string(), DOMAIN.to_string()),
            ("AUTH0_AUDIENCE".to_string(), AUDIENCE.to_string()),
            (
                "AUTH0_BASE_URL".to_string(),
                "http://127.0.0.1:9".to_string(),
            ),
        ]))
        .unwrap()
    }

    /// Router whose key set is preloaded with the test signing key.
    fn test_app() -> Router {
        let config = test_config();
        let jwks: JwksResponse =
            serde_json::from_value(serde_json::json!({ "keys": [signer().jwk_json()] })).unwrap();
        let verifier = Arc::new(TokenVerifier::new(
            Arc::new(KeySetCache::preloaded(KeySetSnapshot::from_jwks(&jwks))),
            config.audience.clone(),
            config.issuer(),
        ));
        let state = Arc::new(AppState {
            userinfo: UserInfoClient::new(config.userinfo_url()),
            config,
            verifier,
            flights: Arc::new(FlightCatalog::mock()),
        });

        build_routes(state, detached_metrics_handle().unwrap())
    }

    async fn get(uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let response = test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        (status, body)
    }

    fn valid_token() -> String {
        TestTokenBuilder::new(DOMAIN, AUDIENCE).sign(&signer())
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_new_loads_catalog() {
        let state = AppState::new(test_config());
        assert_eq!(state.flights.all().len(), 5);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = get("/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_protected_routes_require_auth() {
        for uri in ["/flights", "/flights/search?q=aa", "/verify"] {
            let (status, body) = get(uri, None).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"], "Missing or invalid Authorization header");
        }
    }

    #[tokio::test]
    async fn test_flights_with_valid_token() {
        let (status, body) = get("/flights", Some(&valid_token())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
        assert_eq!(body[0]["flightNumber"], "AA123");
        assert_eq!(body[4]["id"], 5);
    }

    #[tokio::test]
    async fn test_search_routes() {
        let token = valid_token();

        let (status, body) = get("/flights/search?q=aa123", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], 1);

        let (status, body) = get("/flights/search", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));

        let (_, body) = get("/flights/search?q=%20%20", Some(&token)).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_search_uses_first_repeated_query() {
        let (status, body) = get("/flights/search?q=aa&q=ua", Some(&valid_token())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["flightNumber"], "AA123");
    }

    #[tokio::test]
    async fn test_not_yet_valid_token_rejected_at_router() {
        let nbf = chrono::Utc::now().timestamp() + 86_400;
        let token = TestTokenBuilder::new(DOMAIN, AUDIENCE)
            .with_claim("nbf", serde_json::json!(nbf))
            .sign(&signer());

        let (status, body) = get("/flights", Some(&token)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unable to verify token");
    }

    #[tokio::test]
    async fn test_expired_token_rejected_at_router() {
        let token = TestTokenBuilder::new(DOMAIN, AUDIENCE)
            .expires_in(-10)
            .sign(&signer());

        let (status, body) = get("/flights", Some(&token)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token has expired");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get("/nope", Some(&valid_token())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
