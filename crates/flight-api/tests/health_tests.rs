//! Health endpoint integration tests.
//!
//! Tests the `/health` endpoint using the `TestFlightServer` harness.

use flight_test_utils::{MockIdentityProvider, TestFlightServer};

/// Test that health endpoint returns 200 and the fixed payload.
#[tokio::test]
async fn test_health_endpoint_returns_200() -> Result<(), anyhow::Error> {
    let idp = MockIdentityProvider::start().await;
    let server = TestFlightServer::spawn(&idp.uri()).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    Ok(())
}

/// Test that health endpoint returns JSON content type.
#[tokio::test]
async fn test_health_endpoint_returns_json() -> Result<(), anyhow::Error> {
    let idp = MockIdentityProvider::start().await;
    let server = TestFlightServer::spawn(&idp.uri()).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    assert!(
        content_type.is_some_and(|ct| ct.contains("application/json")),
        "Expected application/json content type, got {:?}",
        content_type
    );

    Ok(())
}

/// Test that health does not depend on the identity provider.
#[tokio::test]
async fn test_health_does_not_touch_identity_provider() -> Result<(), anyhow::Error> {
    // Nothing mounted: any provider call would 404.
    let idp = MockIdentityProvider::start().await;
    let server = TestFlightServer::spawn(&idp.uri()).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), 200);
    assert_eq!(idp.jwks_request_count().await, 0);

    Ok(())
}

/// Test that non-existent routes return 404.
#[tokio::test]
async fn test_unknown_route_returns_404() -> Result<(), anyhow::Error> {
    let idp = MockIdentityProvider::start().await;
    let server = TestFlightServer::spawn(&idp.uri()).await?;

    let response = reqwest::get(format!("{}/nonexistent", server.url())).await?;

    assert_eq!(response.status(), 404);

    Ok(())
}

/// Test that CORS preflights from any origin are answered.
#[tokio::test]
async fn test_cors_preflight_allows_any_origin() -> Result<(), anyhow::Error> {
    let idp = MockIdentityProvider::start().await;
    let server = TestFlightServer::spawn(&idp.uri()).await?;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/flights", server.url()))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await?;

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    Ok(())
}
