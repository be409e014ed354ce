//! Shared test harness for API integration tests.
//!
//! Mirrors the router construction in `main.rs` (middleware stack
//! included) so integration tests exercise the same request path that
//! production uses, with the mock transfer provider standing in for the
//! payment processor.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use axum::http::HeaderName;
use leadex_api::auth::jwt::{generate_access_token, JwtConfig};
use leadex_api::config::ServerConfig;
use leadex_api::routes;
use leadex_api::state::AppState;
use leadex_core::config::MarketplaceConfig;
use leadex_events::EventBus;
use leadex_payments::MockTransferProvider;

/// Build a test `ServerConfig` with a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and a mock transfer provider.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_provider(pool, Arc::new(MockTransferProvider::new()))
}

/// Same as [`build_test_app`] but with a caller-controlled provider, for
/// tests that script transfer outcomes.
pub fn build_test_app_with_provider(pool: PgPool, provider: Arc<MockTransferProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config),
        market: Arc::new(MarketplaceConfig::default()),
        event_bus: Arc::new(EventBus::default()),
        transfer_provider: provider,
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Mint an access token the way the identity provider would.
pub fn token(external_id: &str, role: &str) -> String {
    generate_access_token(external_id, role, &test_config().jwt).expect("token generation")
}

/// Issue a GET request without authentication.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request dispatch")
}

/// Issue a GET request with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request dispatch")
}

/// Issue a POST with a JSON body and bearer token.
pub async fn post_json(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request dispatch")
}

/// Issue a PUT with a JSON body and bearer token.
pub async fn put_json(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request dispatch")
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}
