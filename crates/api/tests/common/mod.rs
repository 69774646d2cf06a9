#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use healthmesh_api::auth::jwt::{generate_access_token, JwtConfig};
use healthmesh_api::config::ServerConfig;
use healthmesh_api::router::build_app_router;
use healthmesh_api::state::AppState;
use healthmesh_core::types::DbId;
use healthmesh_db::counter_source::PgCounterSource;
use healthmesh_db::repositories::PlatformAdminRepo;
use healthmesh_events::{EmailConfig, EmailService, NotificationDispatcher, ProviderRegistry};
use healthmesh_monitor::MonitorConfig;

/// User id seeded as a platform admin by [`seed_admin`].
pub const ADMIN_USER_ID: DbId = 1;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router against `pool`, with the console email
/// provider and the real operational counter queries.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let registry = ProviderRegistry::new(EmailConfig::default()).unwrap();
    let dispatcher =
        NotificationDispatcher::standard(pool.clone(), EmailService::new(Arc::new(registry)));

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        monitor: Arc::new(MonitorConfig::default()),
        counters: Arc::new(PgCounterSource::new(pool)),
        dispatcher,
    };
    build_app_router(state, &config)
}

/// Register [`ADMIN_USER_ID`] as an active platform admin.
pub async fn seed_admin(pool: &PgPool) {
    PlatformAdminRepo::upsert(pool, ADMIN_USER_ID, "admin@example.com", Some("Admin"))
        .await
        .unwrap();
}

/// A valid bearer token for `user_id`.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, "user", &test_config().jwt).unwrap()
}

/// Send a request with an optional bearer token and JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// GET as the seeded admin.
pub async fn admin_get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&token_for(ADMIN_USER_ID)), None).await
}

/// POST as the seeded admin.
pub async fn admin_post(app: Router, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    send(app, Method::POST, uri, Some(&token_for(ADMIN_USER_ID)), body).await
}

/// PUT as the seeded admin.
pub async fn admin_put(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&token_for(ADMIN_USER_ID)), Some(body)).await
}

/// DELETE as the seeded admin.
pub async fn admin_delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&token_for(ADMIN_USER_ID)), None).await
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
