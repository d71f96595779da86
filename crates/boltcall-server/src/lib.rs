//! HTTP server for the Boltcall assistant registry.
//!
//! `/api` carries the JSON API from `boltcall-api` behind Basic auth;
//! `/health` is open.

pub mod auth;
pub mod config;
pub mod error;

pub use crate::config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{Json, Router, middleware, routing::get};
use boltcall_core::store::ConfigStore;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

#[derive(Clone)]
pub struct AppState<S: ConfigStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S: ConfigStore> AppState<S> {
  pub fn new(store: S, auth: AuthConfig) -> Self {
    Self { store: Arc::new(store), auth: Arc::new(auth) }
  }
}

pub fn router<S>(state: AppState<S>) -> Router
where
  S: ConfigStore + 'static,
{
  let api = boltcall_api::api_router(state.store)
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use boltcall_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let hash = auth::hash_password("secret").unwrap();
    let cfg = ServerConfig::from_toml(&format!(
      "auth_username = \"admin\"\nauth_password_hash = \"{hash}\""
    ))
    .unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(AppState::new(store, AuthConfig::from(&cfg)))
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn call(app: &Router, method: &str, uri: &str, auth: Option<&str>, body: &str) -> Response {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      req = req.header(header::AUTHORIZATION, auth);
    }
    if !body.is_empty() {
      req = req.header(header::CONTENT_TYPE, "application/json");
    }
    app.clone().oneshot(req.body(Body::from(body.to_owned())).unwrap()).await.unwrap()
  }

  async fn json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn health_is_open() {
    let resp = call(&app().await, "GET", "/health", None, "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await["status"], "ok");
  }

  #[tokio::test]
  async fn api_rejects_missing_or_wrong_credentials() {
    let app = app().await;

    let resp = call(&app, "GET", "/api/presets", None, "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let wrong = basic("admin", "nope");
    let resp = call(&app, "GET", "/api/presets", Some(wrong.as_str()), "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(resp).await["error"], "unauthorized");
  }

  #[tokio::test]
  async fn authenticated_create_then_list() {
    let app = app().await;
    let auth = basic("admin", "secret");
    let body = r#"{"name":"Front Desk","industry":"dentist","workspace_id":"ws_1","user_id":"user_1"}"#;

    let created = call(&app, "POST", "/api/configs", Some(auth.as_str()), body).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = call(&app, "GET", "/api/configs?workspace_id=ws_1", Some(auth.as_str()), "").await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed = json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["name"], "Front Desk");
  }
}
