//! JSON REST API for the Boltcall assistant registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`boltcall_core::store::ConfigStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", boltcall_api::api_router(store.clone()))
//! ```

pub mod configs;
pub mod error;
pub mod etag;
pub mod presets;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use boltcall_core::store::ConfigStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ConfigStore + 'static,
{
  Router::new()
    // Configs
    .route("/configs", get(configs::list::<S>).post(configs::create::<S>))
    .route("/configs/public", get(configs::list_public::<S>))
    .route(
      "/configs/{id}",
      get(configs::get_one::<S>)
        .patch(configs::update_one::<S>)
        .delete(configs::delete_one::<S>),
    )
    .route("/configs/{id}/usage", post(configs::record_usage::<S>))
    // Discovery
    .route("/industries", get(search::industries::<S>))
    .route("/search", get(search::handler::<S>))
    .route("/presets", get(presets::list))
    .route("/presets/{industry}", get(presets::get_one))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use boltcall_core::{
    assistant::{AssistantConfig, NewAssistantConfig},
    factory::create_configuration,
    store::{ConfigPatch, ConfigQuery},
  };
  use boltcall_store_sqlite::SqliteStore;
  use chrono::{DateTime, Utc};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body<T: serde::de::DeserializeOwned>(resp: Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create(app: &Router, name: &str, industry: &str, user: &str) -> AssistantConfig {
    let resp = send(
      app,
      "POST",
      "/configs",
      vec![],
      Some(json!({
        "name": name,
        "industry": industry,
        "workspace_id": "ws_1",
        "user_id": user,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  // ── Create / get ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_applies_preset_and_overrides() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/configs",
      vec![],
      Some(json!({
        "name": "Front Desk",
        "industry": "dentist",
        "workspace_id": "ws_1",
        "user_id": "user_1",
        "description": "Main line",
        "voice_id": "voice_7",
        "overrides": { "conversation_flow": { "greeting": "Hi!" } }
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(header::ETAG));

    let config: AssistantConfig = json_body(resp).await;
    assert_eq!(config.industry, "dentist");
    assert_eq!(config.llm_config.model, "gpt-4");
    assert_eq!(config.description.as_deref(), Some("Main line"));
    assert_eq!(config.voice_id.as_deref(), Some("voice_7"));
    let flow = config.llm_config.conversation_flow.unwrap();
    assert_eq!(flow.greeting, "Hi!");
    assert!(!flow.qualification_questions.is_empty());
  }

  #[tokio::test]
  async fn create_rejects_empty_name() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/configs",
      vec![],
      Some(json!({
        "name": "  ",
        "industry": "dentist",
        "workspace_id": "ws_1",
        "user_id": "user_1",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn get_missing_returns_404() {
    let app = app().await;
    let resp = send(&app, "GET", &format!("/configs/{}", Uuid::new_v4()), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Listing ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_requires_exactly_one_scope() {
    let app = app().await;
    let none = send(&app, "GET", "/configs", vec![], None).await;
    assert_eq!(none.status(), StatusCode::BAD_REQUEST);
    let both = send(&app, "GET", "/configs?user_id=u&workspace_id=w", vec![], None).await;
    assert_eq!(both.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn list_by_workspace_and_user() {
    let app = app().await;
    create(&app, "A", "hvac", "alice").await;
    create(&app, "B", "hvac", "bob").await;

    let resp = send(&app, "GET", "/configs?workspace_id=ws_1", vec![], None).await;
    let all: Vec<AssistantConfig> = json_body(resp).await;
    assert_eq!(all.len(), 2);

    let resp = send(&app, "GET", "/configs?user_id=alice", vec![], None).await;
    let mine: Vec<AssistantConfig> = json_body(resp).await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "A");
  }

  // ── Update / ETag ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_with_matching_if_match_succeeds() {
    let app = app().await;
    let c = create(&app, "A", "legal", "u").await;

    let get = send(&app, "GET", &format!("/configs/{}", c.id), vec![], None).await;
    let etag = get.headers().get(header::ETAG).unwrap().to_str().unwrap().to_string();

    let resp = send(
      &app,
      "PATCH",
      &format!("/configs/{}", c.id),
      vec![(header::IF_MATCH, etag.as_str())],
      Some(json!({ "name": "Renamed", "is_public": true })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let new_etag = resp.headers().get(header::ETAG).unwrap().to_str().unwrap().to_string();
    let updated: AssistantConfig = json_body(resp).await;
    assert_eq!(updated.name, "Renamed");
    assert!(updated.is_public);
    assert_ne!(new_etag, etag);
  }

  #[tokio::test]
  async fn patch_with_stale_if_match_returns_412() {
    let app = app().await;
    let c = create(&app, "A", "legal", "u").await;
    let resp = send(
      &app,
      "PATCH",
      &format!("/configs/{}", c.id),
      vec![(header::IF_MATCH, "\"stale\"")],
      Some(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
  }

  /// Wraps a store so that every `get` is followed by a write from another
  /// client before the caller sees the result.
  struct InterleavedStore {
    inner: SqliteStore,
  }

  impl ConfigStore for InterleavedStore {
    type Error = boltcall_store_sqlite::Error;

    fn list_by_user<'a>(
      &'a self,
      user_id: &'a str,
    ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a {
      self.inner.list_by_user(user_id)
    }

    fn list_by_workspace<'a>(
      &'a self,
      workspace_id: &'a str,
    ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a {
      self.inner.list_by_workspace(workspace_id)
    }

    fn list_public_by_industry<'a>(
      &'a self,
      industry: &'a str,
    ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a {
      self.inner.list_public_by_industry(industry)
    }

    fn list_industries(
      &self,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_ {
      self.inner.list_industries()
    }

    fn get(
      &self,
      id: Uuid,
    ) -> impl Future<Output = Result<Option<AssistantConfig>, Self::Error>> + Send + '_ {
      async move {
        let seen = self.inner.get(id).await?;
        if seen.is_some() {
          let patch = ConfigPatch { name: Some("Other client".into()), ..Default::default() };
          self.inner.update(id, patch, None).await?;
        }
        Ok(seen)
      }
    }

    fn create(
      &self,
      draft: NewAssistantConfig,
      voice_id: Option<String>,
    ) -> impl Future<Output = Result<AssistantConfig, Self::Error>> + Send + '_ {
      self.inner.create(draft, voice_id)
    }

    fn update(
      &self,
      id: Uuid,
      patch: ConfigPatch,
      expected_updated_at: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<AssistantConfig, Self::Error>> + Send + '_ {
      self.inner.update(id, patch, expected_updated_at)
    }

    fn soft_delete(
      &self,
      id: Uuid,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
      self.inner.soft_delete(id)
    }

    fn increment_usage(
      &self,
      id: Uuid,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_ {
      self.inner.increment_usage(id)
    }

    fn search<'a>(
      &'a self,
      query: &'a ConfigQuery,
    ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a {
      self.inner.search(query)
    }
  }

  #[tokio::test]
  async fn patch_loses_to_write_between_check_and_update() {
    let inner = SqliteStore::open_in_memory().await.unwrap();
    let draft = create_configuration("A", "legal", "ws_1", "u", None);
    let c = inner.create(draft, None).await.unwrap();
    let etag = etag::compute_etag(&c);

    let store = Arc::new(InterleavedStore { inner });
    let app = api_router(store.clone());
    let resp = send(
      &app,
      "PATCH",
      &format!("/configs/{}", c.id),
      vec![(header::IF_MATCH, etag.as_str())],
      Some(json!({ "name": "Mine" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);

    let stored = store.inner.get(c.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Other client");
  }

  #[tokio::test]
  async fn patch_rejects_blank_name() {
    let app = app().await;
    let c = create(&app, "A", "legal", "u").await;
    for name in ["", "   "] {
      let resp = send(
        &app,
        "PATCH",
        &format!("/configs/{}", c.id),
        vec![],
        Some(json!({ "name": name })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "name {name:?}");
    }
    let resp = send(&app, "GET", &format!("/configs/{}", c.id), vec![], None).await;
    let fetched: AssistantConfig = json_body(resp).await;
    assert_eq!(fetched.name, "A");
  }

  #[tokio::test]
  async fn patch_without_if_match_is_last_write_wins() {
    let app = app().await;
    let c = create(&app, "A", "legal", "u").await;
    for name in ["First", "Second"] {
      let resp = send(
        &app,
        "PATCH",
        &format!("/configs/{}", c.id),
        vec![],
        Some(json!({ "name": name })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = send(&app, "GET", &format!("/configs/{}", c.id), vec![], None).await;
    let fetched: AssistantConfig = json_body(resp).await;
    assert_eq!(fetched.name, "Second");
  }

  #[tokio::test]
  async fn patch_empty_or_missing() {
    let app = app().await;
    let c = create(&app, "A", "legal", "u").await;
    let empty = send(&app, "PATCH", &format!("/configs/{}", c.id), vec![], Some(json!({}))).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let missing = send(
      &app,
      "PATCH",
      &format!("/configs/{}", Uuid::new_v4()),
      vec![],
      Some(json!({ "name": "x" })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }

  // ── Delete / usage ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_get_returns_404() {
    let app = app().await;
    let c = create(&app, "A", "hvac", "u").await;

    let del = send(&app, "DELETE", &format!("/configs/{}", c.id), vec![], None).await;
    assert_eq!(del.status(), StatusCode::NO_CONTENT);

    let get = send(&app, "GET", &format!("/configs/{}", c.id), vec![], None).await;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_missing_returns_404() {
    let app = app().await;
    let del = send(&app, "DELETE", &format!("/configs/{}", Uuid::new_v4()), vec![], None).await;
    assert_eq!(del.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn usage_increments() {
    let app = app().await;
    let c = create(&app, "A", "hvac", "u").await;
    for expected in 1..=3u64 {
      let resp = send(&app, "POST", &format!("/configs/{}/usage", c.id), vec![], None).await;
      assert_eq!(resp.status(), StatusCode::OK);
      let body: Value = json_body(resp).await;
      assert_eq!(body["usage_count"], json!(expected));
    }
  }

  // ── Discovery ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn public_listing_and_search() {
    let app = app().await;
    let public = create(&app, "Dental Desk", "dentist", "bob").await;
    create(&app, "Dental Private", "dentist", "bob").await;
    send(
      &app,
      "PATCH",
      &format!("/configs/{}", public.id),
      vec![],
      Some(json!({ "is_public": true })),
    )
    .await;

    let resp = send(&app, "GET", "/configs/public?industry=dentist", vec![], None).await;
    let listed: Vec<AssistantConfig> = json_body(resp).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, public.id);

    let resp = send(&app, "GET", "/search?text=DENTAL", vec![], None).await;
    let found: Vec<AssistantConfig> = json_body(resp).await;
    assert_eq!(found.len(), 1);

    let resp = send(&app, "GET", "/search?text=dental&user_id=bob", vec![], None).await;
    let found: Vec<AssistantConfig> = json_body(resp).await;
    assert_eq!(found.len(), 2);
  }

  #[tokio::test]
  async fn industries_lists_in_use() {
    let app = app().await;
    create(&app, "A", "roofing", "u").await;
    create(&app, "B", "dentist", "u").await;
    let resp = send(&app, "GET", "/industries", vec![], None).await;
    let industries: Vec<String> = json_body(resp).await;
    assert_eq!(industries, vec!["dentist", "roofing"]);
  }

  #[tokio::test]
  async fn presets_endpoints() {
    let app = app().await;
    let resp = send(&app, "GET", "/presets", vec![], None).await;
    let keys: Vec<String> = json_body(resp).await;
    assert!(keys.iter().any(|k| k == "dentist"));

    let ok = send(&app, "GET", "/presets/hvac", vec![], None).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let missing = send(&app, "GET", "/presets/bakery", vec![], None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }
}
