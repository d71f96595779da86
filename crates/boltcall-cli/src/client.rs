//! Async HTTP client wrapping the boltcall JSON API.

use anyhow::{Context, Result, anyhow};
use boltcall_core::{
  assistant::AssistantConfig,
  factory::LlmConfigPatch,
  preset::Preset,
  store::{ConfigPatch, ConfigQuery},
};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the boltcall API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Body of `POST /api/configs`.
#[derive(Debug, Clone, Serialize)]
pub struct NewConfigRequest {
  pub name:         String,
  pub industry:     String,
  pub workspace_id: String,
  pub user_id:      String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub voice_id:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub overrides:    Option<LlmConfigPatch>,
}

#[derive(Deserialize)]
struct UsageBody {
  usage_count: u64,
}

/// Async HTTP client for the boltcall JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn ensure_success(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {message}"))
  }

  // ── Configs ───────────────────────────────────────────────────────────────

  /// `GET /api/configs?workspace_id=<id>`
  pub async fn list_workspace(&self, workspace_id: &str) -> Result<Vec<AssistantConfig>> {
    let resp = self
      .auth(self.client.get(self.url("/configs")))
      .query(&[("workspace_id", workspace_id)])
      .send()
      .await
      .context("GET /configs failed")?;
    let resp = Self::ensure_success(resp, "GET /configs").await?;
    resp.json().await.context("deserialising configs")
  }

  /// `GET /api/configs?user_id=<id>`
  pub async fn list_user(&self, user_id: &str) -> Result<Vec<AssistantConfig>> {
    let resp = self
      .auth(self.client.get(self.url("/configs")))
      .query(&[("user_id", user_id)])
      .send()
      .await
      .context("GET /configs failed")?;
    let resp = Self::ensure_success(resp, "GET /configs").await?;
    resp.json().await.context("deserialising configs")
  }

  /// `GET /api/configs/public?industry=<industry>`
  pub async fn list_public(&self, industry: &str) -> Result<Vec<AssistantConfig>> {
    let resp = self
      .auth(self.client.get(self.url("/configs/public")))
      .query(&[("industry", industry)])
      .send()
      .await
      .context("GET /configs/public failed")?;
    let resp = Self::ensure_success(resp, "GET /configs/public").await?;
    resp.json().await.context("deserialising public configs")
  }

  /// `GET /api/configs/:id` — `None` on 404.
  pub async fn get(&self, id: Uuid) -> Result<Option<AssistantConfig>> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/configs/{id}"))))
      .send()
      .await
      .context("GET /configs/:id failed")?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let resp = Self::ensure_success(resp, "GET /configs/:id").await?;
    resp.json().await.map(Some).context("deserialising config")
  }

  /// `POST /api/configs`
  pub async fn create(&self, body: &NewConfigRequest) -> Result<AssistantConfig> {
    let resp = self
      .auth(self.client.post(self.url("/configs")))
      .json(body)
      .send()
      .await
      .context("POST /configs failed")?;
    let resp = Self::ensure_success(resp, "POST /configs").await?;
    resp.json().await.context("deserialising created config")
  }

  /// `PATCH /api/configs/:id`
  pub async fn update(&self, id: Uuid, patch: &ConfigPatch) -> Result<AssistantConfig> {
    let resp = self
      .auth(self.client.patch(self.url(&format!("/configs/{id}"))))
      .json(patch)
      .send()
      .await
      .context("PATCH /configs/:id failed")?;
    let resp = Self::ensure_success(resp, "PATCH /configs/:id").await?;
    resp.json().await.context("deserialising updated config")
  }

  /// `DELETE /api/configs/:id`
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let resp = self
      .auth(self.client.delete(self.url(&format!("/configs/{id}"))))
      .send()
      .await
      .context("DELETE /configs/:id failed")?;
    Self::ensure_success(resp, "DELETE /configs/:id").await?;
    Ok(())
  }

  /// `POST /api/configs/:id/usage` — returns the new count.
  pub async fn record_usage(&self, id: Uuid) -> Result<u64> {
    let resp = self
      .auth(self.client.post(self.url(&format!("/configs/{id}/usage"))))
      .send()
      .await
      .context("POST /configs/:id/usage failed")?;
    let resp = Self::ensure_success(resp, "POST /configs/:id/usage").await?;
    let body: UsageBody = resp.json().await.context("deserialising usage")?;
    Ok(body.usage_count)
  }

  // ── Discovery ─────────────────────────────────────────────────────────────

  /// `GET /api/search`
  pub async fn search(&self, query: &ConfigQuery) -> Result<Vec<AssistantConfig>> {
    let resp = self
      .auth(self.client.get(self.url("/search")))
      .query(query)
      .send()
      .await
      .context("GET /search failed")?;
    let resp = Self::ensure_success(resp, "GET /search").await?;
    resp.json().await.context("deserialising search results")
  }

  /// `GET /api/industries`
  pub async fn industries(&self) -> Result<Vec<String>> {
    let resp = self
      .auth(self.client.get(self.url("/industries")))
      .send()
      .await
      .context("GET /industries failed")?;
    let resp = Self::ensure_success(resp, "GET /industries").await?;
    resp.json().await.context("deserialising industries")
  }

  /// `GET /api/presets`
  pub async fn presets(&self) -> Result<Vec<String>> {
    let resp = self
      .auth(self.client.get(self.url("/presets")))
      .send()
      .await
      .context("GET /presets failed")?;
    let resp = Self::ensure_success(resp, "GET /presets").await?;
    resp.json().await.context("deserialising preset list")
  }

  /// `GET /api/presets/:industry`
  pub async fn preset(&self, industry: &str) -> Result<Preset> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/presets/{industry}"))))
      .send()
      .await
      .context("GET /presets/:industry failed")?;
    let resp = Self::ensure_success(resp, "GET /presets/:industry").await?;
    resp.json().await.context("deserialising preset")
  }
}
