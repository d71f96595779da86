//! The `ConfigStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `boltcall-store-sqlite`). Higher layers (`boltcall-api`,
//! `boltcall-server`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assistant::{AssistantConfig, LlmConfig, NewAssistantConfig};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ConfigStore::search`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigQuery {
  /// Case-insensitive substring matched against name or description.
  pub text:     Option<String>,
  /// With a user, the caller's own records plus public ones are visible;
  /// without one, only public records.
  pub user_id:  Option<String>,
  pub industry: Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

// ─── Patch type ──────────────────────────────────────────────────────────────

/// Partial update for [`ConfigStore::update`]. `None` leaves a column alone.
///
/// `description` and `voice_id` are doubly optional so they can be cleared:
/// `Some(None)` writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
  pub description: Option<Option<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub industry:    Option<String>,
  /// Replaces the whole payload.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub llm_config:  Option<LlmConfig>,
  #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
  pub voice_id:    Option<Option<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_public:   Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_active:   Option<bool>,
}

impl ConfigPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.description.is_none()
      && self.industry.is_none()
      && self.llm_config.is_none()
      && self.voice_id.is_none()
      && self.is_public.is_none()
      && self.is_active.is_none()
  }
}

/// Distinguishes a missing field (`None`) from an explicit `null`
/// (`Some(None)`).
mod double_option {
  use serde::{Deserialize, Deserializer, Serialize, Serializer};

  pub fn serialize<S, T>(
    value: &Option<Option<T>>,
    serializer: S,
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
    T: Serialize,
  {
    match value {
      Some(inner) => inner.serialize(serializer),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D, T>(
    deserializer: D,
  ) -> Result<Option<Option<T>>, D::Error>
  where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
  {
    Option::<T>::deserialize(deserializer).map(Some)
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Lets outer layers tell a missing or stale record apart from a backend
/// failure.
pub trait StoreError {
  /// `true` when the operation targeted a record that does not exist.
  fn is_not_found(&self) -> bool;

  /// `true` when a conditional write found the record changed since the
  /// caller read it.
  fn is_stale(&self) -> bool { false }
}

impl StoreError for std::convert::Infallible {
  fn is_not_found(&self) -> bool { match *self {} }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an assistant-configuration store backend.
///
/// Every operation reports failure through `Self::Error`. A single-row read
/// that finds nothing is `Ok(None)`, not an error. Records are never removed;
/// [`soft_delete`](ConfigStore::soft_delete) hides them from every read.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ConfigStore: Send + Sync {
  type Error: std::error::Error + StoreError + Send + Sync + 'static;

  // ── Listing ───────────────────────────────────────────────────────────

  /// Active records owned by `user_id`, newest first.
  fn list_by_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a;

  /// Active records in `workspace_id`, newest first.
  fn list_by_workspace<'a>(
    &'a self,
    workspace_id: &'a str,
  ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a;

  /// Active public records for `industry`, most used first.
  fn list_public_by_industry<'a>(
    &'a self,
    industry: &'a str,
  ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a;

  /// Distinct industries across active records, alphabetic.
  fn list_industries(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Single record ─────────────────────────────────────────────────────

  /// Retrieve an active record by id. Returns `None` if it does not exist or
  /// has been soft-deleted.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AssistantConfig>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a draft. `voice_id`, when given, takes precedence over the
  /// draft's own. Id and timestamps are assigned by the store.
  fn create(
    &self,
    draft: NewAssistantConfig,
    voice_id: Option<String>,
  ) -> impl Future<Output = Result<AssistantConfig, Self::Error>> + Send + '_;

  /// Apply `patch` to the record with `id` (active or not) and return the
  /// updated record. Always bumps `updated_at`.
  ///
  /// With `expected_updated_at`, the write only happens if the stored
  /// `updated_at` still equals it; otherwise the error is stale. The check
  /// and the write are one atomic step.
  fn update(
    &self,
    id: Uuid,
    patch: ConfigPatch,
    expected_updated_at: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<AssistantConfig, Self::Error>> + Send + '_;

  /// Mark the record inactive. The row is kept.
  fn soft_delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Atomically add one to `usage_count` of an active record and return the
  /// new count.
  fn increment_usage(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Search ────────────────────────────────────────────────────────────

  /// Active records matching `query`, most used first.
  fn search<'a>(
    &'a self,
    query: &'a ConfigQuery,
  ) -> impl Future<Output = Result<Vec<AssistantConfig>, Self::Error>> + Send + 'a;
}
