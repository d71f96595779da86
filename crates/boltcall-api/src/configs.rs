//! Handlers for `/configs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/configs` | exactly one of `?user_id` / `?workspace_id` |
//! | `POST`   | `/configs` | Body: [`CreateBody`]; preset + overrides; returns 201 |
//! | `GET`    | `/configs/public` | `?industry` required; most used first |
//! | `GET`    | `/configs/:id` | 404 if missing or soft-deleted; sets `ETag` |
//! | `PATCH`  | `/configs/:id` | Body: [`ConfigPatch`]; honours `If-Match` |
//! | `DELETE` | `/configs/:id` | Soft delete; 204 |
//! | `POST`   | `/configs/:id/usage` | Returns `{"usage_count": n}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use boltcall_core::{
  assistant::AssistantConfig,
  factory::{LlmConfigPatch, create_configuration},
  store::{ConfigPatch, ConfigStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::ApiError,
  etag::{compute_etag, etag_matches},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id:      Option<String>,
  pub workspace_id: Option<String>,
}

/// `GET /configs?user_id=<id>` or `GET /configs?workspace_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AssistantConfig>>, ApiError>
where
  S: ConfigStore,
{
  let configs = match (params.user_id, params.workspace_id) {
    (Some(user_id), None) => store.list_by_user(&user_id).await,
    (None, Some(workspace_id)) => store.list_by_workspace(&workspace_id).await,
    _ => {
      return Err(ApiError::BadRequest(
        "exactly one of user_id or workspace_id is required".into(),
      ));
    }
  }
  .map_err(ApiError::from_store)?;
  Ok(Json(configs))
}

#[derive(Debug, Deserialize)]
pub struct PublicParams {
  pub industry: String,
}

/// `GET /configs/public?industry=<industry>`
pub async fn list_public<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PublicParams>,
) -> Result<Json<Vec<AssistantConfig>>, ApiError>
where
  S: ConfigStore,
{
  let configs = store
    .list_public_by_industry(&params.industry)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(configs))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /configs/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConfigStore,
{
  let config = store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("assistant config {id} not found")))?;
  Ok(([(header::ETAG, compute_etag(&config))], Json(config)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /configs`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBody {
  pub name:         String,
  pub industry:     String,
  pub workspace_id: String,
  pub user_id:      String,
  pub description:  Option<String>,
  pub voice_id:     Option<String>,
  /// Deep-merged over the industry preset.
  pub overrides:    Option<LlmConfigPatch>,
}

/// `POST /configs` — returns 201 + the stored [`AssistantConfig`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConfigStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }

  let mut draft = create_configuration(
    body.name,
    body.industry,
    body.workspace_id,
    body.user_id,
    body.overrides,
  );
  draft.description = body.description;

  let config = store
    .create(draft, body.voice_id)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(config_id = %config.id, industry = %config.industry, "assistant config created");
  Ok((
    StatusCode::CREATED,
    [(header::ETAG, compute_etag(&config))],
    Json(config),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /configs/:id` — body is a [`ConfigPatch`].
///
/// With `If-Match`, the patch is only applied when the tag matches the
/// current active record and nothing has written the record since it was
/// read; otherwise 412.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  headers: HeaderMap,
  Json(patch): Json<ConfigPatch>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ConfigStore,
{
  if patch.is_empty() {
    return Err(ApiError::BadRequest("patch has no fields".into()));
  }
  if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }

  let if_match = headers
    .get(header::IF_MATCH)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned);

  let expected_updated_at = match if_match {
    Some(tag) => {
      let current = store
        .get(id)
        .await
        .map_err(ApiError::from_store)?
        .ok_or(ApiError::PreconditionFailed)?;
      if !etag_matches(&tag, &compute_etag(&current)) {
        return Err(ApiError::PreconditionFailed);
      }
      Some(current.updated_at)
    }
    None => None,
  };

  let config = store
    .update(id, patch, expected_updated_at)
    .await
    .map_err(ApiError::from_store)?;
  Ok(([(header::ETAG, compute_etag(&config))], Json(config)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /configs/:id` — soft delete.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ConfigStore,
{
  store.soft_delete(id).await.map_err(ApiError::from_store)?;
  tracing::info!(config_id = %id, "assistant config deactivated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Usage ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageBody {
  pub usage_count: u64,
}

/// `POST /configs/:id/usage`
pub async fn record_usage<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<UsageBody>, ApiError>
where
  S: ConfigStore,
{
  let usage_count = store
    .increment_usage(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(UsageBody { usage_count }))
}
