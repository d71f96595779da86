//! Handlers for `GET /search` and `GET /industries`.
//!
//! Search query params map directly to [`ConfigQuery`] fields.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use boltcall_core::{
  assistant::AssistantConfig,
  store::{ConfigQuery, ConfigStore},
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring of name or description.
  pub text:     Option<String>,
  /// Widens visibility from public records to public + this user's own.
  pub user_id:  Option<String>,
  pub industry: Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /search[?text=...][&user_id=...][&industry=...][&limit=...][&offset=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<AssistantConfig>>, ApiError>
where
  S: ConfigStore,
{
  let query = ConfigQuery {
    text:     params.text,
    user_id:  params.user_id,
    industry: params.industry,
    limit:    params.limit,
    offset:   params.offset,
  };

  let configs = store.search(&query).await.map_err(ApiError::from_store)?;
  Ok(Json(configs))
}

/// `GET /industries` — industries in use by active records.
pub async fn industries<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: ConfigStore,
{
  let industries = store
    .list_industries()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(industries))
}
