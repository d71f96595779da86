//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use boltcall_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("precondition failed")]
  PreconditionFailed,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store error, surfacing missing records as 404 and lost
  /// conditional writes as 412.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + StoreError + Send + Sync + 'static,
  {
    if e.is_not_found() {
      ApiError::NotFound(e.to_string())
    } else if e.is_stale() {
      ApiError::PreconditionFailed
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::PreconditionFailed => {
        (StatusCode::PRECONDITION_FAILED, self.to_string())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
