//! Server errors: startup failures and the 401 rejection.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("failed to load configuration: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid setting `{field}`: {reason}")]
  InvalidSetting { field: &'static str, reason: String },

  #[error("password hashing failed: {0}")]
  Hash(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      _ => {
        tracing::error!(error = %self, "server error");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"boltcall\""),
      );
    }
    res
  }
}
