//! Error type for `boltcall-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] boltcall_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The targeted record does not exist (or, for usage tracking, is
  /// inactive).
  #[error("assistant config not found: {0}")]
  NotFound(uuid::Uuid),

  /// A conditional update found the record modified since it was read.
  #[error("assistant config {0} was modified concurrently")]
  Stale(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl boltcall_core::store::StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

  fn is_stale(&self) -> bool { matches!(self, Self::Stale(_)) }
}
