//! Handlers for the built-in preset table.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/presets` | Known industry keys |
//! | `GET`  | `/presets/:industry` | 404 for unknown industries |

use axum::{Json, extract::Path};
use boltcall_core::preset::{self, Preset};

use crate::error::ApiError;

/// `GET /presets`
pub async fn list() -> Json<Vec<&'static str>> { Json(preset::industries()) }

/// `GET /presets/:industry`
pub async fn get_one(Path(industry): Path<String>) -> Result<Json<Preset>, ApiError> {
  preset::preset(&industry)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("no preset for industry {industry:?}")))
}
