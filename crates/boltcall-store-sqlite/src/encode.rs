//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so lexical order matches chronological order. The behavior payload is
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use boltcall_core::assistant::{AssistantConfig, LlmConfig};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every `SELECT` and `RETURNING` clause; order matches
/// [`RawConfig::from_row`].
pub const COLUMNS: &str = "id, user_id, workspace_id, name, description, \
                           industry, llm_config, voice_id, is_public, \
                           is_active, usage_count, created_at, updated_at";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Unicode case folding used on both sides of a text search. Registered on
/// the connection as the SQL function `fold_case`.
pub fn fold_case(s: &str) -> String { s.to_lowercase() }

/// Build a `LIKE` pattern matching `text` anywhere, case-folded, with the
/// wildcard characters escaped by `\`.
pub fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in fold_case(text).chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from an `assistant_configs` row.
pub struct RawConfig {
  pub id:           String,
  pub user_id:      String,
  pub workspace_id: String,
  pub name:         String,
  pub description:  Option<String>,
  pub industry:     String,
  pub llm_config:   String,
  pub voice_id:     Option<String>,
  pub is_public:    bool,
  pub is_active:    bool,
  pub usage_count:  i64,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawConfig {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      user_id:      row.get(1)?,
      workspace_id: row.get(2)?,
      name:         row.get(3)?,
      description:  row.get(4)?,
      industry:     row.get(5)?,
      llm_config:   row.get(6)?,
      voice_id:     row.get(7)?,
      is_public:    row.get(8)?,
      is_active:    row.get(9)?,
      usage_count:  row.get(10)?,
      created_at:   row.get(11)?,
      updated_at:   row.get(12)?,
    })
  }

  pub fn into_config(self) -> Result<AssistantConfig> {
    Ok(AssistantConfig {
      id:           decode_uuid(&self.id)?,
      user_id:      self.user_id,
      workspace_id: self.workspace_id,
      name:         self.name,
      description:  self.description,
      industry:     self.industry,
      llm_config:   LlmConfig::from_json(&self.llm_config)?,
      voice_id:     self.voice_id,
      is_public:    self.is_public,
      is_active:    self.is_active,
      usage_count:  u64::try_from(self.usage_count).unwrap_or_default(),
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
