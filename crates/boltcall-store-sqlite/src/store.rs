//! [`SqliteStore`] — the SQLite implementation of [`ConfigStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};
use uuid::Uuid;

use boltcall_core::{
  assistant::{AssistantConfig, NewAssistantConfig},
  store::{ConfigPatch, ConfigQuery, ConfigStore},
};

use crate::{
  encode::{COLUMNS, RawConfig, encode_dt, encode_uuid, fold_case, like_pattern, now},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An assistant registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        // SQLite's own lower() folds ASCII only.
        conn.create_scalar_function(
          "fold_case",
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| fold_case(&s))),
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {COLUMNS} ...` statement with one text parameter.
  async fn select_many(
    &self,
    sql: String,
    param: String,
  ) -> Result<Vec<AssistantConfig>> {
    let raws: Vec<RawConfig> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![param], RawConfig::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConfig::into_config).collect()
  }

  /// Fetch a row by id regardless of `is_active`. Used by tests to check that
  /// soft-deleted rows are retained.
  #[cfg(test)]
  pub(crate) async fn get_any(&self, id: Uuid) -> Result<Option<AssistantConfig>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawConfig> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COLUMNS} FROM assistant_configs WHERE id = ?1"),
            rusqlite::params![id_str],
            RawConfig::from_row,
          )
          .optional()?)
      })
      .await?;
    raw.map(RawConfig::into_config).transpose()
  }
}

// ─── ConfigStore impl ────────────────────────────────────────────────────────

impl ConfigStore for SqliteStore {
  type Error = Error;

  // ── Listing ───────────────────────────────────────────────────────────────

  async fn list_by_user(&self, user_id: &str) -> Result<Vec<AssistantConfig>> {
    self
      .select_many(
        format!(
          "SELECT {COLUMNS} FROM assistant_configs
           WHERE user_id = ?1 AND is_active = 1
           ORDER BY created_at DESC, rowid DESC"
        ),
        user_id.to_owned(),
      )
      .await
  }

  async fn list_by_workspace(
    &self,
    workspace_id: &str,
  ) -> Result<Vec<AssistantConfig>> {
    self
      .select_many(
        format!(
          "SELECT {COLUMNS} FROM assistant_configs
           WHERE workspace_id = ?1 AND is_active = 1
           ORDER BY created_at DESC, rowid DESC"
        ),
        workspace_id.to_owned(),
      )
      .await
  }

  async fn list_public_by_industry(
    &self,
    industry: &str,
  ) -> Result<Vec<AssistantConfig>> {
    self
      .select_many(
        format!(
          "SELECT {COLUMNS} FROM assistant_configs
           WHERE industry = ?1 AND is_public = 1 AND is_active = 1
           ORDER BY usage_count DESC, created_at DESC, rowid DESC"
        ),
        industry.to_owned(),
      )
      .await
  }

  async fn list_industries(&self) -> Result<Vec<String>> {
    let industries = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT industry FROM assistant_configs
           WHERE is_active = 1 AND industry <> ''
           ORDER BY industry",
        )?;
        let rows = stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(industries)
  }

  // ── Single record ─────────────────────────────────────────────────────────

  async fn get(&self, id: Uuid) -> Result<Option<AssistantConfig>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawConfig> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {COLUMNS} FROM assistant_configs
               WHERE id = ?1 AND is_active = 1"
            ),
            rusqlite::params![id_str],
            RawConfig::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawConfig::into_config).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(
    &self,
    draft: NewAssistantConfig,
    voice_id: Option<String>,
  ) -> Result<AssistantConfig> {
    let created_at = now();
    let config = AssistantConfig {
      id: Uuid::new_v4(),
      user_id: draft.user_id,
      workspace_id: draft.workspace_id,
      name: draft.name,
      description: draft.description,
      industry: draft.industry,
      llm_config: draft.llm_config,
      voice_id: voice_id.or(draft.voice_id),
      is_public: draft.is_public,
      is_active: draft.is_active,
      usage_count: draft.usage_count,
      created_at,
      updated_at: created_at,
    };

    let id_str       = encode_uuid(config.id);
    let user_id      = config.user_id.clone();
    let workspace_id = config.workspace_id.clone();
    let name         = config.name.clone();
    let description  = config.description.clone();
    let industry     = config.industry.clone();
    let llm_json     = config.llm_config.to_json()?;
    let voice        = config.voice_id.clone();
    let is_public    = config.is_public;
    let is_active    = config.is_active;
    let usage_count  = i64::try_from(config.usage_count).unwrap_or(i64::MAX);
    let at_str       = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assistant_configs (
             id, user_id, workspace_id, name, description, industry,
             llm_config, voice_id, is_public, is_active, usage_count,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
          rusqlite::params![
            id_str,
            user_id,
            workspace_id,
            name,
            description,
            industry,
            llm_json,
            voice,
            is_public,
            is_active,
            usage_count,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(
      config_id = %config.id,
      workspace_id = %config.workspace_id,
      industry = %config.industry,
      "created assistant config"
    );
    Ok(config)
  }

  async fn update(
    &self,
    id: Uuid,
    patch: ConfigPatch,
    expected_updated_at: Option<DateTime<Utc>>,
  ) -> Result<AssistantConfig> {
    let id_str        = encode_uuid(id);
    let expected      = expected_updated_at.map(encode_dt);
    let llm_json      = patch.llm_config.as_ref().map(|c| c.to_json()).transpose()?;
    let set_desc      = patch.description.is_some();
    let description   = patch.description.flatten();
    let set_voice     = patch.voice_id.is_some();
    let voice         = patch.voice_id.flatten();
    let name          = patch.name;
    let industry      = patch.industry;
    let is_public     = patch.is_public;
    let is_active     = patch.is_active;
    let at_str        = encode_dt(now());

    // The precondition and the write are one statement; a miss is then told
    // apart as missing or stale inside the same call.
    let outcome: std::result::Result<RawConfig, bool> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "UPDATE assistant_configs SET
                 name        = COALESCE(?2, name),
                 description = CASE WHEN ?3 THEN ?4 ELSE description END,
                 industry    = COALESCE(?5, industry),
                 llm_config  = COALESCE(?6, llm_config),
                 voice_id    = CASE WHEN ?7 THEN ?8 ELSE voice_id END,
                 is_public   = COALESCE(?9, is_public),
                 is_active   = COALESCE(?10, is_active),
                 updated_at  = ?11
               WHERE id = ?1 AND (?12 IS NULL OR updated_at = ?12)
               RETURNING {COLUMNS}"
            ),
            rusqlite::params![
              id_str,
              name,
              set_desc,
              description,
              industry,
              llm_json,
              set_voice,
              voice,
              is_public,
              is_active,
              at_str,
              expected,
            ],
            RawConfig::from_row,
          )
          .optional()?;
        if let Some(raw) = raw {
          return Ok(Ok(raw));
        }
        let exists = conn
          .query_row(
            "SELECT 1 FROM assistant_configs WHERE id = ?1",
            rusqlite::params![id_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        Ok(Err(exists))
      })
      .await?;

    let config = match outcome {
      Ok(raw) => raw.into_config()?,
      Err(true) => return Err(Error::Stale(id)),
      Err(false) => return Err(Error::NotFound(id)),
    };
    tracing::debug!(config_id = %id, "updated assistant config");
    Ok(config)
  }

  async fn soft_delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE assistant_configs SET is_active = 0, updated_at = ?2
           WHERE id = ?1",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id));
    }
    tracing::debug!(config_id = %id, "soft-deleted assistant config");
    Ok(())
  }

  async fn increment_usage(&self, id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(id);

    // The add happens inside SQLite, so concurrent callers never lose an
    // increment.
    let count: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "UPDATE assistant_configs SET usage_count = usage_count + 1
             WHERE id = ?1 AND is_active = 1
             RETURNING usage_count",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    let count = count.ok_or(Error::NotFound(id))?;
    Ok(u64::try_from(count).unwrap_or_default())
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search(&self, query: &ConfigQuery) -> Result<Vec<AssistantConfig>> {
    let user_id    = query.user_id.clone();
    let industry   = query.industry.clone();
    let pattern    = query
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(like_pattern);
    let limit_val  = i64::try_from(query.limit.unwrap_or(100)).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(query.offset.unwrap_or(0)).unwrap_or(0);

    let raws: Vec<RawConfig> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM assistant_configs
           WHERE is_active = 1
             AND ((?1 IS NOT NULL AND user_id = ?1) OR is_public = 1)
             AND (?2 IS NULL OR industry = ?2)
             AND (?3 IS NULL
                  OR fold_case(name) LIKE ?3 ESCAPE '\\'
                  OR fold_case(COALESCE(description, '')) LIKE ?3 ESCAPE '\\')
           ORDER BY usage_count DESC, created_at DESC, rowid DESC
           LIMIT ?4 OFFSET ?5"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![user_id, industry, pattern, limit_val, offset_val],
            RawConfig::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConfig::into_config).collect()
  }
}
