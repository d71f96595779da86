//! SQL schema for the Boltcall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted; retirement flips is_active to 0.
CREATE TABLE IF NOT EXISTS assistant_configs (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    workspace_id TEXT NOT NULL,
    name         TEXT NOT NULL,
    description  TEXT,
    industry     TEXT NOT NULL,
    llm_config   TEXT NOT NULL,             -- JSON-encoded LlmConfig
    voice_id     TEXT,
    is_public    INTEGER NOT NULL DEFAULT 0,
    is_active    INTEGER NOT NULL DEFAULT 1,
    usage_count  INTEGER NOT NULL DEFAULT 0 CHECK (usage_count >= 0),
    created_at   TEXT NOT NULL,             -- RFC 3339 UTC, fixed width
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS configs_user_idx      ON assistant_configs(user_id);
CREATE INDEX IF NOT EXISTS configs_workspace_idx ON assistant_configs(workspace_id);
CREATE INDEX IF NOT EXISTS configs_industry_idx  ON assistant_configs(industry);

PRAGMA user_version = 1;
";
