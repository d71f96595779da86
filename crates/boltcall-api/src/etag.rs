//! ETag computation for assistant configs.
//!
//! An ETag is a SHA-256 over the record id and its `updated_at` timestamp, so
//! it changes on every successful update.

use boltcall_core::assistant::AssistantConfig;
use sha2::{Digest, Sha256};

/// Compute the quoted ETag for `config`.
pub fn compute_etag(config: &AssistantConfig) -> String {
  let mut hasher = Sha256::new();
  hasher.update(config.id.as_bytes());
  hasher.update(config.updated_at.timestamp_micros().to_le_bytes());
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Compare an `If-Match` header value against a computed ETag. Accepts the
/// bare (unquoted) form some clients send, and `*`.
pub fn etag_matches(header: &str, current: &str) -> bool {
  let header = header.trim();
  header == "*"
    || header
      .split(',')
      .any(|tag| strip_quotes(tag.trim()) == strip_quotes(current))
}

fn strip_quotes(s: &str) -> &str {
  let s = s.strip_prefix("W/").unwrap_or(s);
  s.trim_matches('"')
}
