//! Persistent dashboard preferences.
//!
//! Loaded once at startup and written back whenever a preference changes.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Preferences that survive restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
  pub dark_mode:         bool,
  pub sidebar_collapsed: bool,
  /// Industry key selected in the sidebar; `None` shows every industry.
  pub industry_filter:   Option<String>,
}

impl Default for UiState {
  fn default() -> Self {
    Self {
      dark_mode:         true,
      sidebar_collapsed: false,
      industry_filter:   None,
    }
  }
}

impl UiState {
  /// `~/.config/boltcall/ui.toml`, or `None` when `HOME` is unset.
  pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
      .map(|home| PathBuf::from(home).join(".config").join("boltcall").join("ui.toml"))
  }

  /// Read state from `path`. A missing or empty file yields the defaults.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }
    let raw = fs::read_to_string(path)
      .with_context(|| format!("reading UI state {}", path.display()))?;
    if raw.trim().is_empty() {
      return Ok(Self::default());
    }
    toml::from_str(&raw).with_context(|| format!("parsing UI state {}", path.display()))
  }

  /// Write state to `path`, creating parent directories as needed.
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(self).context("serialising UI state")?;
    fs::write(path, raw).with_context(|| format!("writing UI state {}", path.display()))
  }
}
