//! Server settings: built-in defaults, then the TOML file, then `BOLTCALL_*`
//! environment variables. Loading validates the result.

use std::path::{Path, PathBuf};

use argon2::PasswordHash;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

use crate::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/boltcall/registry.db";

#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  /// Argon2 PHC string, see `--hash-password`.
  pub auth_password_hash: String,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, Error> {
  Ok(
    Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("store_path", DEFAULT_STORE_PATH)?,
  )
}

impl ServerConfig {
  /// Load from `path` (optional) and the environment.
  pub fn load(path: &Path) -> Result<Self, Error> {
    let settings = defaults()?
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix("BOLTCALL"))
      .build()?;
    Self::checked(settings)
  }

  /// Load from TOML text over the defaults, ignoring the environment.
  pub fn from_toml(text: &str) -> Result<Self, Error> {
    let settings = defaults()?
      .add_source(File::from_str(text, FileFormat::Toml))
      .build()?;
    Self::checked(settings)
  }

  fn checked(settings: Config) -> Result<Self, Error> {
    let cfg: Self = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<(), Error> {
    if self.auth_username.trim().is_empty() {
      return Err(Error::InvalidSetting {
        field:  "auth_username",
        reason: "must not be empty".into(),
      });
    }
    if self.auth_username.contains(':') {
      return Err(Error::InvalidSetting {
        field:  "auth_username",
        reason: "must not contain ':'".into(),
      });
    }
    PasswordHash::new(&self.auth_password_hash).map_err(|e| Error::InvalidSetting {
      field:  "auth_password_hash",
      reason: format!("not an argon2 PHC string ({e}); generate one with --hash-password"),
    })?;
    Ok(())
  }

  pub fn bind_address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~/` replaced by `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_home(&self.store_path, home.as_deref())
  }
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::auth::hash_password;

  fn toml_with_hash(extra: &str) -> String {
    let hash = hash_password("secret").unwrap();
    format!("auth_username = \"admin\"\nauth_password_hash = \"{hash}\"\n{extra}")
  }

  #[test]
  fn defaults_fill_unset_keys() {
    let cfg = ServerConfig::from_toml(&toml_with_hash("")).unwrap();
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = ServerConfig::from_toml(&toml_with_hash("port = 9000\nhost = \"0.0.0.0\"")).unwrap();
    assert_eq!(cfg.bind_address(), "0.0.0.0:9000");
  }

  #[test]
  fn missing_credentials_fail() {
    assert!(matches!(ServerConfig::from_toml(""), Err(Error::Config(_))));
  }

  #[test]
  fn malformed_hash_fails_at_load() {
    let err = ServerConfig::from_toml(
      "auth_username = \"admin\"\nauth_password_hash = \"hunter2\"",
    )
    .err()
    .unwrap();
    assert!(
      matches!(err, Error::InvalidSetting { field: "auth_password_hash", .. }),
      "got {err}"
    );
  }

  #[test]
  fn blank_username_fails_at_load() {
    let hash = hash_password("secret").unwrap();
    let err = ServerConfig::from_toml(&format!(
      "auth_username = \" \"\nauth_password_hash = \"{hash}\""
    ))
    .err()
    .unwrap();
    assert!(matches!(err, Error::InvalidSetting { field: "auth_username", .. }));
  }

  #[test]
  fn home_expansion() {
    let home = Path::new("/home/ops");
    assert_eq!(
      expand_home(Path::new("~/data/r.db"), Some(home)),
      PathBuf::from("/home/ops/data/r.db")
    );
    assert_eq!(expand_home(Path::new("/srv/r.db"), Some(home)), PathBuf::from("/srv/r.db"));
    assert_eq!(expand_home(Path::new("~/r.db"), None), PathBuf::from("~/r.db"));
  }
}
