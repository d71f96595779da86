//! HTTP Basic auth for `/api`, checked against an argon2 PHC hash.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;

use crate::{Error, config::ServerConfig};

/// The single account allowed to call the API.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  pub password_hash: String,
}

impl From<&ServerConfig> for AuthConfig {
  fn from(cfg: &ServerConfig) -> Self {
    Self {
      username:      cfg.auth_username.clone(),
      password_hash: cfg.auth_password_hash.clone(),
    }
  }
}

impl AuthConfig {
  pub fn verify(&self, username: &str, password: &str) -> bool {
    if username != self.username {
      return false;
    }
    let Ok(hash) = PasswordHash::new(&self.password_hash) else {
      return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
  }
}

/// Hash `password` with a fresh salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// `(username, password)` from an `Authorization: Basic …` header. The scheme
/// name is case-insensitive.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, encoded) = value.split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("basic") {
    return None;
  }
  let decoded = String::from_utf8(B64.decode(encoded.trim()).ok()?).ok()?;
  let (user, pass) = decoded.split_once(':')?;
  Some((user.to_owned(), pass.to_owned()))
}

pub async fn require_auth(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  match basic_credentials(req.headers()) {
    Some((user, pass)) if auth.verify(&user, &pass) => Ok(next.run(req).await),
    Some((user, _)) => {
      tracing::warn!(path = %req.uri().path(), %user, "rejected credentials");
      Err(Error::Unauthorized)
    }
    None => {
      tracing::debug!(path = %req.uri().path(), "missing credentials");
      Err(Error::Unauthorized)
    }
  }
}
