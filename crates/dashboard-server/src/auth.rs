//! HTTP Basic authentication against the configured users.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use dashboard_core::ownership::Caller;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Error;

/// One account allowed to use the server, and the identity it maps to.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub user_id:       String,
  pub domain_id:     String,
  pub workspace_id:  Option<String>,
  /// Projects the user may see. Unset means every project in the domain.
  pub projects:      Option<Vec<String>>,
}

impl UserConfig {
  pub fn caller(&self) -> Caller {
    Caller {
      user_id:       self.user_id.clone(),
      domain_id:     self.domain_id.clone(),
      workspace_id:  self.workspace_id.clone(),
      user_projects: self.projects.clone(),
    }
  }
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub users: Vec<UserConfig>,
}

/// Verify Basic credentials and return the matching user's identity.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Caller, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let user = config
    .users
    .iter()
    .find(|u| u.username == username)
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::warn!(%username, "rejected credentials");
      Error::Unauthorized
    })?;

  Ok(user.caller())
}

/// Middleware: authenticate the request and attach its [`Caller`] as an
/// extension for the API handlers.
pub async fn authenticate(
  State(config): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let caller = verify_auth(req.headers(), &config)?;
  req.extensions_mut().insert(caller);
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use super::*;
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::header;
  use rand_core::OsRng;

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn config(password: &str) -> AuthConfig {
    AuthConfig {
      users: vec![UserConfig {
        username:      "alice".to_string(),
        password_hash: hash(password),
        user_id:       "user-alice".to_string(),
        domain_id:     "domain-1".to_string(),
        workspace_id:  Some("workspace-1".to_string()),
        projects:      Some(vec!["project-1".to_string()]),
      }],
    }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, value.parse().unwrap());
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn correct_credentials_yield_caller() {
    let caller = verify_auth(&headers(&basic("alice", "secret")), &config("secret")).unwrap();
    assert_eq!(caller.user_id, "user-alice");
    assert_eq!(caller.domain_id, "domain-1");
    assert_eq!(caller.workspace_id.as_deref(), Some("workspace-1"));
    assert_eq!(caller.user_projects, Some(vec!["project-1".to_string()]));
  }

  #[test]
  fn wrong_password() {
    let result = verify_auth(&headers(&basic("alice", "wrong")), &config("secret"));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn unknown_user() {
    let result = verify_auth(&headers(&basic("bob", "secret")), &config("secret"));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn missing_header() {
    let result = verify_auth(&HeaderMap::new(), &config("secret"));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let result = verify_auth(&headers("Basic !!!not-base64!!!"), &config("secret"));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }
}
