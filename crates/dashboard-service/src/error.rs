//! Service error type. Every variant carries a stable code that surfaces
//! unchanged in API responses.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("required parameter is missing: {0}")]
  RequiredParameter(&'static str),

  #[error("user_id {user_id:?} does not match the authenticated user {caller_id:?}")]
  InvalidUserId { user_id: String, caller_id: String },

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: String },

  #[error("invalid parameter {key}: {reason}")]
  InvalidParameter { key: &'static str, reason: String },

  #[error("dashboards with schema version {0} do not support widgets")]
  NotSupportedVersion(String),

  #[error("version {0} is the latest version and cannot be deleted")]
  LatestVersion(u32),

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("loader error: {0}")]
  Loader(#[source] BoxError),
}

impl Error {
  /// Stable machine-readable error code.
  pub fn code(&self) -> &'static str {
    match self {
      Self::RequiredParameter(_) => "ERROR_REQUIRED_PARAMETER",
      Self::InvalidUserId { .. } => "ERROR_INVALID_USER_ID",
      Self::NotFound { .. } => "ERROR_NOT_FOUND",
      Self::InvalidParameter { .. } => "ERROR_INVALID_PARAMETER",
      Self::NotSupportedVersion(_) => "ERROR_NOT_SUPPORTED_VERSION",
      Self::LatestVersion(_) => "ERROR_LATEST_VERSION",
      Self::Store(_) => "ERROR_STORE",
      Self::Loader(_) => "ERROR_LOADER",
    }
  }

  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub(crate) fn loader<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Loader(Box::new(e))
  }

  pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
