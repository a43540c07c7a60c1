//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use dashboard_service::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Service(e) => match e {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Store(_) | Error::Loader(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let ApiError::Service(e) = &self;
    let body = json!({ "code": e.code(), "error": e.to_string() });
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn statuses_follow_error_kind() {
    let not_found = ApiError::from(Error::NotFound { kind: "widget", id: "w".into() });
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

    let latest = ApiError::from(Error::LatestVersion(3));
    assert_eq!(latest.status(), StatusCode::BAD_REQUEST);

    let store = ApiError::from(Error::Store("disk full".into()));
    assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
