//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sitework_engine::Error> for ApiError {
  fn from(err: sitework_engine::Error) -> Self {
    use sitework_core::Error as Domain;
    match err {
      sitework_engine::Error::Domain(domain) => match domain {
        Domain::ProjectNotFound(_)
        | Domain::ActivityNotFound(_)
        | Domain::NoProjectsForUser(_)
        | Domain::NoUnreadActivities(_) => Self::NotFound(domain.to_string()),
        Domain::WorkerFeed => Self::Forbidden(domain.to_string()),
        other => Self::Unprocessable(other.to_string()),
      },
      sitework_engine::Error::Store(e) => Self::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unprocessable(m) => {
        (StatusCode::UNPROCESSABLE_ENTITY, m.clone())
      }
      ApiError::Internal(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
