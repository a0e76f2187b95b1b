//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Every variant renders as a JSON body
/// with an `error` message.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  /// A submission failed the required-field check.
  #[error("{message}")]
  Unprocessable { message: String, missing: Vec<String> },

  /// The document store rejected or never received a submission.
  #[error("{0}")]
  BadGateway(String),

  #[error("unavailable: {0}")]
  Unavailable(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<folio_content::Error> for ApiError {
  fn from(e: folio_content::Error) -> Self {
    use folio_content::Error as E;
    match e {
      E::NotFound { .. } => Self::NotFound(e.to_string()),
      E::Invalid { .. } => Self::BadRequest(e.to_string()),
      E::PublishingDisabled => Self::Unavailable(e.to_string()),
      other => Self::Internal(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      Self::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      Self::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      Self::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "unauthorized" })),
      Self::Unprocessable { message, missing } => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": message, "missing": missing }),
      ),
      Self::BadGateway(m) => (StatusCode::BAD_GATEWAY, json!({ "error": m })),
      Self::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": m })),
      Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": m })),
    };

    let mut res = (status, Json(body)).into_response();
    if matches!(self, Self::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"folio\""),
      );
    }
    res
  }
}
