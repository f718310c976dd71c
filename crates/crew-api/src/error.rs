//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use crew_core::{AuthError, Error as CoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  /// Hashing or signing failed; never the caller's fault.
  #[error(transparent)]
  Auth(#[from] crew_auth::Error),
}

impl From<AuthError> for ApiError {
  fn from(err: AuthError) -> Self { Self::Core(err.into()) }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Core(CoreError::Validation(_)) => StatusCode::BAD_REQUEST,
      ApiError::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
      ApiError::Core(CoreError::Conflict(_)) => StatusCode::CONFLICT,
      ApiError::Core(CoreError::Forbidden(_)) => StatusCode::FORBIDDEN,
      ApiError::Core(CoreError::Auth(
        AuthError::MissingCredentials | AuthError::InvalidCredentials,
      )) => StatusCode::UNAUTHORIZED,
      ApiError::Core(CoreError::Auth(
        AuthError::InactiveAccount | AuthError::InsufficientRole,
      )) => StatusCode::FORBIDDEN,
      ApiError::Core(CoreError::Store(_)) | ApiError::Auth(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      "internal server error".to_owned()
    } else {
      self.to_string()
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
