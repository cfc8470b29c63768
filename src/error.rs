//! HTTP-facing error type.

use crate::relay::RelayError;
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
  #[error("Log not found")]
  LogNotFound,

  #[error("Malformed payload: {0}")]
  MalformedPayload(String),

  #[error("Failed to fetch data from external endpoint")]
  Relay(#[from] RelayError),
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = match self {
      AppError::LogNotFound => StatusCode::NOT_FOUND,
      AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
      AppError::Relay { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
