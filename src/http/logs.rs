//! Attendance logs API.

use crate::{
  app::AppState,
  error::AppError,
  models::log::log_record::{DeleteLog, LogRecord, UpdateLog},
  relay::RelayError,
};
use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

/// Relay an attendance record upstream and keep it on success.
pub async fn create_log(
  State(state): State<AppState>,
  body: Bytes,
) -> Result<impl IntoResponse, AppError> {
  match relay_body(&state, &body).await {
    Ok(encoded) => {
      let record = state.store.append(encoded).await;
      info!(id = record.id, "attendance record relayed");
      Ok((StatusCode::CREATED, Json("ok")))
    }
    Err(e) => {
      error!("create_log relay error: {e}");
      Err(e.into())
    }
  }
}

async fn relay_body(state: &AppState, body: &[u8]) -> Result<String, RelayError> {
  let value: Value =
    serde_json::from_slice(body).map_err(|e| RelayError::MalformedBody(e.to_string()))?;
  state.relay.forward(&value).await
}

pub async fn list_logs(State(state): State<AppState>) -> Json<Vec<LogRecord>> {
  Json(state.store.list().await)
}

/// Parse a JSON body whatever its content type, like `create_log` does.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
  serde_json::from_slice(body).map_err(|e| AppError::MalformedPayload(e.to_string()))
}

pub async fn update_log(
  State(state): State<AppState>,
  body: Bytes,
) -> Result<Json<LogRecord>, AppError> {
  let req: UpdateLog = parse_body(&body)?;
  state
    .store
    .update(req.id, req.message)
    .await
    .map(Json)
    .ok_or(AppError::LogNotFound)
}

pub async fn delete_log(
  State(state): State<AppState>,
  body: Bytes,
) -> Result<Json<LogRecord>, AppError> {
  let req: DeleteLog = parse_body(&body)?;
  state
    .store
    .remove(req.id)
    .await
    .map(Json)
    .ok_or(AppError::LogNotFound)
}
