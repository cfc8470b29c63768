//! Outbound attendance relay.
//!
//! Flattens a JSON object into form fields and POSTs it to the external
//! logging endpoint as `application/x-www-form-urlencoded`.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Upstream used when `DTRKIOSK_UPSTREAM_URL` is not set.
pub const DEFAULT_UPSTREAM_URL: &str = "https://27.110.162.133/idilg/datalog.php";

#[derive(Debug, Error)]
pub enum RelayError {
  #[error("malformed body: {0}")]
  MalformedBody(String),

  #[error("upstream request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("upstream returned {0}")]
  Status(StatusCode),
}

#[derive(Clone)]
pub struct Relay {
  client: Client,
  url: String,
}

impl Relay {
  /// Build a relay for `url`. `insecure` disables certificate validation.
  pub fn new(url: impl Into<String>, insecure: bool, timeout: Duration) -> Result<Self, RelayError> {
    let url = url.into();
    if insecure {
      warn!("TLS certificate validation disabled for upstream {url}");
    }
    let client = Client::builder()
      .danger_accept_invalid_certs(insecure)
      .timeout(timeout)
      .build()?;
    Ok(Self { client, url })
  }

  /// Forward `body` upstream. Returns the encoded form that was sent.
  pub async fn forward(&self, body: &Value) -> Result<String, RelayError> {
    let fields = form_fields(body)?;
    let request = self.client.post(&self.url).form(&fields).build()?;
    let encoded = request
      .body()
      .and_then(|b| b.as_bytes())
      .map(|b| String::from_utf8_lossy(b).into_owned())
      .unwrap_or_default();

    let response = self.client.execute(request).await?;
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    debug!(%status, body = %text, "upstream response");

    if status != StatusCode::OK {
      return Err(RelayError::Status(status));
    }
    Ok(encoded)
  }
}

/// Flatten a top-level JSON object into form fields, in body order.
pub fn form_fields(body: &Value) -> Result<Vec<(String, String)>, RelayError> {
  let Value::Object(map) = body else {
    return Err(RelayError::MalformedBody(format!(
      "expected a JSON object, got {}",
      kind(body)
    )));
  };
  Ok(
    map
      .iter()
      .map(|(k, v)| (k.clone(), field_text(v)))
      .collect(),
  )
}

fn field_text(v: &Value) -> String {
  match v {
    Value::String(s) => s.clone(),
    Value::Null => "null".to_string(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    Value::Array(items) => items
      .iter()
      .map(|item| match item {
        Value::Null => String::new(),
        other => field_text(other),
      })
      .collect::<Vec<_>>()
      .join(","),
    Value::Object(_) => v.to_string(),
  }
}

fn kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
