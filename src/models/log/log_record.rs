//! Attendance log record held in memory and exposed via API.

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
  pub id: i64,
  pub message: String,
}

/// Body of `PUT /api/logs`.
#[derive(Debug, Deserialize)]
pub struct UpdateLog {
  #[serde(deserialize_with = "record_id")]
  pub id: i64,
  pub message: String,
}

/// Body of `DELETE /api/logs`.
#[derive(Debug, Deserialize)]
pub struct DeleteLog {
  #[serde(deserialize_with = "record_id")]
  pub id: i64,
}

/// Accept `2` and `2.0` alike; clients send ids as plain JSON numbers.
fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
  let n = serde_json::Number::deserialize(deserializer)?;
  if let Some(id) = n.as_i64() {
    return Ok(id);
  }
  match n.as_f64() {
    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
    _ => Err(D::Error::custom(format!("invalid record id: {n}"))),
  }
}
