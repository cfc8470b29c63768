//! In-memory attendance log store.
//!
//! Records live for the lifetime of the process only. Every operation goes
//! through one `RwLock`, so concurrent updates and deletes on the same id are
//! applied in lock acquisition order.

use crate::models::log::log_record::LogRecord;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct LogStore {
  records: Arc<RwLock<Vec<LogRecord>>>,
}

impl LogStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start from an existing list, kept in the given order.
  pub fn with_records(records: Vec<LogRecord>) -> Self {
    Self {
      records: Arc::new(RwLock::new(records)),
    }
  }

  pub async fn list(&self) -> Vec<LogRecord> {
    self.records.read().await.clone()
  }

  /// Append a record with the next free id (max + 1, starting at 1).
  pub async fn append(&self, message: impl Into<String>) -> LogRecord {
    let mut records = self.records.write().await;
    let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
    let record = LogRecord {
      id,
      message: message.into(),
    };
    records.push(record.clone());
    record
  }

  /// Replace the message of the first record with `id`.
  pub async fn update(&self, id: i64, message: impl Into<String>) -> Option<LogRecord> {
    let mut records = self.records.write().await;
    let record = records.iter_mut().find(|r| r.id == id)?;
    record.message = message.into();
    Some(record.clone())
  }

  /// Remove the first record with `id` and return its prior value.
  pub async fn remove(&self, id: i64) -> Option<LogRecord> {
    let mut records = self.records.write().await;
    let index = records.iter().position(|r| r.id == id)?;
    Some(records.remove(index))
  }
}
