use chrono::Utc;
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{truncate_chars, AuditLogRecord, AUDIT_MESSAGE_MAX_CHARS};
use crate::reddit::AuditSink;

/// Append-only log of Reddit client diagnostics
#[derive(Clone)]
pub struct AuditLogRepository {
  db: Database,
}

impl AuditLogRepository {
  pub fn new(db: Database) -> Self {
    Self { db }
  }

  pub fn append(&self, message: &str) -> Result<AuditLogRecord> {
    let message = truncate_chars(message, AUDIT_MESSAGE_MAX_CHARS);
    let timestamp = Utc::now();

    let conn = self.db.lock();
    conn.execute(
      "INSERT INTO praw_log_data (log, timestamp) VALUES (?1, ?2)",
      params![message, timestamp],
    )?;

    Ok(AuditLogRecord { id: conn.last_insert_rowid(), message, timestamp })
  }

  /// Every record in insertion order
  pub fn list_all(&self) -> Result<Vec<AuditLogRecord>> {
    let conn = self.db.lock();
    let mut stmt = conn.prepare("SELECT id, log, timestamp FROM praw_log_data ORDER BY id")?;
    let records = stmt
      .query_map([], |row| {
        Ok(AuditLogRecord { id: row.get(0)?, message: row.get(1)?, timestamp: row.get(2)? })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
  }
}

/// Audit sink that writes each diagnostic event to `praw_log_data`
///
/// Storage failures are logged and dropped; they never reach the fetch that emitted the event.
#[derive(Clone)]
pub struct SqliteAuditSink {
  repository: AuditLogRepository,
}

impl SqliteAuditSink {
  pub fn new(repository: AuditLogRepository) -> Self {
    Self { repository }
  }
}

impl AuditSink for SqliteAuditSink {
  fn record(&self, message: &str) {
    if let Err(e) = self.repository.append(message) {
      tracing::warn!(error = %e, "dropping reddit audit event");
    }
  }
}
