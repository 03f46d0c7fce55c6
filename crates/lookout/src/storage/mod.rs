//! SQLite persistence for keywords, fetched results and Reddit client audit logs
//!
//! One connection is shared by every repository. Callers hold the lock only for the
//! duration of a single statement or transaction, never across an `.await`.

pub mod audit;
pub mod keywords;
pub mod results;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;

pub use audit::{AuditLogRepository, SqliteAuditSink};
pub use keywords::KeywordRepository;
pub use results::ResultRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS keyword_data (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  keyword TEXT NOT NULL UNIQUE,
  account_name TEXT,
  industry TEXT,
  timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subreddit_data (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  subreddit TEXT NOT NULL,
  comment TEXT NOT NULL,
  created_date TEXT NOT NULL,
  author TEXT NOT NULL,
  title TEXT NOT NULL,
  keyword_data_id INTEGER NOT NULL REFERENCES keyword_data(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_subreddit_data_keyword ON subreddit_data(keyword_data_id);

CREATE TABLE IF NOT EXISTS praw_log_data (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  log TEXT NOT NULL,
  timestamp TEXT NOT NULL
);
"#;

/// Shared handle to the lookout database
#[derive(Clone)]
pub struct Database {
  conn: Arc<Mutex<Connection>>,
  path: Option<PathBuf>,
}

impl Database {
  /// Open (or create) the database file, creating parent directories as needed
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }

    let conn = Connection::open(&path)?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    Self::initialize(conn, Some(path))
  }

  /// Private in-memory database, used by tests
  pub fn open_in_memory() -> Result<Self> {
    Self::initialize(Connection::open_in_memory()?, None)
  }

  fn initialize(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn: Arc::new(Mutex::new(conn)), path })
  }

  /// Location on disk, or `None` for in-memory databases
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// A panic while holding the lock cannot leave a half-applied statement behind,
  /// so a poisoned mutex is still safe to reuse.
  pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(failure, _)
      if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
