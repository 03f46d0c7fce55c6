use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{is_unique_violation, Database};
use crate::error::{LookoutError, Result};
use crate::models::{KeywordRecord, ACCOUNT_NAME_MAX_CHARS, INDUSTRY_MAX_CHARS, KEYWORD_MAX_CHARS};

const SELECT_COLUMNS: &str = "SELECT id, keyword, account_name, industry, timestamp FROM keyword_data";

/// Keyword rows; one per distinct keyword, never updated or deleted
#[derive(Clone)]
pub struct KeywordRepository {
  db: Database,
}

impl KeywordRepository {
  pub fn new(db: Database) -> Self {
    Self { db }
  }

  /// Exact-match lookup
  pub fn find_by_keyword(&self, keyword: &str) -> Result<Option<KeywordRecord>> {
    let conn = self.db.lock();
    let record = conn
      .query_row(&format!("{SELECT_COLUMNS} WHERE keyword = ?1"), params![keyword], row_to_record)
      .optional()?;
    Ok(record)
  }

  pub fn find_by_id(&self, id: i64) -> Result<Option<KeywordRecord>> {
    let conn = self.db.lock();
    let record =
      conn.query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], row_to_record).optional()?;
    Ok(record)
  }

  /// Insert a new keyword. The unique index is the final arbiter: a concurrent insert of
  /// the same keyword surfaces as `DuplicateKeyword`.
  pub fn create(
    &self,
    keyword: &str,
    account_name: Option<&str>,
    industry: Option<&str>,
  ) -> Result<KeywordRecord> {
    validate_keyword(keyword)?;
    validate_metadata(account_name, industry)?;

    let created_at = Utc::now();
    let conn = self.db.lock();
    let inserted = conn.execute(
      "INSERT INTO keyword_data (keyword, account_name, industry, timestamp) VALUES (?1, ?2, ?3, ?4)",
      params![keyword, account_name, industry, created_at],
    );

    match inserted {
      Ok(_) => Ok(KeywordRecord {
        id: conn.last_insert_rowid(),
        keyword: keyword.to_string(),
        account_name: account_name.map(str::to_string),
        industry: industry.map(str::to_string),
        created_at,
      }),
      Err(err) if is_unique_violation(&err) => Err(LookoutError::duplicate_keyword(keyword)),
      Err(err) => Err(err.into()),
    }
  }

  pub fn count(&self) -> Result<usize> {
    let conn = self.db.lock();
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM keyword_data", [], |row| row.get(0))?;
    Ok(count as usize)
  }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<KeywordRecord> {
  Ok(KeywordRecord {
    id: row.get(0)?,
    keyword: row.get(1)?,
    account_name: row.get(2)?,
    industry: row.get(3)?,
    created_at: row.get(4)?,
  })
}

/// Keywords are matched exactly, so they are checked but never normalised
pub fn validate_keyword(keyword: &str) -> Result<()> {
  if keyword.trim().is_empty() {
    return Err(LookoutError::invalid_input("keyword must not be empty"));
  }
  if keyword.chars().count() > KEYWORD_MAX_CHARS {
    return Err(LookoutError::invalid_input(format!(
      "keyword must be at most {KEYWORD_MAX_CHARS} characters"
    )));
  }
  Ok(())
}

/// Length limits on the descriptive fields stored with a keyword
pub fn validate_metadata(account_name: Option<&str>, industry: Option<&str>) -> Result<()> {
  validate_optional("account_name", account_name, ACCOUNT_NAME_MAX_CHARS)?;
  validate_optional("industry", industry, INDUSTRY_MAX_CHARS)
}

fn validate_optional(field: &str, value: Option<&str>, max: usize) -> Result<()> {
  match value {
    Some(value) if value.chars().count() > max => {
      Err(LookoutError::invalid_input(format!("{field} must be at most {max} characters")))
    }
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn repo() -> KeywordRepository {
    KeywordRepository::new(Database::open_in_memory().unwrap())
  }

  #[test]
  fn test_create_then_find() {
    let repo = repo();
    let created = repo.create("golang", Some("Acme"), Some("Tech")).unwrap();

    let found = repo.find_by_keyword("golang").unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.account_name.as_deref(), Some("Acme"));
    assert_eq!(found.industry.as_deref(), Some("Tech"));
    assert_eq!(found.created_at.timestamp(), created.created_at.timestamp());
  }

  #[test]
  fn test_validate_metadata_limits() {
    assert!(validate_metadata(Some(&"a".repeat(100)), None).is_ok());
    assert!(matches!(
      validate_metadata(Some(&"a".repeat(101)), Some("Tech")),
      Err(LookoutError::InvalidInput { .. })
    ));
    assert!(matches!(validate_metadata(None, Some(&"i".repeat(101))), Err(LookoutError::InvalidInput { .. })));
  }

  #[test]
  fn test_find_is_exact_match() {
    let repo = repo();
    repo.create("golang", None, None).unwrap();

    assert!(repo.find_by_keyword("Golang").unwrap().is_none());
    assert!(repo.find_by_keyword("go").unwrap().is_none());
  }

  #[test]
  fn test_duplicate_insert_is_rejected() {
    let repo = repo();
    repo.create("golang", Some("Acme"), Some("Tech")).unwrap();

    let err = repo.create("golang", Some("Other"), Some("Retail")).unwrap_err();
    assert!(matches!(err, LookoutError::DuplicateKeyword { ref keyword } if keyword == "golang"));
    assert_eq!(repo.count().unwrap(), 1);
  }

  #[test]
  fn test_metadata_is_optional() {
    let repo = repo();
    let created = repo.create("rust", None, None).unwrap();
    assert!(created.account_name.is_none());
    assert!(repo.find_by_id(created.id).unwrap().unwrap().industry.is_none());
  }

  #[test]
  fn test_length_limits() {
    let repo = repo();
    assert!(matches!(repo.create(&"k".repeat(101), None, None), Err(LookoutError::InvalidInput { .. })));
    assert!(repo.create(&"k".repeat(100), None, None).is_ok());
    assert!(matches!(
      repo.create("long_account", Some(&"a".repeat(101)), None),
      Err(LookoutError::InvalidInput { .. })
    ));
    assert!(matches!(repo.create("  ", None, None), Err(LookoutError::InvalidInput { .. })));
  }
}
