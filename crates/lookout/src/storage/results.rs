use rusqlite::{params, Row};

use super::Database;
use crate::error::Result;
use crate::models::{NewResult, ResultRecord};

/// Fetched submissions, each owned by exactly one keyword
#[derive(Clone)]
pub struct ResultRepository {
  db: Database,
}

impl ResultRepository {
  pub fn new(db: Database) -> Self {
    Self { db }
  }

  /// All results for a keyword in insertion order
  pub fn find_by_keyword_id(&self, keyword_id: i64) -> Result<Vec<ResultRecord>> {
    let conn = self.db.lock();
    let mut stmt = conn.prepare(
      "SELECT id, subreddit, comment, created_date, author, title, keyword_data_id
       FROM subreddit_data WHERE keyword_data_id = ?1 ORDER BY id",
    )?;
    let records = stmt
      .query_map(params![keyword_id], row_to_record)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
  }

  /// Persist a batch atomically: either every item is stored or none is
  pub fn create_batch(&self, keyword_id: i64, items: &[NewResult]) -> Result<Vec<ResultRecord>> {
    if items.is_empty() {
      return Ok(Vec::new());
    }

    let mut conn = self.db.lock();
    let tx = conn.transaction()?;
    let mut stored = Vec::with_capacity(items.len());

    {
      let mut stmt = tx.prepare(
        "INSERT INTO subreddit_data (subreddit, comment, created_date, author, title, keyword_data_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      )?;

      for item in items {
        stmt.execute(params![
          item.source_name,
          item.body,
          item.published_at,
          item.author,
          item.title,
          keyword_id
        ])?;

        stored.push(ResultRecord {
          id: tx.last_insert_rowid(),
          source_name: item.source_name.clone(),
          body: item.body.clone(),
          published_at: item.published_at,
          author: item.author.clone(),
          title: item.title.clone(),
          keyword_id,
        });
      }
    }

    tx.commit()?;
    Ok(stored)
  }

  pub fn count_for_keyword(&self, keyword_id: i64) -> Result<usize> {
    let conn = self.db.lock();
    let count: i64 = conn.query_row(
      "SELECT COUNT(*) FROM subreddit_data WHERE keyword_data_id = ?1",
      params![keyword_id],
      |row| row.get(0),
    )?;
    Ok(count as usize)
  }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ResultRecord> {
  Ok(ResultRecord {
    id: row.get(0)?,
    source_name: row.get(1)?,
    body: row.get(2)?,
    published_at: row.get(3)?,
    author: row.get(4)?,
    title: row.get(5)?,
    keyword_id: row.get(6)?,
  })
}
