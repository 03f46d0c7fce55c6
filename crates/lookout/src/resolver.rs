//! Cache-or-fetch resolution of keywords to stored Reddit submissions

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{LookoutError, Result};
use crate::gateway::ClientGateway;
use crate::models::{KeywordRecord, NewResult, ResultRecord};
use crate::storage::keywords::{validate_keyword, validate_metadata};
use crate::storage::{KeywordRepository, ResultRepository};

/// Submissions requested from a subreddit's "hot" listing per fetch
pub const DEFAULT_FETCH_LIMIT: usize = 10;

type FetchLock = Arc<tokio::sync::Mutex<()>>;

pub struct ResolutionService {
  keywords: KeywordRepository,
  results: ResultRepository,
  gateway: Arc<ClientGateway>,
  fetch_limit: usize,
  fetch_locks: Mutex<HashMap<String, FetchLock>>,
}

impl ResolutionService {
  pub fn new(keywords: KeywordRepository, results: ResultRepository, gateway: Arc<ClientGateway>) -> Self {
    Self { keywords, results, gateway, fetch_limit: DEFAULT_FETCH_LIMIT, fetch_locks: Mutex::new(HashMap::new()) }
  }

  pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
    self.fetch_limit = fetch_limit;
    self
  }

  pub fn gateway(&self) -> &Arc<ClientGateway> {
    &self.gateway
  }

  /// Stored results for `keyword`, fetching from Reddit when there are none.
  ///
  /// A keyword seen for the first time needs both `account_name` and `industry`
  /// (blank counts as missing). A failed fetch leaves the store untouched.
  pub async fn resolve(
    &self,
    keyword: &str,
    account_name: Option<&str>,
    industry: Option<&str>,
  ) -> Result<Vec<ResultRecord>> {
    validate_keyword(keyword)?;

    let lease = self.lease_fetch_lock(keyword);
    let _guard = lease.lock.lock().await;
    self.resolve_locked(keyword, account_name, industry).await
  }

  async fn resolve_locked(
    &self,
    keyword: &str,
    account_name: Option<&str>,
    industry: Option<&str>,
  ) -> Result<Vec<ResultRecord>> {
    match self.keywords.find_by_keyword(keyword)? {
      Some(record) => {
        let stored = self.results.find_by_keyword_id(record.id)?;
        if !stored.is_empty() {
          tracing::debug!(keyword, count = stored.len(), "Cache hit");
          return Ok(stored);
        }

        tracing::debug!(keyword, "Known keyword has no stored results; fetching");
        let items = self.fetch(keyword).await?;
        self.persist(&record, &items)
      }
      None => {
        let (account_name, industry) = match (present(account_name), present(industry)) {
          (Some(account_name), Some(industry)) => (account_name, industry),
          _ => return Err(LookoutError::missing_metadata(keyword)),
        };
        validate_metadata(Some(account_name), Some(industry))?;

        tracing::debug!(keyword, "New keyword; fetching");
        let items = self.fetch(keyword).await?;
        let record = self.obtain_keyword(keyword, account_name, industry)?;
        self.persist(&record, &items)
      }
    }
  }

  /// Create a keyword without fetching. Unlike `resolve`, an existing keyword is an error.
  pub fn register_keyword(
    &self,
    keyword: &str,
    account_name: Option<&str>,
    industry: Option<&str>,
  ) -> Result<KeywordRecord> {
    validate_keyword(keyword)?;
    if self.keywords.find_by_keyword(keyword)?.is_some() {
      return Err(LookoutError::duplicate_keyword(keyword));
    }

    let record = self.keywords.create(keyword, present(account_name), present(industry))?;
    tracing::info!(keyword, id = record.id, "Registered keyword");
    Ok(record)
  }

  /// Up to `fetch_limit` hot submissions from the subreddit named `keyword`, mapped for storage
  pub async fn fetch(&self, keyword: &str) -> Result<Vec<NewResult>> {
    let client = self.gateway.get_client().await?;
    let submissions = client.hot(keyword, self.fetch_limit).await?;
    tracing::info!(keyword, count = submissions.len(), "Fetched submissions from Reddit");

    Ok(submissions.iter().take(self.fetch_limit).map(NewResult::from_submission).collect())
  }

  /// Insert the keyword; if another writer got there first, use theirs
  fn obtain_keyword(&self, keyword: &str, account_name: &str, industry: &str) -> Result<KeywordRecord> {
    match self.keywords.create(keyword, Some(account_name), Some(industry)) {
      Ok(record) => Ok(record),
      Err(LookoutError::DuplicateKeyword { .. }) => {
        tracing::warn!(keyword, "Keyword was created concurrently; reusing the stored record");
        self.keywords.find_by_keyword(keyword)?.ok_or_else(|| LookoutError::duplicate_keyword(keyword))
      }
      Err(e) => Err(e),
    }
  }

  fn persist(&self, record: &KeywordRecord, items: &[NewResult]) -> Result<Vec<ResultRecord>> {
    let persisted = self.results.create_batch(record.id, items)?;
    tracing::info!(keyword = %record.keyword, count = persisted.len(), "Stored fetched results");
    Ok(persisted)
  }

  fn lease_fetch_lock<'a>(&'a self, keyword: &'a str) -> FetchLockLease<'a> {
    let mut locks = self.fetch_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let lock = Arc::clone(locks.entry(keyword.to_string()).or_default());
    FetchLockLease { service: self, keyword, lock }
  }

  fn release_fetch_lock(&self, keyword: &str, lock: &FetchLock) {
    let mut locks = self.fetch_locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    // Map entry plus ours: nobody else is waiting on it
    if Arc::strong_count(lock) == 2 {
      locks.remove(keyword);
    }
  }

  #[cfg(test)]
  fn pending_locks(&self) -> usize {
    self.fetch_locks.lock().map(|locks| locks.len()).unwrap_or_default()
  }
}

/// Holds a keyword's fetch lock entry; returns it to the map when dropped, including
/// when the resolving future is cancelled
struct FetchLockLease<'a> {
  service: &'a ResolutionService,
  keyword: &'a str,
  lock: FetchLock,
}

impl Drop for FetchLockLease<'_> {
  fn drop(&mut self) {
    self.service.release_fetch_lock(self.keyword, &self.lock);
  }
}

fn present(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}
