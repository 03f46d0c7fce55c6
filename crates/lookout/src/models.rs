//! Records persisted by the repositories, and the credentials used to reach Reddit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reddit::Submission;

pub const KEYWORD_MAX_CHARS: usize = 100;
pub const ACCOUNT_NAME_MAX_CHARS: usize = 100;
pub const INDUSTRY_MAX_CHARS: usize = 100;
pub const SUBREDDIT_MAX_CHARS: usize = 21;
pub const AUTHOR_MAX_CHARS: usize = 50;
pub const TITLE_MAX_CHARS: usize = 255;
pub const AUDIT_MESSAGE_MAX_CHARS: usize = 255;

pub const NO_COMMENTS: &str = "No comments";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One row per distinct keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
  pub id: i64,
  pub keyword: String,
  pub account_name: Option<String>,
  pub industry: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// A Reddit submission stored for a keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
  pub id: i64,
  pub source_name: String,
  pub body: String,
  pub published_at: DateTime<Utc>,
  pub author: String,
  pub title: String,
  pub keyword_id: i64,
}

/// A result that has not been written yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewResult {
  pub source_name: String,
  pub body: String,
  pub published_at: DateTime<Utc>,
  pub author: String,
  pub title: String,
}

impl NewResult {
  /// Map a fetched submission, applying the sentinel fallbacks and column limits
  pub fn from_submission(submission: &Submission) -> Self {
    let body = submission
      .selftext
      .as_deref()
      .filter(|text| !text.is_empty())
      .unwrap_or(NO_COMMENTS)
      .to_string();

    let author = submission
      .author
      .as_deref()
      .filter(|name| !name.is_empty())
      .unwrap_or(UNKNOWN_AUTHOR);

    Self {
      source_name: truncate_chars(&submission.subreddit, SUBREDDIT_MAX_CHARS),
      body,
      published_at: timestamp_from_epoch(submission.created_utc),
      author: truncate_chars(author, AUTHOR_MAX_CHARS),
      title: truncate_chars(&submission.title, TITLE_MAX_CHARS),
    }
  }
}

/// One captured diagnostic event from the Reddit client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogRecord {
  pub id: i64,
  pub message: String,
  pub timestamp: DateTime<Utc>,
}

/// Reddit application credentials; replaced wholesale, never patched
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
  pub client_id: String,
  pub client_secret: String,
  pub user_agent: String,
}

impl CredentialSet {
  pub fn new(
    client_id: impl Into<String>,
    client_secret: impl Into<String>,
    user_agent: impl Into<String>,
  ) -> Self {
    Self {
      client_id: client_id.into(),
      client_secret: client_secret.into(),
      user_agent: user_agent.into(),
    }
  }
}

impl std::fmt::Debug for CredentialSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CredentialSet")
      .field("client_id", &self.client_id)
      .field("client_secret", &"<redacted>")
      .field("user_agent", &self.user_agent)
      .finish()
  }
}

/// Cut `value` to at most `max` characters without splitting a code point
pub fn truncate_chars(value: &str, max: usize) -> String {
  match value.char_indices().nth(max) {
    Some((end, _)) => value[..end].to_string(),
    None => value.to_string(),
  }
}

/// Convert Reddit's float epoch seconds; out-of-range values clamp to the epoch
pub fn timestamp_from_epoch(seconds: f64) -> DateTime<Utc> {
  let whole = seconds.floor();
  // Fraction past the floored second, so pre-epoch values keep a non-negative nanosecond part
  let nanos = ((seconds - whole) * 1_000_000_000.0).round().min(999_999_999.0) as u32;
  DateTime::from_timestamp(whole as i64, nanos).unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn submission(selftext: Option<&str>, author: Option<&str>) -> Submission {
    Submission {
      subreddit: "golang".to_string(),
      selftext: selftext.map(str::to_string),
      created_utc: 1_700_000_000.0,
      author: author.map(str::to_string),
      title: "Generics in practice".to_string(),
    }
  }

  #[test]
  fn test_empty_body_maps_to_no_comments() {
    let mapped = NewResult::from_submission(&submission(Some(""), Some("gopher")));
    assert_eq!(mapped.body, "No comments");

    let mapped = NewResult::from_submission(&submission(None, Some("gopher")));
    assert_eq!(mapped.body, "No comments");
  }

  #[test]
  fn test_missing_author_maps_to_unknown() {
    let mapped = NewResult::from_submission(&submission(Some("text"), None));
    assert_eq!(mapped.author, "Unknown");
    assert_eq!(mapped.body, "text");
  }

  #[test]
  fn test_created_utc_becomes_timestamp() {
    let mapped = NewResult::from_submission(&submission(None, None));
    assert_eq!(mapped.published_at.timestamp(), 1_700_000_000);
  }

  #[test]
  fn test_fractional_epochs_convert_in_both_directions() {
    let after = timestamp_from_epoch(1.5);
    assert_eq!(after.timestamp(), 1);
    assert_eq!(after.timestamp_subsec_millis(), 500);

    let before = timestamp_from_epoch(-1.5);
    assert_eq!(before.timestamp(), -2);
    assert_eq!(before.timestamp_subsec_millis(), 500);
    assert_eq!(before.timestamp_millis(), -1500);
  }

  #[test]
  fn test_long_fields_are_truncated_to_column_limits() {
    let mut long = submission(None, Some(&"a".repeat(80)));
    long.subreddit = "s".repeat(40);
    long.title = "t".repeat(400);

    let mapped = NewResult::from_submission(&long);
    assert_eq!(mapped.source_name.chars().count(), SUBREDDIT_MAX_CHARS);
    assert_eq!(mapped.author.chars().count(), AUTHOR_MAX_CHARS);
    assert_eq!(mapped.title.chars().count(), TITLE_MAX_CHARS);
  }

  #[test]
  fn test_truncate_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("short", 10), "short");
  }

  #[test]
  fn test_debug_redacts_secret() {
    let creds = CredentialSet::new("id", "hunter2", "agent/1.0");
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("agent/1.0"));
  }
}
