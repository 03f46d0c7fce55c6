//! Error taxonomy for keyword resolution and its collaborators

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookoutError {
  #[error("Keyword '{keyword}' is new; account_name and industry are both required")]
  MissingMetadata { keyword: String },

  #[error("Keyword '{keyword}' already exists")]
  DuplicateKeyword { keyword: String },

  #[error("Invalid input: {message}")]
  InvalidInput { message: String },

  #[error("Reddit client authentication failed: {message}")]
  ExternalAuth { message: String },

  #[error("Reddit fetch failed: {message}")]
  ExternalFetch { message: String },

  #[error("Storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl LookoutError {
  pub fn missing_metadata(keyword: impl Into<String>) -> Self {
    Self::MissingMetadata { keyword: keyword.into() }
  }

  pub fn duplicate_keyword(keyword: impl Into<String>) -> Self {
    Self::DuplicateKeyword { keyword: keyword.into() }
  }

  pub fn invalid_input(message: impl Into<String>) -> Self {
    Self::InvalidInput { message: message.into() }
  }

  pub fn external_auth(message: impl Into<String>) -> Self {
    Self::ExternalAuth { message: message.into() }
  }

  pub fn external_fetch(message: impl Into<String>) -> Self {
    Self::ExternalFetch { message: message.into() }
  }

  /// Stable key reported to HTTP clients
  pub fn key(&self) -> &'static str {
    match self {
      Self::MissingMetadata { .. } => "missing_metadata",
      Self::DuplicateKeyword { .. } => "duplicate_keyword",
      Self::InvalidInput { .. } => "invalid_input",
      Self::ExternalAuth { .. } => "external_auth_failed",
      Self::ExternalFetch { .. } => "external_fetch_failed",
      Self::Storage(_) => "storage_failed",
      Self::Io(_) => "io_failed",
    }
  }

  /// True for errors caused by the caller's input rather than a dependency
  pub fn is_client_error(&self) -> bool {
    matches!(self, Self::MissingMetadata { .. } | Self::DuplicateKeyword { .. } | Self::InvalidInput { .. })
  }
}

pub type Result<T> = std::result::Result<T, LookoutError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_errors_are_distinct_from_dependency_errors() {
    assert!(LookoutError::missing_metadata("golang").is_client_error());
    assert!(LookoutError::duplicate_keyword("golang").is_client_error());
    assert!(!LookoutError::external_auth("bad secret").is_client_error());
    assert!(!LookoutError::external_fetch("timeout").is_client_error());
  }

  #[test]
  fn test_messages_name_the_keyword() {
    let err = LookoutError::duplicate_keyword("rust");
    assert_eq!(err.to_string(), "Keyword 'rust' already exists");
    assert_eq!(err.key(), "duplicate_keyword");
  }
}
