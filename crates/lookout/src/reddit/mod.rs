//! Reddit access: the client seam used by the gateway, and its HTTP implementation

pub mod client;
pub mod diagnostics;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::models::CredentialSet;

pub use client::{RedditClient, RedditEndpoints};
pub use diagnostics::{AuditSink, DiagnosticChannel};
#[cfg(test)]
pub use diagnostics::MockAuditSink;

/// A submission as listed by Reddit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  /// Display name of the subreddit the submission lives in
  pub subreddit: String,
  pub selftext: Option<String>,
  /// Creation time, Unix epoch seconds
  pub created_utc: f64,
  pub author: Option<String>,
  pub title: String,
}

/// Lists submissions from a named subreddit
#[async_trait]
pub trait ContentClient: Send + Sync {
  /// Up to `limit` of the current "hot" submissions in `subreddit`
  async fn hot(&self, subreddit: &str, limit: usize) -> Result<Vec<Submission>>;
}

/// Builds a client handle from credentials
pub trait ClientFactory: Send + Sync {
  fn build(
    &self,
    credentials: &CredentialSet,
    diagnostics: DiagnosticChannel,
  ) -> Result<Arc<dyn ContentClient>>;
}

/// Production factory producing `RedditClient`s
#[derive(Debug, Clone, Default)]
pub struct RedditClientFactory {
  endpoints: RedditEndpoints,
}

impl RedditClientFactory {
  pub fn new(endpoints: RedditEndpoints) -> Self {
    Self { endpoints }
  }
}

impl ClientFactory for RedditClientFactory {
  fn build(
    &self,
    credentials: &CredentialSet,
    diagnostics: DiagnosticChannel,
  ) -> Result<Arc<dyn ContentClient>> {
    let client = RedditClient::new(credentials.clone(), self.endpoints.clone(), diagnostics)?;
    Ok(Arc::new(client))
  }
}
