//! HTTP boundary: axum router, handlers and the JSON envelope they share
//!
//! Request and response types derive `schemars::JsonSchema` so the API can be documented
//! from the types alone.

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::gateway::ClientGateway;
use crate::models::CredentialSet;
use crate::reddit::{AuditSink, ClientFactory, RedditClientFactory};
use crate::resolver::ResolutionService;
use crate::storage::{AuditLogRepository, Database, KeywordRepository, ResultRepository, SqliteAuditSink};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
  pub service: Arc<ResolutionService>,
  pub gateway: Arc<ClientGateway>,
  pub audit_log: AuditLogRepository,
  pub database_path: Option<PathBuf>,
}

impl AppState {
  /// Wire repositories, gateway and resolver around one database
  pub fn assemble(
    db: Database,
    credentials: CredentialSet,
    factory: Arc<dyn ClientFactory>,
    fetch_limit: usize,
  ) -> Self {
    let audit_log = AuditLogRepository::new(db.clone());
    let sink: Arc<dyn AuditSink> = Arc::new(SqliteAuditSink::new(audit_log.clone()));
    let gateway = Arc::new(ClientGateway::new(factory, credentials, sink));
    let service = ResolutionService::new(
      KeywordRepository::new(db.clone()),
      ResultRepository::new(db.clone()),
      Arc::clone(&gateway),
    )
    .with_fetch_limit(fetch_limit);

    Self { service: Arc::new(service), gateway, audit_log, database_path: db.path().map(Path::to_path_buf) }
  }

  /// Open the configured database and talk to Reddit over HTTP
  pub fn from_config(config: &Config) -> Result<Self> {
    let db = Database::open(&config.database_path)?;
    let factory = Arc::new(RedditClientFactory::new(config.endpoints.clone()));
    Ok(Self::assemble(db, config.credentials.clone(), factory, config.fetch_limit))
  }
}
