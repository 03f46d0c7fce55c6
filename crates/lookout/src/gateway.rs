//! Holds the current Reddit credentials and the client built from them.
//!
//! The client is built lazily on first use and cached until the credentials are
//! replaced. Construction happens under the write lock, so at most one client is
//! built per credential epoch; fetches only clone the cached handle.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::CredentialSet;
use crate::reddit::{AuditSink, ClientFactory, ContentClient, DiagnosticChannel};

struct GatewayState {
  credentials: CredentialSet,
  client: Option<Arc<dyn ContentClient>>,
  epoch: u64,
}

pub struct ClientGateway {
  factory: Arc<dyn ClientFactory>,
  audit_sink: Arc<dyn AuditSink>,
  diagnostics: DiagnosticChannel,
  state: RwLock<GatewayState>,
}

impl ClientGateway {
  pub fn new(
    factory: Arc<dyn ClientFactory>,
    credentials: CredentialSet,
    audit_sink: Arc<dyn AuditSink>,
  ) -> Self {
    Self {
      factory,
      audit_sink,
      diagnostics: DiagnosticChannel::new(),
      state: RwLock::new(GatewayState { credentials, client: None, epoch: 0 }),
    }
  }

  /// Replace the credentials and drop the cached client in one step
  pub async fn update_credentials(&self, credentials: CredentialSet) {
    let mut state = self.state.write().await;
    state.credentials = credentials;
    state.client = None;
    state.epoch += 1;
    tracing::info!(epoch = state.epoch, "Reddit credentials replaced; client will be rebuilt on next use");
  }

  /// The cached client, building one from the current credentials if needed.
  /// A failed build is not cached; the next call tries again.
  pub async fn get_client(&self) -> Result<Arc<dyn ContentClient>> {
    {
      let state = self.state.read().await;
      if let Some(client) = &state.client {
        return Ok(Arc::clone(client));
      }
    }

    let mut state = self.state.write().await;
    if let Some(client) = &state.client {
      return Ok(Arc::clone(client));
    }

    let client = match self.factory.build(&state.credentials, self.diagnostics.clone()) {
      Ok(client) => client,
      Err(e) => {
        tracing::warn!(epoch = state.epoch, "Failed to build Reddit client: {e}");
        return Err(e);
      }
    };

    if self.diagnostics.attach(Arc::clone(&self.audit_sink)) {
      tracing::debug!("Audit sink attached to Reddit diagnostics");
    }
    state.client = Some(Arc::clone(&client));
    tracing::debug!(epoch = state.epoch, "Built Reddit client");

    Ok(client)
  }

  pub async fn credentials(&self) -> CredentialSet {
    self.state.read().await.credentials.clone()
  }

  /// Number of credential replacements since startup
  pub async fn epoch(&self) -> u64 {
    self.state.read().await.epoch
  }

  pub async fn has_client(&self) -> bool {
    self.state.read().await.client.is_some()
  }

  pub fn diagnostics(&self) -> &DiagnosticChannel {
    &self.diagnostics
  }
}
