//! Diagnostic channel of the Reddit client
//!
//! Every outgoing request and response is announced on the channel. Listeners implement
//! `AuditSink`; the channel hands them preformatted messages and ignores what they do with them.

use std::sync::{Arc, PoisonError, RwLock};

/// Receives diagnostic events. Infallible by signature: a sink that cannot store an event
/// deals with that itself.
#[cfg_attr(test, mockall::automock)]
pub trait AuditSink: Send + Sync {
  fn record(&self, message: &str);
}

/// Cloneable fan-out of diagnostic events to attached sinks
#[derive(Clone, Default)]
pub struct DiagnosticChannel {
  listeners: Arc<RwLock<Vec<Arc<dyn AuditSink>>>>,
}

impl DiagnosticChannel {
  pub fn new() -> Self {
    Self::default()
  }

  /// Attach a sink. Returns `false` without attaching if this exact sink is already attached.
  pub fn attach(&self, sink: Arc<dyn AuditSink>) -> bool {
    let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
    if listeners.iter().any(|existing| std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(&sink))) {
      return false;
    }
    listeners.push(sink);
    true
  }

  pub fn listener_count(&self) -> usize {
    self.listeners.read().unwrap_or_else(PoisonError::into_inner).len()
  }

  /// Mirror `message` to tracing and deliver it to every listener
  pub fn emit(&self, message: &str) {
    tracing::debug!(target: "lookout::reddit", "{message}");

    // Snapshot so a slow sink never holds the lock
    let listeners: Vec<Arc<dyn AuditSink>> =
      self.listeners.read().unwrap_or_else(PoisonError::into_inner).clone();
    for listener in listeners {
      listener.record(message);
    }
  }
}
