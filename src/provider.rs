//! Session provider seam — the injected identity backend.
//!
//! DESIGN
//! ======
//! The engine never talks to an identity SDK directly. It takes a
//! `SessionProvider`: a push stream of session snapshots plus the one
//! profile mutation this crate performs. Production wires in
//! [`crate::firebase::FirebaseProvider`]; tests and the demo binary use
//! [`MemoryProvider`].

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::session::SessionSnapshot;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors produced by provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected the request with a non-success status.
    #[error("provider api error: status {status}: {body}")]
    Api { status: u16, body: String },
    /// The request never completed (network, TLS, timeout).
    #[error("provider request failed: {0}")]
    Request(String),
    /// The provider response body could not be deserialized.
    #[error("provider response parse failed: {0}")]
    Parse(String),
    /// No credential is available to authenticate the call.
    #[error("no id token available")]
    MissingToken,
    /// The operation requires a signed-in user and there is none.
    #[error("no signed-in user")]
    NoUser,
}

// =============================================================================
// TRAIT
// =============================================================================

/// Identity backend: session snapshot stream + profile update.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Subscribe to the session snapshot stream. The receiver always holds
    /// the latest snapshot; every upstream change (login, logout, token
    /// refresh, profile change) is pushed to all subscribers.
    fn snapshots(&self) -> watch::Receiver<SessionSnapshot>;

    /// Update the signed-in user's display name.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if there is no signed-in user or the
    /// backend rejects the update. Implementations do not push a refreshed
    /// snapshot on success; the caller decides when to re-read the session.
    async fn update_display_name(&self, name: &str) -> Result<(), ProviderError>;
}

// =============================================================================
// MEMORY PROVIDER
// =============================================================================

/// In-process provider: snapshots are pushed by the embedding code and
/// updates succeed or fail on demand. Backs the demo binary and the engine
/// tests.
pub struct MemoryProvider {
    snapshot_tx: watch::Sender<SessionSnapshot>,
    fail_updates: AtomicBool,
    update_delay: Mutex<Option<std::time::Duration>>,
    updates: Mutex<Vec<String>>,
}

impl MemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot_tx: watch::channel(None).0,
            fail_updates: AtomicBool::new(false),
            update_delay: Mutex::new(None),
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Push a new snapshot to all subscribers.
    pub fn push(&self, snapshot: SessionSnapshot) {
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Current snapshot (what a new subscriber would see first).
    #[must_use]
    pub fn current(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Make subsequent `update_display_name` calls fail.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `update_display_name` calls take this long, so the
    /// in-flight window is observable.
    pub fn set_update_delay(&self, delay: std::time::Duration) {
        *self
            .update_delay
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(delay);
    }

    /// Names passed to `update_display_name` so far, in call order.
    #[must_use]
    pub fn recorded_updates(&self) -> Vec<String> {
        self.updates.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionProvider for MemoryProvider {
    fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    async fn update_display_name(&self, name: &str) -> Result<(), ProviderError> {
        let delay = *self
            .update_delay
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.snapshot_tx.borrow().is_none() {
            return Err(ProviderError::NoUser);
        }
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ProviderError::Request("injected update failure".into()));
        }
        self.updates
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
