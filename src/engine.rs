//! Auth-state engine — derives one discrete state from the session stream.
//!
//! DESIGN
//! ======
//! A single actor task owns all mutable state. It merges two inputs with
//! `select!`: the provider's snapshot stream (watch) and a serialized
//! command queue (notifications, update requests, update completions).
//! Because only the actor touches state, two racing snapshots cannot
//! interleave a derivation.
//!
//! The derived state and the `is_updating` flag are published through watch
//! channels (subscribers see every change, and only changes). Notifications
//! go through a drained mpsc channel for one-shot delivery.
//!
//! ERROR HANDLING
//! ==============
//! Derivation is total: every snapshot maps to exactly one state. The only
//! fallible operation is the profile update; all provider failures collapse
//! into a single `ProfileUpdateFailed` notification, with the detail logged.
//! A failed update never changes the derived state and is never retried.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::notify::{Notification, NotificationCode};
use crate::provider::{ProviderError, SessionProvider};
use crate::session::{ProviderId, SessionSnapshot};

const INPUT_QUEUE_CAPACITY: usize = 32;
const NOTIFY_QUEUE_CAPACITY: usize = 16;

// =============================================================================
// AUTHENTICATION STATE
// =============================================================================

/// Discrete authentication state shown to the UI. Exactly one value holds at
/// any time; states are freely revisited in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationState {
    /// A complete, signed-in session.
    Authenticated,
    /// No signed-in user.
    Unauthenticated,
    /// A session exists but is incomplete: phone-verified user without a
    /// display name.
    InvalidAuthentication,
}

impl AuthenticationState {
    /// Derive the state for a snapshot. Total: every snapshot, including a
    /// malformed or empty one, maps to exactly one state.
    #[must_use]
    pub fn derive(snapshot: &SessionSnapshot) -> Self {
        match snapshot {
            None => Self::Unauthenticated,
            Some(user) if user.has_provider(&ProviderId::Phone) && user.display_name_is_blank() => {
                Self::InvalidAuthentication
            }
            Some(_) => Self::Authenticated,
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The actor task has shut down and no longer accepts commands.
    #[error("engine is closed")]
    Closed,
}

/// Commands serialized through the actor's input queue.
enum Input {
    Notify(NotificationCode),
    UpdateDisplayName(String),
}

/// Handle to a running auth-state engine.
///
/// Dropping the handle closes the command queue and the actor exits. An
/// in-flight provider update is never cancelled; it runs to completion in
/// its own task, with nobody left to observe the outcome.
pub struct AuthEngine {
    input_tx: mpsc::Sender<Input>,
    state_rx: watch::Receiver<AuthenticationState>,
    updating_rx: watch::Receiver<bool>,
    notifications: Option<mpsc::Receiver<Notification>>,
    task: JoinHandle<()>,
}

impl AuthEngine {
    /// Spawn the engine actor subscribed to the provider's snapshot stream.
    /// The initial state is derived from the provider's current snapshot
    /// before any command is processed.
    #[must_use]
    pub fn spawn(provider: Arc<dyn SessionProvider>) -> Self {
        let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
        let (notify_tx, notify_rx) = mpsc::channel(NOTIFY_QUEUE_CAPACITY);

        let snapshot_rx = provider.snapshots();
        let initial = AuthenticationState::derive(&snapshot_rx.borrow());
        let (state_tx, state_rx) = watch::channel(initial);
        let (updating_tx, updating_rx) = watch::channel(false);

        let (done_tx, done_rx) = mpsc::channel(1);
        let actor = Actor {
            provider,
            done_tx,
            state_tx,
            updating_tx,
            notify_tx,
            update_in_flight: false,
        };
        let task = tokio::spawn(actor.run(snapshot_rx, input_rx, done_rx));

        Self { input_tx, state_rx, updating_rx, notifications: Some(notify_rx), task }
    }

    /// Subscribe to the derived authentication state.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<AuthenticationState> {
        self.state_rx.clone()
    }

    /// Current state without subscribing.
    #[must_use]
    pub fn current_state(&self) -> AuthenticationState {
        *self.state_rx.borrow()
    }

    /// Subscribe to the profile-update-in-progress flag.
    #[must_use]
    pub fn is_updating(&self) -> watch::Receiver<bool> {
        self.updating_rx.clone()
    }

    /// Take the one-shot notification receiver. There is exactly one: the
    /// channel is drained on delivery, which is what makes each notification
    /// instance observable at most once. Returns `None` on second call.
    pub fn take_notifications(&mut self) -> Option<mpsc::Receiver<Notification>> {
        self.notifications.take()
    }

    /// Post a notification into the engine, as if an external surface
    /// emitted it. `ProfileUpdated` forces the state to `Authenticated`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the actor has shut down.
    pub async fn post(&self, code: NotificationCode) -> Result<(), EngineError> {
        self.input_tx
            .send(Input::Notify(code))
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Request a display-name update through the provider.
    ///
    /// Sets the updating flag immediately on dispatch and clears it exactly
    /// once when the provider call completes. Success posts
    /// `ProfileUpdated`; any failure (blank name, no user, provider error,
    /// or an update already in flight) posts `ProfileUpdateFailed` and
    /// leaves the state untouched. No automatic retry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the actor has shut down.
    pub async fn update_display_name(&self, name: impl Into<String>) -> Result<(), EngineError> {
        self.input_tx
            .send(Input::UpdateDisplayName(name.into()))
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Drop all command senders and wait for the actor to exit.
    pub async fn shutdown(self) {
        let Self { input_tx, task, .. } = self;
        drop(input_tx);
        if let Err(e) = task.await {
            warn!(error = %e, "engine task did not exit cleanly");
        }
    }
}

// =============================================================================
// ACTOR
// =============================================================================

struct Actor {
    provider: Arc<dyn SessionProvider>,
    /// Cloned into spawned update tasks; completions come back through the
    /// paired receiver so they are serialized like every other input.
    done_tx: mpsc::Sender<Result<(), ProviderError>>,
    state_tx: watch::Sender<AuthenticationState>,
    updating_tx: watch::Sender<bool>,
    notify_tx: mpsc::Sender<Notification>,
    update_in_flight: bool,
}

impl Actor {
    async fn run(
        mut self,
        mut snapshot_rx: watch::Receiver<SessionSnapshot>,
        mut input_rx: mpsc::Receiver<Input>,
        mut done_rx: mpsc::Receiver<Result<(), ProviderError>>,
    ) {
        // Re-apply whatever the stream holds now. The spawn path derived the
        // initial value, but a snapshot may have landed in between; applying
        // is idempotent, so at worst this is a no-op.
        let current = snapshot_rx.borrow_and_update().clone();
        self.apply_snapshot(&current);

        loop {
            tokio::select! {
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        debug!("snapshot stream closed, engine exiting");
                        break;
                    }
                    let snapshot = snapshot_rx.borrow_and_update().clone();
                    self.apply_snapshot(&snapshot);
                }
                input = input_rx.recv() => {
                    let Some(input) = input else {
                        debug!("command queue closed, engine exiting");
                        break;
                    };
                    match input {
                        Input::Notify(code) => self.post_notification(code),
                        Input::UpdateDisplayName(name) => self.start_update(name),
                    }
                }
                Some(result) = done_rx.recv() => {
                    self.finish_update(result);
                }
            }
        }
    }

    fn apply_snapshot(&self, snapshot: &SessionSnapshot) {
        let next = AuthenticationState::derive(snapshot);
        debug!(uid = snapshot.as_ref().map(|u| u.uid.as_str()), ?next, "snapshot received");
        self.set_state(next);
    }

    fn start_update(&mut self, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            warn!("display-name update refused: blank name");
            self.post_notification(NotificationCode::ProfileUpdateFailed);
            return;
        }
        if self.update_in_flight {
            warn!("display-name update refused: another update in flight");
            self.post_notification(NotificationCode::ProfileUpdateFailed);
            return;
        }

        self.update_in_flight = true;
        self.updating_tx.send_replace(true);
        info!(%name, "display-name update started");

        let provider = Arc::clone(&self.provider);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = provider.update_display_name(&name).await;
            // Only fails if the actor already exited; the flag dies with it.
            let _ = done_tx.send(result).await;
        });
    }

    fn finish_update(&mut self, result: Result<(), ProviderError>) {
        self.update_in_flight = false;
        self.updating_tx.send_replace(false);
        match result {
            Ok(()) => {
                info!("display-name update succeeded");
                self.post_notification(NotificationCode::ProfileUpdated);
            }
            Err(e) => {
                error!(error = %e, "display-name update failed");
                self.post_notification(NotificationCode::ProfileUpdateFailed);
            }
        }
    }

    /// Post a one-shot notification, applying the override rule: a
    /// `ProfileUpdated` notification forces `Authenticated` without waiting
    /// for the upstream snapshot to refresh.
    fn post_notification(&self, code: NotificationCode) {
        if code == NotificationCode::ProfileUpdated {
            self.set_state(AuthenticationState::Authenticated);
        }
        match self.notify_tx.try_send(Notification::new(code)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(n)) => {
                warn!(code = ?n.code, "notification dropped: queue full");
            }
            Err(mpsc::error::TrySendError::Closed(n)) => {
                debug!(code = ?n.code, "notification dropped: no consumer");
            }
        }
    }

    fn set_state(&self, next: AuthenticationState) {
        let mut prev = next;
        let changed = self.state_tx.send_if_modified(|state| {
            prev = *state;
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
        if changed {
            info!(?prev, ?next, "authentication state changed");
        }
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
