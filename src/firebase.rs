//! Firebase Identity Toolkit provider — REST-backed session source.
//!
//! DESIGN
//! ======
//! Implements [`SessionProvider`] over the Identity Toolkit REST API. The
//! embedding application owns the sign-in flow and hands over the resulting
//! id token via [`FirebaseProvider::set_id_token`]; this module only turns
//! that credential into session snapshots (`accounts:lookup`) and performs
//! the one profile mutation this crate needs (`accounts:update`).
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-success statuses, and malformed bodies map to
//! distinct [`ProviderError`] variants so callers can log the detail; the
//! engine collapses them all into one user-visible notification.

use std::sync::Mutex;

use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::provider::{ProviderError, SessionProvider};
use crate::session::{ProviderId, SessionSnapshot, SessionUser};

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

// =============================================================================
// CONFIG
// =============================================================================

/// Identity Toolkit configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub base_url: String,
}

impl FirebaseConfig {
    /// Load from `FIREBASE_API_KEY` and optional `FIREBASE_BASE_URL` (useful
    /// for the auth emulator). Returns `None` if the key is missing.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("FIREBASE_API_KEY").ok()?;
        let base_url =
            std::env::var("FIREBASE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Some(Self { api_key, base_url })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/v1/accounts:{operation}?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    local_id: String,
    display_name: Option<String>,
    #[serde(default)]
    provider_user_info: Vec<RawProviderInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProviderInfo {
    provider_id: String,
}

impl From<RawUser> for SessionUser {
    fn from(raw: RawUser) -> Self {
        Self {
            uid: raw.local_id,
            display_name: raw.display_name,
            providers: raw
                .provider_user_info
                .into_iter()
                .map(|info| ProviderId::from(info.provider_id))
                .collect(),
        }
    }
}

/// Parse an `accounts:lookup` body into a snapshot. An empty `users` array
/// means the token no longer resolves to a user.
fn snapshot_from_lookup(body: &str) -> Result<SessionSnapshot, ProviderError> {
    let response: LookupResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(response.users.into_iter().next().map(SessionUser::from))
}

// =============================================================================
// PROVIDER
// =============================================================================

/// REST-backed [`SessionProvider`]. Snapshots are pushed on `set_id_token`
/// and `refresh`; there is no server-push channel in the REST surface.
pub struct FirebaseProvider {
    config: FirebaseConfig,
    client: reqwest::Client,
    id_token: Mutex<Option<String>>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl FirebaseProvider {
    #[must_use]
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            id_token: Mutex::new(None),
            snapshot_tx: watch::channel(None).0,
        }
    }

    /// Install or clear the id token obtained from the sign-in flow.
    /// Clearing pushes a signed-out snapshot immediately; installing a token
    /// pushes nothing until [`Self::refresh`] resolves it to a user.
    pub fn set_id_token(&self, token: Option<String>) {
        let signed_out = token.is_none();
        *self.id_token.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = token;
        if signed_out {
            info!("id token cleared, session signed out");
            self.snapshot_tx.send_replace(None);
        }
    }

    fn current_token(&self) -> Result<String, ProviderError> {
        self.id_token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
            .ok_or(ProviderError::MissingToken)
    }

    /// Re-resolve the current token to a user via `accounts:lookup` and push
    /// the resulting snapshot to all subscribers.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if no token is installed or the lookup
    /// fails; the previous snapshot is left in place on failure.
    pub async fn refresh(&self) -> Result<(), ProviderError> {
        let token = self.current_token()?;
        let body = self
            .post_json(
                "lookup",
                &serde_json::json!({ "idToken": token }),
            )
            .await?;
        let snapshot = snapshot_from_lookup(&body)?;
        debug!(uid = snapshot.as_ref().map(|u| u.uid.as_str()), "session refreshed");
        self.snapshot_tx.send_replace(snapshot);
        Ok(())
    }

    async fn post_json(
        &self,
        operation: &str,
        payload: &serde_json::Value,
    ) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(self.config.endpoint(operation))
            .json(payload)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ProviderError::Api { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl SessionProvider for FirebaseProvider {
    fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    async fn update_display_name(&self, name: &str) -> Result<(), ProviderError> {
        if self.snapshot_tx.borrow().is_none() {
            return Err(ProviderError::NoUser);
        }
        let token = self.current_token()?;
        self.post_json(
            "update",
            &serde_json::json!({
                "idToken": token,
                "displayName": name,
                "returnSecureToken": false,
            }),
        )
        .await?;
        info!("display name updated upstream");
        // No snapshot push here: the session is re-read on the next refresh,
        // and the engine's notification override bridges the gap.
        Ok(())
    }
}

#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;
