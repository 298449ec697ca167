//! Session data model — snapshots of the upstream identity session.
//!
//! DESIGN
//! ======
//! A `SessionSnapshot` is an immutable picture of the current session at a
//! point in time: `None` when nobody is signed in, `Some(SessionUser)`
//! otherwise. Snapshots are produced by a [`crate::provider::SessionProvider`]
//! and consumed by the engine; this module holds only the data shapes and the
//! blank-name rule they share.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The current session: `None` means no signed-in user.
pub type SessionSnapshot = Option<SessionUser>;

// =============================================================================
// PROVIDER ID
// =============================================================================

/// Identity provider that contributed a credential to the session.
///
/// Mapped to and from the upstream wire strings (`"phone"`, `"password"`,
/// `"google.com"`); anything unrecognized is preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderId {
    Phone,
    Email,
    Google,
    Other(String),
}

impl From<String> for ProviderId {
    fn from(wire: String) -> Self {
        match wire.as_str() {
            "phone" => Self::Phone,
            "password" => Self::Email,
            "google.com" => Self::Google,
            _ => Self::Other(wire),
        }
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        match id {
            ProviderId::Phone => "phone".into(),
            ProviderId::Email => "password".into(),
            ProviderId::Google => "google.com".into(),
            ProviderId::Other(wire) => wire,
        }
    }
}

// =============================================================================
// SESSION USER
// =============================================================================

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Provider-assigned user identifier.
    pub uid: String,
    /// Display name, if the user has set one.
    pub display_name: Option<String>,
    /// Providers backing this session (a user can link several).
    pub providers: HashSet<ProviderId>,
}

impl SessionUser {
    /// Build a user with the given uid, no display name, and no providers.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into(), display_name: None, providers: HashSet::new() }
    }

    /// Set the display name (builder-style).
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Add a provider (builder-style).
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.providers.insert(provider);
        self
    }

    /// True when the display name is missing, empty, or whitespace-only.
    #[must_use]
    pub fn display_name_is_blank(&self) -> bool {
        self.display_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
    }

    /// True when any credential on this session came from the given provider.
    #[must_use]
    pub fn has_provider(&self, provider: &ProviderId) -> bool {
        self.providers.contains(provider)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
