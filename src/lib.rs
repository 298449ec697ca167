//! authstate — derive a discrete authentication state from a live session
//! stream.
//!
//! ARCHITECTURE
//! ============
//! An injected [`provider::SessionProvider`] pushes session snapshots; the
//! [`engine::AuthEngine`] actor merges that stream with one-shot
//! notifications and profile-update commands, and publishes a single derived
//! [`engine::AuthenticationState`] plus an update-in-progress flag.
//! [`firebase::FirebaseProvider`] is the REST-backed production provider;
//! [`provider::MemoryProvider`] serves tests and the demo binary.

pub mod engine;
pub mod facts;
pub mod firebase;
pub mod notify;
pub mod prefs;
pub mod provider;
pub mod session;

pub use engine::{AuthEngine, AuthenticationState};
pub use notify::{Notification, NotificationCode};
pub use provider::{ProviderError, SessionProvider};
pub use session::{ProviderId, SessionSnapshot, SessionUser};
