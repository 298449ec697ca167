//! One-shot user notifications.
//!
//! DESIGN
//! ======
//! Notifications are "show this once" messages (snackbar-grade), not state.
//! Each posted instance carries a fresh id and travels through a
//! single-subscriber mpsc channel that is drained on delivery, so an
//! instance can never be observed twice — re-subscribing after a consumer
//! restart sees only instances posted afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a notification is about. The code is the contract; the message text
/// is presentation convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCode {
    /// The display-name update was accepted by the provider.
    ProfileUpdated,
    /// The display-name update was rejected or never reached the provider.
    ProfileUpdateFailed,
}

impl NotificationCode {
    /// User-facing message for this code.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ProfileUpdated => "Profile updated successfully",
            Self::ProfileUpdateFailed => "Profile update failed",
        }
    }
}

/// A single posted notification instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique per posted instance; two posts of the same code are distinct.
    pub id: Uuid,
    pub code: NotificationCode,
}

impl Notification {
    #[must_use]
    pub fn new(code: NotificationCode) -> Self {
        Self { id: Uuid::new_v4(), code }
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
