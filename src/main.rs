//! Demo binary: replays a login / incomplete-login / profile-update / logout
//! sequence against an in-memory provider and logs what the engine derives.

use std::sync::Arc;
use std::time::Duration;

use authstate::provider::MemoryProvider;
use authstate::{AuthEngine, ProviderId, SessionProvider, SessionUser, facts, prefs::Preferences};
use tracing::info;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let provider = Arc::new(MemoryProvider::new());
    let mut engine = AuthEngine::spawn(Arc::clone(&provider) as Arc<dyn SessionProvider>);

    let mut state_rx = engine.state();
    let mut notify_rx = engine
        .take_notifications()
        .expect("notifications taken once");

    // Mirror the notification stream to the log, snackbar-style.
    let notifier = tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            info!(id = %notification.id, "{}", notification.code.message());
        }
    });

    let prefs = Preferences::from_env();
    let fact = facts::pick(&prefs);
    info!(state = ?*state_rx.borrow_and_update(), fact, "engine started");

    // A phone-verified user signs in without a display name.
    provider.push(Some(SessionUser::new("uid-1").with_provider(ProviderId::Phone)));
    state_rx.changed().await.expect("engine alive");
    info!(state = ?*state_rx.borrow_and_update(), "after phone sign-in");

    // They complete their profile; the engine forces Authenticated without
    // waiting for the upstream snapshot to refresh.
    engine.update_display_name("Ana").await.expect("engine alive");
    state_rx.changed().await.expect("engine alive");
    let greeting = facts::personalized(fact, Some("Ana"));
    info!(state = ?*state_rx.borrow_and_update(), greeting = %greeting, "after profile update");

    // Sign out.
    provider.push(None);
    state_rx.changed().await.expect("engine alive");
    info!(state = ?*state_rx.borrow_and_update(), "after sign-out");

    // Let the notifier drain before shutting down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.shutdown().await;
    notifier.abort();
}
