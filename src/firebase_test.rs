use super::*;
use crate::session::ProviderId;

// =============================================================================
// FirebaseConfig — env manipulation requires unsafe in edition 2024.
// Tests must run with `--test-threads=1` to avoid env races.
// =============================================================================

unsafe fn clear_firebase_env() {
    unsafe {
        std::env::remove_var("FIREBASE_API_KEY");
        std::env::remove_var("FIREBASE_BASE_URL");
    }
}

#[test]
fn config_from_env_requires_api_key() {
    unsafe { clear_firebase_env() };
    assert!(FirebaseConfig::from_env().is_none());
}

#[test]
fn config_from_env_defaults_base_url() {
    unsafe {
        clear_firebase_env();
        std::env::set_var("FIREBASE_API_KEY", "key123");
    }
    let config = FirebaseConfig::from_env().unwrap();
    assert_eq!(config.api_key, "key123");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    unsafe { clear_firebase_env() };
}

#[test]
fn endpoint_builds_identity_toolkit_url() {
    let config = FirebaseConfig { api_key: "k".into(), base_url: "http://localhost:9099/".into() };
    assert_eq!(config.endpoint("update"), "http://localhost:9099/v1/accounts:update?key=k");
}

// =============================================================================
// Lookup parsing
// =============================================================================

#[test]
fn lookup_parses_user_with_providers() {
    let body = r#"{
        "users": [{
            "localId": "uid-42",
            "displayName": "Ana",
            "providerUserInfo": [
                {"providerId": "phone"},
                {"providerId": "google.com"}
            ]
        }]
    }"#;
    let snapshot = snapshot_from_lookup(body).unwrap();
    let user = snapshot.unwrap();
    assert_eq!(user.uid, "uid-42");
    assert_eq!(user.display_name.as_deref(), Some("Ana"));
    assert!(user.has_provider(&ProviderId::Phone));
    assert!(user.has_provider(&ProviderId::Google));
}

#[test]
fn lookup_without_display_name_or_providers() {
    let body = r#"{"users": [{"localId": "uid-7"}]}"#;
    let user = snapshot_from_lookup(body).unwrap().unwrap();
    assert_eq!(user.uid, "uid-7");
    assert!(user.display_name.is_none());
    assert!(user.providers.is_empty());
}

#[test]
fn lookup_with_empty_users_is_signed_out() {
    assert!(snapshot_from_lookup(r#"{"users": []}"#).unwrap().is_none());
    assert!(snapshot_from_lookup("{}").unwrap().is_none());
}

#[test]
fn lookup_with_malformed_body_is_a_parse_error() {
    let result = snapshot_from_lookup("not json");
    assert!(matches!(result, Err(ProviderError::Parse(_))));
}

// =============================================================================
// Provider behavior that needs no network
// =============================================================================

#[tokio::test]
async fn clearing_the_token_pushes_a_signed_out_snapshot() {
    let provider = FirebaseProvider::new(FirebaseConfig {
        api_key: "k".into(),
        base_url: "http://localhost:9099".into(),
    });
    let mut rx = provider.snapshots();
    rx.borrow_and_update();

    provider.set_id_token(Some("token".into()));
    assert!(!rx.has_changed().unwrap());

    provider.set_id_token(None);
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn refresh_without_token_fails() {
    let provider = FirebaseProvider::new(FirebaseConfig {
        api_key: "k".into(),
        base_url: "http://localhost:9099".into(),
    });
    assert!(matches!(provider.refresh().await, Err(ProviderError::MissingToken)));
}

#[tokio::test]
async fn update_without_user_fails_before_any_request() {
    let provider = FirebaseProvider::new(FirebaseConfig {
        api_key: "k".into(),
        base_url: "http://localhost:9099".into(),
    });
    provider.set_id_token(Some("token".into()));
    // No lookup has resolved a user yet, so the update is refused locally.
    assert!(matches!(
        provider.update_display_name("Ana").await,
        Err(ProviderError::NoUser)
    ));
}
