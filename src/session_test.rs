use super::*;

// =============================================================================
// ProviderId wire mapping
// =============================================================================

#[test]
fn provider_id_from_known_wire_strings() {
    assert_eq!(ProviderId::from("phone".to_string()), ProviderId::Phone);
    assert_eq!(ProviderId::from("password".to_string()), ProviderId::Email);
    assert_eq!(ProviderId::from("google.com".to_string()), ProviderId::Google);
}

#[test]
fn provider_id_preserves_unknown_wire_strings() {
    let id = ProviderId::from("github.com".to_string());
    assert_eq!(id, ProviderId::Other("github.com".into()));
    assert_eq!(String::from(id), "github.com");
}

#[test]
fn provider_id_round_trips_through_serde() {
    let json = serde_json::to_string(&ProviderId::Phone).unwrap();
    assert_eq!(json, "\"phone\"");
    let back: ProviderId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ProviderId::Phone);
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn display_name_blank_when_missing() {
    assert!(SessionUser::new("uid").display_name_is_blank());
}

#[test]
fn display_name_blank_when_whitespace_only() {
    let user = SessionUser::new("uid").with_display_name("   \t ");
    assert!(user.display_name_is_blank());
}

#[test]
fn display_name_not_blank_when_set() {
    let user = SessionUser::new("uid").with_display_name("Ana");
    assert!(!user.display_name_is_blank());
}

#[test]
fn has_provider_checks_membership() {
    let user = SessionUser::new("uid")
        .with_provider(ProviderId::Phone)
        .with_provider(ProviderId::Google);
    assert!(user.has_provider(&ProviderId::Phone));
    assert!(!user.has_provider(&ProviderId::Email));
}

#[test]
fn session_user_serde_round_trip() {
    let user = SessionUser::new("uid-1")
        .with_display_name("Bob")
        .with_provider(ProviderId::Email);
    let json = serde_json::to_string(&user).unwrap();
    let restored: SessionUser = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, user);
}
