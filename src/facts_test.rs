use super::*;
use crate::prefs::{FactType, Preferences};

#[test]
fn pick_returns_an_android_fact_by_default() {
    let prefs = Preferences::default();
    for _ in 0..50 {
        assert!(ANDROID_FACTS.contains(&pick(&prefs)));
    }
}

#[test]
fn pick_ignores_the_california_preference() {
    // Known gap: the preference is read but the California set is not wired
    // up, so every pick still comes from the Android set.
    let prefs = Preferences { fact_type: FactType::California };
    for _ in 0..50 {
        let fact = pick(&prefs);
        assert!(ANDROID_FACTS.contains(&fact));
        assert!(!CALIFORNIA_FACTS.contains(&fact));
    }
}

#[test]
fn pick_covers_the_whole_android_set() {
    let prefs = Preferences::default();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(pick(&prefs));
    }
    assert_eq!(seen.len(), ANDROID_FACTS.len());
}

#[test]
fn personalized_prefixes_greeting_when_named() {
    let text = personalized("California became a state in 1850", Some("Ana"));
    assert_eq!(text, "Welcome Ana! California became a state in 1850");
}

#[test]
fn personalized_passes_fact_through_without_name() {
    assert_eq!(personalized("some fact", None), "some fact");
    assert_eq!(personalized("some fact", Some("   ")), "some fact");
}
