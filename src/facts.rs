//! Fact selection for the welcome text.

use rand::Rng;

use crate::prefs::Preferences;

pub const ANDROID_FACTS: [&str; 4] = [
    "The first commercial Android device was launched in September 2008",
    "The Android operating system has over 2 billion monthly active users",
    "The first Android version (1.0) was released on September 23, 2008",
    "The first smart phone running Android was the HTC Dream called the T-Mobile G1 in some countries",
];

pub const CALIFORNIA_FACTS: [&str; 4] = [
    "The most populated state in the United States is California",
    "Three out of the ten largest U. S. cities are in California",
    "The largest tree in the world can be found in California",
    "California became a state in 1850",
];

/// Pick a fact to display based on the user's fact-type preference,
/// defaulting to Android facts when no preference is set.
///
/// The California set is not wired up yet: the preference is read, but every
/// pick draws from the Android set.
#[must_use]
pub fn pick(prefs: &Preferences) -> &'static str {
    let _fact_type = prefs.fact_type;
    ANDROID_FACTS[rand::rng().random_range(0..ANDROID_FACTS.len())]
}

/// Prefix the fact with a greeting when the user has a display name.
#[must_use]
pub fn personalized(fact: &str, display_name: Option<&str>) -> String {
    match display_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Welcome {name}! {fact}"),
        None => fact.to_string(),
    }
}

#[cfg(test)]
#[path = "facts_test.rs"]
mod tests;
