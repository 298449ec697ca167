//! Preference read — which category of fact the user wants to see.

use tracing::debug;

/// Env key holding the preferred fact category.
pub const FACT_TYPE_KEY: &str = "FACT_TYPE";

/// Fact category preference. Android is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactType {
    #[default]
    Android,
    California,
}

impl FactType {
    /// Parse a stored preference value. Missing or unrecognized values fall
    /// back to the default.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("california") => Self::California,
            Some(v) if v.eq_ignore_ascii_case("android") => Self::Android,
            _ => Self::default(),
        }
    }
}

/// User preferences, read from the environment-backed key-value store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preferences {
    pub fact_type: FactType,
}

impl Preferences {
    /// Read preferences from `FACT_TYPE`.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = std::env::var(FACT_TYPE_KEY).ok();
        let fact_type = FactType::parse(raw.as_deref());
        debug!(?fact_type, "fact-type preference read");
        Self { fact_type }
    }
}

#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;
