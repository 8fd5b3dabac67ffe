//! Key naming for the external cache

/// Key holding every survey in full
pub const ALL_SURVEYS_KEY: &str = "surveys_all";

/// Key holding every survey with editions stripped of their outlines
pub const ALL_SURVEYS_METADATA_KEY: &str = "surveys_all_metadata";

/// Prefix for per-edition keys
pub const EDITION_KEY_PREFIX: &str = "surveys_";

/// Key for a single edition
#[inline]
#[must_use]
pub fn edition_key(edition_id: &str) -> String {
    format!("{EDITION_KEY_PREFIX}{edition_id}")
}
