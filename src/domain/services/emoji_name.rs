//! Helpers for emote identifiers and emoji names.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::MAX_EMOTE_NAME_LEN;

static INVALID_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("static regex is valid"));

/// Extracts the emote id from a 7TV emote URL. Bare ids pass through.
#[must_use]
pub fn extract_emote_id(input: &str) -> &str {
    let path = input.split(['?', '#']).next().unwrap_or(input);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .trim()
}

/// Cuts a name down to the emoji name length limit, on character boundaries.
#[must_use]
pub fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_EMOTE_NAME_LEN).collect()
}

/// Converts an arbitrary name into one Discord accepts for a custom emoji.
#[must_use]
pub fn to_emoji_name(name: &str) -> String {
    let spaced = name.replace([' ', '-'], "_");
    let cleaned = INVALID_NAME_CHARS.replace_all(&spaced, "");

    if cleaned.is_empty() {
        "emoji".to_string()
    } else {
        truncate_name(&cleaned)
    }
}
