//! Static lookup tables for the content classifier taxonomy.
//!
//! Class ids come from an ImageNet-style taxonomy. The engine only needs
//! three things from it: which ids are always rejected, which lowercase
//! keywords block OCR text, and a display name per id.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// Class ids rejected regardless of classifier confidence.
///
/// - 413, 414, 415: assault rifle, shotgun, revolver
/// - 939, 940, 941: swimwear and underwear classes
/// - 508, 509, 510: placeholder sensitive classes
pub const DEFAULT_SENSITIVE_CATEGORIES: &[u32] = &[413, 414, 415, 939, 940, 941, 508, 509, 510];

/// Lowercase substrings that reject OCR text, checked in this order.
pub const DEFAULT_BLOCKED_KEYWORDS: &[&str] = &[
    "violence",
    "weapon",
    "hate",
    "discrimination",
    "illegal",
    "drugs",
    "explicit",
    "inappropriate",
];

/// Display names for well-known class ids.
pub const DEFAULT_CATEGORY_NAMES: &[(u32, &str)] = &[
    (281, "tabby_cat"),
    (285, "egyptian_cat"),
    (413, "assault_rifle"),
    (939, "bikini"),
];

pub fn default_sensitive_categories() -> BTreeSet<u32> {
    DEFAULT_SENSITIVE_CATEGORIES.iter().copied().collect()
}

pub fn default_blocked_keywords() -> Vec<String> {
    DEFAULT_BLOCKED_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

pub fn default_category_names() -> BTreeMap<u32, String> {
    DEFAULT_CATEGORY_NAMES
        .iter()
        .map(|&(id, name)| (id, name.to_string()))
        .collect()
}

/// Resolve a display name, falling back to `class_{id}` for unknown ids.
pub fn category_name(names: &BTreeMap<u32, String>, id: u32) -> Cow<'_, str> {
    match names.get(&id) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(format!("class_{id}")),
    }
}

/// First keyword, in list order, contained in `text`.
pub fn first_blocked_keyword<'k>(keywords: &'k [String], text: &str) -> Option<&'k str> {
    keywords
        .iter()
        .map(String::as_str)
        .find(|kw| text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_resolves() {
        let names = default_category_names();
        assert_eq!(category_name(&names, 281), "tabby_cat");
        assert_eq!(category_name(&names, 413), "assault_rifle");
    }

    #[test]
    fn unknown_category_falls_back() {
        let names = default_category_names();
        assert_eq!(category_name(&names, 7), "class_7");
    }

    #[test]
    fn default_sensitive_set_has_weapons() {
        let set = default_sensitive_categories();
        assert!(set.contains(&413));
        assert!(set.contains(&415));
        assert!(!set.contains(&281));
        assert_eq!(set.len(), 9);
    }

    #[test]
    fn first_keyword_follows_list_order() {
        let keywords = default_blocked_keywords();
        // "hate" appears earlier in the text, "violence" earlier in the list.
        let hit = first_blocked_keyword(&keywords, "hate and violence");
        assert_eq!(hit, Some("violence"));
    }

    #[test]
    fn keyword_matches_as_substring() {
        let keywords = default_blocked_keywords();
        assert_eq!(first_blocked_keyword(&keywords, "weapons cache"), Some("weapon"));
        assert_eq!(first_blocked_keyword(&keywords, "a sunny day"), None);
    }
}
