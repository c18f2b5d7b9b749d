use crate::models::Entity;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for substring search
/// - Unicode NFC, so decomposed kana and accents match their composed forms
/// - Lowercase (Unicode-aware)
pub fn normalize_for_search(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}

/// Check if an entity matches a free-text query.
/// Own fields are checked before continuation records; an empty query
/// matches everything.
pub fn matches_query(entity: &Entity, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    matches_normalized(entity, &normalize_for_search(query))
}

fn matches_normalized(entity: &Entity, needle: &str) -> bool {
    entity
        .all_values()
        .any(|value| normalize_for_search(&value.display()).contains(needle))
}

/// Apply a search query, returning the matching entities in their original order
pub fn search<'a>(entities: &'a [Entity], query: &str) -> Vec<&'a Entity> {
    if query.is_empty() {
        return entities.iter().collect();
    }

    let needle = normalize_for_search(query);
    entities
        .iter()
        .filter(|entity| matches_normalized(entity, &needle))
        .collect()
}
