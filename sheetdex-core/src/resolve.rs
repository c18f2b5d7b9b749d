use crate::config::{CategoryBehavior, CategoryConfig, HighlightKind, TierMarkers};
use crate::models::{Entity, Record};
use serde::Serialize;

/// Visual class of a rarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierClass {
    Top,
    Mid,
    Base,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub value: String,
}

/// Display attributes derived from an entity. Never written back into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFields {
    pub name: String,
    pub rarity: String,
    pub tier: TierClass,
    pub highlights: Vec<Highlight>,
}

/// First candidate label whose value is non-blank
fn first_match(record: &Record, candidates: &[String]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let text = record.text(candidate);
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    })
}

/// Resolve the display name: candidate labels first, then the first field in
/// column order, then the configured fallback
pub fn display_name(entity: &Entity, behavior: &CategoryBehavior, config: &CategoryConfig) -> String {
    first_match(&entity.fields, &behavior.name_candidates)
        .or_else(|| {
            entity
                .fields
                .first()
                .map(|(_, value)| value.display())
                .filter(|text| !text.trim().is_empty())
        })
        .unwrap_or_else(|| config.name_fallback.clone())
}

pub fn rarity(entity: &Entity, config: &CategoryConfig) -> String {
    first_match(&entity.fields, &config.rarity_candidates)
        .unwrap_or_else(|| config.default_rarity.clone())
}

/// Classify by marker containment, top marker first. Rarity labels often
/// carry qualifiers ("SSR+", "★SR"), so equality would be too strict.
pub fn classify_tier(rarity: &str, markers: &TierMarkers) -> TierClass {
    if !markers.top_marker.is_empty() && rarity.contains(&markers.top_marker) {
        TierClass::Top
    } else if !markers.mid_marker.is_empty() && rarity.contains(&markers.mid_marker) {
        TierClass::Mid
    } else {
        TierClass::Base
    }
}

pub fn highlights(entity: &Entity, behavior: &CategoryBehavior) -> Vec<Highlight> {
    behavior
        .highlights
        .iter()
        .filter_map(|rule| {
            first_match(&entity.fields, &rule.candidates).map(|value| Highlight {
                kind: rule.kind,
                value,
            })
        })
        .collect()
}

pub fn resolve(entity: &Entity, behavior: &CategoryBehavior, config: &CategoryConfig) -> ResolvedFields {
    let rarity = rarity(entity, config);
    ResolvedFields {
        name: display_name(entity, behavior, config),
        tier: classify_tier(&rarity, &config.tiers),
        rarity,
        highlights: highlights(entity, behavior),
    }
}
