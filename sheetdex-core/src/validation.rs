use crate::config::{CategoryConfig, CategoryRule, HighlightRule};
use regex::Regex;
use std::collections::HashSet;

/// Validate a category configuration table
/// Returns Ok(()) if valid, or Err(Vec<String>) with every problem found
pub fn validate_config(config: &CategoryConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.separator.is_empty() {
        errors.push("Separator cannot be empty".to_string());
    }

    if let Err(e) = Regex::new(&config.placeholder_pattern) {
        errors.push(format!("Invalid placeholder pattern '{}': {}", config.placeholder_pattern, e));
    }

    for (field, value) in [
        ("unset_label", &config.unset_label),
        ("all_label", &config.all_label),
        ("name_fallback", &config.name_fallback),
        ("default_rarity", &config.default_rarity),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("'{}' cannot be empty", field));
        }
    }

    validate_candidates(&config.name_candidates, "name_candidates", true, &mut errors);
    validate_candidates(&config.rarity_candidates, "rarity_candidates", true, &mut errors);

    let tiers = &config.tiers;
    if !tiers.top_marker.is_empty() && tiers.top_marker == tiers.mid_marker {
        errors.push(format!(
            "Tier markers must differ, both are '{}'",
            tiers.top_marker
        ));
    }

    validate_highlights(&config.highlights, "Global highlights", &mut errors);
    validate_rules(&config.rules, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_rules(rules: &[CategoryRule], errors: &mut Vec<String>) {
    let mut patterns = HashSet::new();

    for (idx, rule) in rules.iter().enumerate() {
        let rule_ref = format!("Rule #{} ('{}')", idx + 1, rule.pattern);

        if rule.pattern.trim().is_empty() {
            errors.push(format!("{}: pattern cannot be empty", rule_ref));
        } else if let Err(e) = Regex::new(&rule.pattern) {
            errors.push(format!("{}: invalid pattern: {}", rule_ref, e));
        }

        if !patterns.insert(&rule.pattern) {
            errors.push(format!("{}: duplicate pattern", rule_ref));
        }

        for (field, value) in [
            ("row_identity", &rule.row_identity),
            ("group_field", &rule.group_field),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                errors.push(format!("{}: {} cannot be blank", rule_ref, field));
            }
        }

        validate_candidates(&rule.name_candidates, &rule_ref, false, errors);
        validate_highlights(&rule.highlights, &rule_ref, errors);
    }
}

pub fn validate_highlights(rules: &[HighlightRule], context: &str, errors: &mut Vec<String>) {
    for rule in rules {
        let label = format!("{} highlight {:?}", context, rule.kind);
        validate_candidates(&rule.candidates, &label, true, errors);
    }
}

fn validate_candidates(candidates: &[String], context: &str, required: bool, errors: &mut Vec<String>) {
    if required && candidates.is_empty() {
        errors.push(format!("{}: candidate list cannot be empty", context));
    }

    let mut seen = HashSet::new();
    for candidate in candidates {
        if candidate.trim().is_empty() {
            errors.push(format!("{}: contains a blank candidate", context));
        }
        if !seen.insert(candidate) {
            errors.push(format!("{}: duplicate candidate '{}'", context, candidate));
        }
    }
}
