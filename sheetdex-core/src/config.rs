use crate::error::ConfigError;
use crate::import::PLACEHOLDER_PREFIX;
use crate::validation::validate_config;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-category behavior table plus the labels and candidate lists the
/// derivation steps fall back on.
///
/// Categories are never hardcoded in the algorithms. Each rule's `pattern`
/// is a regex tested against the category name, and every matching rule
/// contributes to the category's [`CategoryBehavior`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Joins a primary header label to its sub-header label
    pub separator: String,
    /// Header labels the export generates for blank header cells
    pub placeholder_pattern: String,
    pub unset_label: String,
    pub all_label: String,
    pub name_candidates: Vec<String>,
    pub name_fallback: String,
    pub rarity_candidates: Vec<String>,
    pub default_rarity: String,
    pub tiers: TierMarkers,
    pub highlights: Vec<HighlightRule>,
    pub rules: Vec<CategoryRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierMarkers {
    pub top_marker: String,
    pub mid_marker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Classification,
    Effect,
    Importance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRule {
    pub kind: HighlightKind,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRule {
    pub pattern: String,
    pub compound_header: bool,
    /// Field whose non-blank value starts a new entity
    pub row_identity: Option<String>,
    pub group_field: Option<String>,
    pub name_candidates: Vec<String>,
    pub highlights: Vec<HighlightRule>,
}

/// Effective behavior of one category after merging every matching rule
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBehavior {
    pub compound_header: bool,
    pub row_identity: Option<String>,
    pub group_field: Option<String>,
    pub name_candidates: Vec<String>,
    pub highlights: Vec<HighlightRule>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for TierMarkers {
    fn default() -> Self {
        Self {
            top_marker: "SSR".to_string(),
            mid_marker: "SR".to_string(),
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            placeholder_pattern: format!("^{}", regex::escape(PLACEHOLDER_PREFIX.trim_end())),
            unset_label: "unset".to_string(),
            all_label: "all".to_string(),
            name_candidates: strings(&[
                "name",
                "名前",
                "Name",
                "japanese name",
                "日本語名",
                "basic info_name",
                "基本情報_名前",
            ]),
            name_fallback: "Unknown".to_string(),
            rarity_candidates: strings(&[
                "rarity",
                "レアリティ",
                "Rarity",
                "basic info_rarity",
                "基本情報_レアリティ",
            ]),
            default_rarity: "N".to_string(),
            tiers: TierMarkers::default(),
            highlights: vec![
                HighlightRule {
                    kind: HighlightKind::Classification,
                    candidates: strings(&["属性", "タイプ", "種別", "type"]),
                },
                HighlightRule {
                    kind: HighlightKind::Effect,
                    candidates: strings(&["効果", "条件", "effect", "condition"]),
                },
                HighlightRule {
                    kind: HighlightKind::Importance,
                    candidates: strings(&["重要度", "importance"]),
                },
            ],
            rules: vec![
                CategoryRule {
                    pattern: "ST|スタンス|ステータス".to_string(),
                    group_field: Some("免".to_string()),
                    ..Default::default()
                },
                CategoryRule {
                    pattern: "(?i)weapon|core|武器|コア".to_string(),
                    group_field: Some("種別".to_string()),
                    ..Default::default()
                },
                CategoryRule {
                    pattern: "(?i)character[ _]?translation|キャラ翻訳".to_string(),
                    compound_header: true,
                    row_identity: Some("基本情報_名前".to_string()),
                    name_candidates: strings(&["基本情報_名前", "基本情報"]),
                    highlights: vec![HighlightRule {
                        kind: HighlightKind::Effect,
                        candidates: strings(&["翻訳", "translation"]),
                    }],
                    ..Default::default()
                },
            ],
        }
    }
}

impl CategoryConfig {
    /// Load a configuration table from a JSON file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: CategoryConfig = serde_json::from_str(&contents)?;
        validate_config(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// A validated configuration with its patterns compiled once
#[derive(Debug, Clone)]
pub struct CategoryTable {
    config: CategoryConfig,
    placeholder: Regex,
    rules: Vec<(Regex, CategoryRule)>,
}

impl CategoryTable {
    pub fn compile(config: CategoryConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Invalid)?;

        let placeholder = Regex::new(&config.placeholder_pattern)
            .map_err(|e| ConfigError::Invalid(vec![e.to_string()]))?;

        let rules = config
            .rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.clone()))
                    .map_err(|e| ConfigError::Invalid(vec![e.to_string()]))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            placeholder,
            rules,
        })
    }

    /// The built-in table
    pub fn builtin() -> Self {
        Self::compile(CategoryConfig::default()).expect("built-in category table is valid")
    }

    pub fn config(&self) -> &CategoryConfig {
        &self.config
    }

    pub fn placeholder(&self) -> &Regex {
        &self.placeholder
    }

    /// Merge every rule whose pattern matches `category`, in table order.
    ///
    /// `compound_header` is OR-ed, the first rule naming a row identity or a
    /// group field wins, rule name candidates precede the global ones, and the
    /// first highlight rule of each kind wins.
    pub fn behavior_for(&self, category: &str) -> CategoryBehavior {
        let mut behavior = CategoryBehavior::default();

        for (pattern, rule) in &self.rules {
            if !pattern.is_match(category) {
                continue;
            }

            behavior.compound_header |= rule.compound_header;
            if behavior.row_identity.is_none() {
                behavior.row_identity = rule.row_identity.clone();
            }
            if behavior.group_field.is_none() {
                behavior.group_field = rule.group_field.clone();
            }
            push_unique(&mut behavior.name_candidates, &rule.name_candidates);
            push_highlights(&mut behavior.highlights, &rule.highlights);
        }

        push_unique(&mut behavior.name_candidates, &self.config.name_candidates);
        push_highlights(&mut behavior.highlights, &self.config.highlights);

        behavior
    }
}

fn push_unique(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

fn push_highlights(target: &mut Vec<HighlightRule>, rules: &[HighlightRule]) {
    for rule in rules {
        if !target.iter().any(|existing| existing.kind == rule.kind) {
            target.push(rule.clone());
        }
    }
}
