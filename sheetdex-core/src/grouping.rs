use crate::models::Entity;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Synthetic group holding every searched entity
    All,
    /// Entities whose grouping field is blank
    Unset,
    Value,
}

/// A named bucket of entities, borrowed from the category's entity list
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub label: String,
    pub kind: GroupKind,
    pub entities: Vec<&'a Entity>,
}

/// Which group the presentation layer has selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSelection {
    #[default]
    All,
    Named(String),
    /// The category has no grouping field
    NotApplicable,
}

/// Group label of an entity: its grouping cell, or `unset_label` when blank
pub fn group_label(entity: &Entity, field: &str, unset_label: &str) -> String {
    match entity.fields.get(field) {
        Some(value) if !value.is_blank() => value.display(),
        _ => unset_label.to_string(),
    }
}

/// Partition entities into groups.
///
/// Group labels come from the unfiltered `all` list so every tab stays
/// visible while a search is active; group contents come from `searched`.
/// The synthetic "all" group is first, followed by the distinct labels in
/// lexicographic order. The unset sentinel sorts with the other labels.
/// Returns `None` when the category has no grouping field.
pub fn classify<'a>(
    all: &'a [Entity],
    searched: &[&'a Entity],
    field: Option<&str>,
    all_label: &str,
    unset_label: &str,
) -> Option<Vec<Group<'a>>> {
    let field = field?;

    let labels: BTreeSet<String> = all
        .iter()
        .map(|entity| group_label(entity, field, unset_label))
        .collect();

    let mut members: HashMap<String, Vec<&'a Entity>> = HashMap::new();
    for &entity in searched {
        members
            .entry(group_label(entity, field, unset_label))
            .or_default()
            .push(entity);
    }

    let mut groups = Vec::with_capacity(labels.len() + 1);
    groups.push(Group {
        label: all_label.to_string(),
        kind: GroupKind::All,
        entities: searched.to_vec(),
    });

    for label in labels {
        let kind = if label == unset_label {
            GroupKind::Unset
        } else {
            GroupKind::Value
        };
        let entities = members.remove(&label).unwrap_or_default();
        groups.push(Group {
            label,
            kind,
            entities,
        });
    }

    Some(groups)
}

/// Find the selected group
pub fn select<'g, 'a>(groups: &'g [Group<'a>], selection: &GroupSelection) -> Option<&'g Group<'a>> {
    match selection {
        GroupSelection::All => groups.iter().find(|group| group.kind == GroupKind::All),
        GroupSelection::Named(label) => groups
            .iter()
            .find(|group| group.kind != GroupKind::All && &group.label == label),
        GroupSelection::NotApplicable => None,
    }
}
