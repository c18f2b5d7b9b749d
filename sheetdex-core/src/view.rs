use crate::config::{CategoryBehavior, CategoryConfig, CategoryTable};
use crate::filtering::search;
use crate::grouping::{classify, select, Group, GroupKind, GroupSelection};
use crate::models::{Entity, Record};
use crate::pipeline::CategoryEntities;
use crate::resolve::{resolve, Highlight, TierClass};
use serde::Serialize;

/// Tab entry for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub kind: GroupKind,
    /// Members that pass the current search
    pub count: usize,
}

/// Everything the presentation layer needs to draw one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView<'a> {
    pub name: String,
    pub rarity: String,
    pub tier: TierClass,
    pub highlights: Vec<Highlight>,
    pub fields: &'a Record,
    pub continuation: &'a [Record],
}

impl<'a> EntityView<'a> {
    pub fn new(entity: &'a Entity, behavior: &CategoryBehavior, config: &CategoryConfig) -> Self {
        let resolved = resolve(entity, behavior, config);
        Self {
            name: resolved.name,
            rarity: resolved.rarity,
            tier: resolved.tier,
            highlights: resolved.highlights,
            fields: &entity.fields,
            continuation: &entity.continuation,
        }
    }
}

/// "Nothing here" and "nothing matches" are distinct states
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "entities", rename_all = "snake_case")]
pub enum ViewState<'a> {
    /// The category has no entities at all
    CategoryEmpty,
    /// Entities exist but none pass the search in the selected group
    NoMatches,
    Entities(Vec<EntityView<'a>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView<'a> {
    pub category: String,
    pub query: String,
    pub total: usize,
    pub matched: usize,
    /// None for categories without a grouping field
    pub groups: Option<Vec<GroupSummary>>,
    pub selection: GroupSelection,
    #[serde(flatten)]
    pub state: ViewState<'a>,
}

impl CategoryEntities {
    /// Search, group and resolve for the given selection.
    ///
    /// A named selection that does not exist in this category falls back to
    /// the "all" group; ungroupable categories always report `NotApplicable`.
    pub fn view<'a>(
        &'a self,
        table: &CategoryTable,
        query: &str,
        selection: &GroupSelection,
    ) -> CategoryView<'a> {
        let config = table.config();
        let searched = search(&self.entities, query);
        let groups = classify(
            &self.entities,
            &searched,
            self.behavior.group_field.as_deref(),
            &config.all_label,
            &config.unset_label,
        );

        let selection = effective_selection(groups.as_deref(), selection);
        let members: Vec<&Entity> = match &groups {
            Some(groups) => select(groups, &selection)
                .map(|group| group.entities.clone())
                .unwrap_or_default(),
            None => searched.clone(),
        };

        let state = if self.entities.is_empty() {
            ViewState::CategoryEmpty
        } else if members.is_empty() {
            ViewState::NoMatches
        } else {
            ViewState::Entities(
                members
                    .into_iter()
                    .map(|entity| EntityView::new(entity, &self.behavior, config))
                    .collect(),
            )
        };

        CategoryView {
            category: self.category.clone(),
            query: query.to_string(),
            total: self.entities.len(),
            matched: searched.len(),
            groups: groups.map(|groups| groups.iter().map(summarize).collect()),
            selection,
            state,
        }
    }
}

fn summarize(group: &Group<'_>) -> GroupSummary {
    GroupSummary {
        label: group.label.clone(),
        kind: group.kind,
        count: group.entities.len(),
    }
}

fn effective_selection(groups: Option<&[Group<'_>]>, requested: &GroupSelection) -> GroupSelection {
    let Some(groups) = groups else {
        return GroupSelection::NotApplicable;
    };

    match requested {
        GroupSelection::Named(_) if select(groups, requested).is_some() => requested.clone(),
        _ => GroupSelection::All,
    }
}
