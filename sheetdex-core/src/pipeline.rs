use crate::assembly::assemble;
use crate::config::{CategoryBehavior, CategoryTable};
use crate::header::reconcile_headers;
use crate::models::{Entity, RawDataset};
use tracing::debug;

/// Entities of one category, freshly derived from the raw dataset
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntities {
    pub category: String,
    pub behavior: CategoryBehavior,
    pub entities: Vec<Entity>,
    pub dropped_leading: usize,
}

/// Run header reconciliation and row assembly for one category.
/// Returns None when the dataset has no such category.
///
/// Nothing is cached: the same dataset and category always produce the same
/// entities, so callers re-derive on every selection change.
pub fn derive_entities(
    dataset: &RawDataset,
    category: &str,
    table: &CategoryTable,
) -> Option<CategoryEntities> {
    let records = dataset.records(category)?;
    let behavior = table.behavior_for(category);
    let config = table.config();

    let rows = reconcile_headers(
        records,
        behavior.compound_header,
        &config.separator,
        table.placeholder(),
    );
    let assembly = assemble(rows, behavior.row_identity.as_deref());

    debug!(
        category,
        raw = records.len(),
        entities = assembly.entities.len(),
        "derived entities"
    );

    Some(CategoryEntities {
        category: category.to_string(),
        behavior,
        entities: assembly.entities,
        dropped_leading: assembly.dropped_leading,
    })
}
