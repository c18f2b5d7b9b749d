use anyhow::{bail, Result};
use sheetdex_core::*;

/// Browsing state, owned by the front end.
///
/// Entities are never stored here: every read re-derives them from the raw
/// dataset for the selected category.
#[derive(Debug)]
pub struct AppState {
    pub table: CategoryTable,
    /// Currently loaded dataset
    pub dataset: Option<RawDataset>,
    /// Where the dataset came from
    pub source: Option<DataSource>,
    pub category: Option<String>,
    pub query: String,
    pub group: GroupSelection,
}

impl AppState {
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            dataset: None,
            source: None,
            category: None,
            query: String::new(),
            group: GroupSelection::All,
        }
    }

    /// Load a dataset from a file or URL and select its first category
    pub fn load(&mut self, source: DataSource) -> Result<(), DatasetError> {
        let dataset = load_source(&source)?;
        self.set_dataset(dataset, Some(source));
        Ok(())
    }

    /// Replace the dataset, resetting every selection
    pub fn set_dataset(&mut self, dataset: RawDataset, source: Option<DataSource>) {
        let first = dataset.first_category().map(str::to_string);
        self.dataset = Some(dataset);
        self.source = source;
        self.query.clear();
        self.category = None;

        if let Some(first) = first {
            self.switch_to(first);
        }
    }

    /// Switch category; the group tab always goes back to "all"
    pub fn select_category(&mut self, name: &str) -> Result<()> {
        let Some(dataset) = &self.dataset else {
            bail!("no dataset loaded");
        };
        if !dataset.contains(name) {
            let known: Vec<&str> = dataset.categories().collect();
            bail!("unknown category '{}' (available: {})", name, known.join(", "));
        }

        self.switch_to(name.to_string());
        Ok(())
    }

    fn switch_to(&mut self, name: String) {
        let behavior = self.table.behavior_for(&name);
        self.group = if behavior.group_field.is_some() {
            GroupSelection::All
        } else {
            GroupSelection::NotApplicable
        };
        self.category = Some(name);
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Select a group tab. Ignored for categories without a grouping field.
    pub fn select_group(&mut self, selection: GroupSelection) {
        if self.group != GroupSelection::NotApplicable {
            self.group = selection;
        }
    }

    /// Freshly derived entities of the selected category
    pub fn current_entities(&self) -> Option<CategoryEntities> {
        let dataset = self.dataset.as_ref()?;
        let category = self.category.as_deref()?;
        derive_entities(dataset, category, &self.table)
    }

    /// Get a title line with source and category
    pub fn title(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        match &self.category {
            Some(category) => format!("Sheetdex - {} / {}", source, category),
            None => format!("Sheetdex - {}", source),
        }
    }
}
