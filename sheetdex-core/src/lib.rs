// Public modules
pub mod assembly;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filtering;
pub mod grouping;
pub mod header;
pub mod import;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod resolve;
pub mod schema_validation;
pub mod validation;
pub mod view;

// Re-export commonly used types for convenience
pub use assembly::{assemble, Assembly};
pub use config::{
    CategoryBehavior, CategoryConfig, CategoryRule, CategoryTable, HighlightKind, HighlightRule,
    TierMarkers,
};
pub use error::{ConfigError, DatasetError};
pub use fetch::{cache_busted, fetch_dataset, fetch_text};
pub use filtering::{matches_query, normalize_for_search, search};
pub use grouping::{classify, group_label, select, Group, GroupKind, GroupSelection};
pub use header::{reconcile_headers, HeaderKeys};
pub use import::{import_csv, sheet_export_url, sync_sheets, SheetTab, PLACEHOLDER_PREFIX};
pub use io::{load_dataset, load_source, parse_dataset, save_dataset, DataSource};
pub use models::{CellValue, Entity, RawDataset, Record};
pub use pipeline::{derive_entities, CategoryEntities};
pub use resolve::{classify_tier, display_name, resolve, Highlight, ResolvedFields, TierClass};
pub use schema_validation::{validate_against_schema, validate_dataset_shape};
pub use validation::validate_config;
pub use view::{CategoryView, EntityView, GroupSummary, ViewState};
