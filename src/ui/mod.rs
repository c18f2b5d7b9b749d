pub mod formatting;

pub use formatting::{format_categories, format_view};

use crate::state::AppState;
use sheetdex_core::CategoryView;

pub fn print_categories(state: &AppState) {
    print!("{}", format_categories(state));
}

pub fn print_view(view: &CategoryView<'_>) {
    print!("{}", format_view(view));
}
