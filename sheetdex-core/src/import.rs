//! Turning spreadsheet CSV exports into a raw dataset.
//!
//! Header and cleanup conventions follow the spreadsheet export the viewer
//! was built around: blank header cells become `Unnamed: <column>`,
//! repeated headers get `.1`, `.2` suffixes, fully blank rows are dropped
//! and missing cells become empty strings.

use crate::error::DatasetError;
use crate::fetch::fetch_text;
use crate::io::DataSource;
use crate::models::{CellValue, RawDataset, Record};
use reqwest::blocking::Client;
use std::collections::HashSet;
use std::fs;
use tracing::{info, warn};
use url::Url;

pub const PLACEHOLDER_PREFIX: &str = "Unnamed: ";

/// One spreadsheet tab to sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTab {
    pub name: String,
    pub source: DataSource,
}

/// CSV export URL of one tab of a published spreadsheet
pub fn sheet_export_url(sheet_id: &str, gid: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!(
        "https://docs.google.com/spreadsheets/d/{}/export",
        sheet_id
    ))?;
    url.query_pairs_mut()
        .append_pair("format", "csv")
        .append_pair("gid", gid);
    Ok(url)
}

/// Name header cells: blanks become placeholders, repeats get numeric suffixes
pub fn normalize_headers<'a, I: IntoIterator<Item = &'a str>>(headers: I) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("{}{}", PLACEHOLDER_PREFIX, idx)
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A column is numeric when it has at least one value and every non-empty
/// cell parses as a finite number
fn column_is_numeric(rows: &[Vec<String>], column: usize) -> bool {
    let mut cells = rows
        .iter()
        .map(|row| row[column].as_str())
        .filter(|cell| !cell.is_empty())
        .peekable();

    cells.peek().is_some() && cells.all(|cell| parse_number(cell).is_some())
}

/// Parse one CSV export into records.
///
/// Rows wider than the header row get placeholder columns, so no cell is
/// ever dropped. Shorter rows are padded with empty cells.
pub fn import_csv(contents: &str) -> Result<Vec<Record>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(contents.as_bytes());

    let header_cells: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > header_cells.len() {
            warn!(
                line = idx + 2,
                cells = record.len(),
                headers = header_cells.len(),
                "row is wider than the header, adding placeholder columns"
            );
        }
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let width = raw_rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(header_cells.len());
    let headers = normalize_headers(
        (0..width).map(|idx| header_cells.get(idx).map(String::as_str).unwrap_or("")),
    );

    let rows: Vec<Vec<String>> = raw_rows
        .into_iter()
        .map(|mut cells| {
            cells.resize(width, String::new());
            cells
        })
        .filter(|cells| !cells.iter().all(|cell| cell.is_empty()))
        .collect();

    let numeric: Vec<bool> = (0..headers.len())
        .map(|column| column_is_numeric(&rows, column))
        .collect();

    let records = rows
        .into_iter()
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .zip(&numeric)
                .map(|((header, cell), &is_numeric)| {
                    let value = if cell.is_empty() {
                        CellValue::Empty
                    } else if is_numeric {
                        parse_number(&cell).map(CellValue::Number).unwrap_or(CellValue::Text(cell))
                    } else {
                        CellValue::Text(cell)
                    };
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(records)
}

fn read_tab(client: &Client, tab: &SheetTab) -> Result<Vec<Record>, DatasetError> {
    let contents = match &tab.source {
        DataSource::Path(path) => fs::read_to_string(path)?,
        DataSource::Url(url) => fetch_text(client, url)?,
    };
    import_csv(&contents)
}

/// Read every tab into one dataset, in tab order.
/// A tab that cannot be read is skipped with a warning.
pub fn sync_sheets(client: &Client, tabs: &[SheetTab]) -> RawDataset {
    let mut dataset = RawDataset::new();

    for tab in tabs {
        info!(tab = %tab.name, source = %tab.source, "processing tab");
        match read_tab(client, tab) {
            Ok(records) => {
                info!(tab = %tab.name, rows = records.len(), "imported tab");
                dataset.push_category(tab.name.clone(), records);
            }
            Err(e) => warn!(tab = %tab.name, error = %e, "skipping tab"),
        }
    }

    dataset
}
