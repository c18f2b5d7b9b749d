use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use sheetdex_core::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::validation::ValidationError;

/// What to pull into the dataset directory
#[derive(Debug, Clone, Default)]
pub struct SyncTarget {
    pub sheet_id: Option<String>,
    /// (name, gid) pairs of published sheet tabs
    pub tabs: Vec<(String, String)>,
    /// (name, path) pairs of local CSV exports
    pub csvs: Vec<(String, String)>,
}

impl SyncTarget {
    /// Resolve every tab to a concrete source
    pub fn sheet_tabs(&self) -> Result<Vec<SheetTab>> {
        let mut tabs = Vec::with_capacity(self.tabs.len() + self.csvs.len());

        if !self.tabs.is_empty() {
            let Some(sheet_id) = self.sheet_id.as_deref() else {
                return Err(ValidationError {
                    field: "sheet-id".to_string(),
                    message: "--tab needs --sheet-id or SHEET_ID".to_string(),
                }
                .into());
            };
            for (name, gid) in &self.tabs {
                let url = sheet_export_url(sheet_id, gid)
                    .with_context(|| format!("building export URL for tab '{}'", name))?;
                tabs.push(SheetTab {
                    name: name.clone(),
                    source: DataSource::Url(url),
                });
            }
        }

        for (name, path) in &self.csvs {
            tabs.push(SheetTab {
                name: name.clone(),
                source: DataSource::Path(PathBuf::from(path)),
            });
        }

        Ok(tabs)
    }
}

/// Sync every tab and write `<name>.json` per tab plus the aggregated
/// `db.json`. Returns the written paths, `db.json` last.
pub fn sync_to_dir(target: &SyncTarget, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let tabs = target.sheet_tabs()?;
    if tabs.is_empty() {
        bail!("nothing to sync: pass --tab or --csv");
    }

    let dataset = sync_sheets(&Client::new(), &tabs);
    if dataset.is_empty() {
        return Err(DatasetError::Empty).context("every tab failed to sync");
    }
    write_dataset(&dataset, out_dir)
}

fn write_dataset(dataset: &RawDataset, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(dataset.len() + 1);
    for (name, records) in dataset.iter() {
        let path = out_dir.join(format!("{}.json", file_stem(name)));
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(tab = name, path = %path.display(), "wrote tab");
        written.push(path);
    }

    let db = out_dir.join("db.json");
    save_dataset(dataset, &db).with_context(|| format!("writing {}", db.display()))?;
    info!(categories = dataset.len(), path = %db.display(), "wrote dataset");
    written.push(db);

    Ok(written)
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tabs_need_sheet_id() {
        let target = SyncTarget {
            tabs: vec![("ST".to_string(), "0".to_string())],
            ..Default::default()
        };
        let err = target.sheet_tabs().unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[test]
    fn test_sheet_tabs_order() {
        let target = SyncTarget {
            sheet_id: Some("abc".to_string()),
            tabs: vec![("ST".to_string(), "7".to_string())],
            csvs: vec![("weapons".to_string(), "w.csv".to_string())],
        };
        let tabs = target.sheet_tabs().unwrap();
        assert_eq!(tabs[0].name, "ST");
        assert!(tabs[0].source.to_string().ends_with("gid=7"));
        assert_eq!(tabs[1].source, DataSource::Path(PathBuf::from("w.csv")));
    }

    #[test]
    fn test_sync_local_csv() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("st.csv");
        fs::write(&csv_path, "名前,免,Lv\nx,A,10\n,,\ny,,20\n").unwrap();

        let out_dir = dir.path().join("out");
        let target = SyncTarget {
            csvs: vec![("ST".to_string(), csv_path.display().to_string())],
            ..Default::default()
        };
        let written = sync_to_dir(&target, &out_dir).unwrap();
        assert_eq!(written, vec![out_dir.join("ST.json"), out_dir.join("db.json")]);

        let dataset = load_dataset(out_dir.join("db.json")).unwrap();
        let records = dataset.records("ST").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Lv"), Some(&CellValue::Number(10.0)));
        assert_eq!(records[1].text("免"), "");
    }

    #[test]
    fn test_all_tabs_failing_is_an_error() {
        let dir = TempDir::new().unwrap();
        let target = SyncTarget {
            csvs: vec![("ST".to_string(), "/nonexistent/st.csv".to_string())],
            ..Default::default()
        };
        let err = sync_to_dir(&target, dir.path()).unwrap_err();
        assert!(matches!(err.downcast_ref::<DatasetError>(), Some(DatasetError::Empty)));
        assert!(!dir.path().join("db.json").exists());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("a/b"), "a_b");
    }
}
