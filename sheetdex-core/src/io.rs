use crate::error::DatasetError;
use crate::fetch::fetch_dataset;
use crate::models::RawDataset;
use crate::schema_validation::validate_dataset_shape;
use reqwest::blocking::Client;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Where a dataset document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(Url),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    /// A location with a URL scheme that does not parse is an error.
    pub fn parse(location: &str) -> Result<Self, DatasetError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Url::parse(location).map(DataSource::Url).map_err(|e| {
                DatasetError::Malformed(format!("invalid dataset URL '{}': {}", location, e))
            });
        }
        Ok(DataSource::Path(PathBuf::from(location)))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Parse a dataset document, checking its shape first
pub fn parse_dataset(contents: &str) -> Result<RawDataset, DatasetError> {
    let value: Value = serde_json::from_str(contents)?;
    validate_dataset_shape(&value).map_err(|errors| DatasetError::Malformed(errors.join("; ")))?;
    RawDataset::from_value(&value)
}

/// Load a dataset from a JSON file
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<RawDataset, DatasetError> {
    let contents = fs::read_to_string(path)?;
    parse_dataset(&contents)
}

/// Save a dataset to a JSON file with pretty printing, keeping category and
/// column order
pub fn save_dataset<P: AsRef<Path>>(dataset: &RawDataset, path: P) -> Result<(), DatasetError> {
    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_source(source: &DataSource) -> Result<RawDataset, DatasetError> {
    match source {
        DataSource::Path(path) => load_dataset(path),
        DataSource::Url(url) => fetch_dataset(&Client::new(), url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert!(matches!(
            DataSource::parse("https://example.com/data/db.json"),
            Ok(DataSource::Url(_))
        ));
        assert_eq!(
            DataSource::parse("public/data/db.json").unwrap(),
            DataSource::Path(PathBuf::from("public/data/db.json"))
        );
    }

    #[test]
    fn test_bad_url_is_not_a_path() {
        assert!(matches!(
            DataSource::parse("https://"),
            Err(DatasetError::Malformed(_))
        ));
        assert!(matches!(
            DataSource::parse("http://exa mple.com/db.json"),
            Err(DatasetError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_dataset_keeps_order() {
        let dataset = parse_dataset(r#"{"b": [{"z": 1, "a": 2}], "a": []}"#).unwrap();
        assert_eq!(dataset.categories().collect::<Vec<_>>(), vec!["b", "a"]);
        let labels: Vec<_> = dataset.records("b").unwrap()[0].labels().collect();
        assert_eq!(labels, vec!["z", "a"]);
    }

    #[test]
    fn test_unavailable_documents() {
        assert!(matches!(parse_dataset("{"), Err(DatasetError::Malformed(_))));
        assert!(matches!(parse_dataset("[]"), Err(DatasetError::Malformed(_))));
        assert!(matches!(parse_dataset("{}"), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_dataset(dir.path().join("missing.json"));
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let dataset = parse_dataset(r#"{"ST": [{"名前": "x", "Lv": 3, "memo": null}]}"#).unwrap();

        save_dataset(&dataset, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"名前\": \"x\""));
        assert!(written.contains("\"memo\": \"\""));

        let reloaded = load_dataset(&path).unwrap();
        assert_eq!(reloaded.records("ST").unwrap()[0].text("Lv"), "3");
    }
}
