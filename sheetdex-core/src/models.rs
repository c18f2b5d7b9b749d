use crate::error::DatasetError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Convert a JSON cell. Booleans, arrays and objects are not valid cells
    /// and degrade to `Empty`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
            _ => CellValue::Empty,
        }
    }

    /// String form used for display and search
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
            CellValue::Empty => true,
        }
    }
}

/// Integral numbers print without a fractional part (`3.0` -> `3`)
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

/// One spreadsheet row: field labels mapped to cells, in column order.
///
/// Column order matters. The first field is the fallback display identity of
/// an entity, and header reconciliation walks labels left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .map(|(label, value)| (label.clone(), CellValue::from_json(value)))
            .collect()
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    /// Display string of a field, empty when the field is absent
    pub fn text(&self, label: &str) -> String {
        self.get(label).map(CellValue::display).unwrap_or_default()
    }

    /// Set a field. An existing label keeps its position and takes the new value.
    pub fn insert(&mut self, label: impl Into<String>, value: CellValue) {
        let label = label.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(label, _)| label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn first(&self) -> Option<(&str, &CellValue)> {
        self.fields.first().map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (label, value) in iter {
            record.insert(label, value.into());
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// The whole spreadsheet export: category name to its rows, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    categories: Vec<(String, Vec<Record>)>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from a parsed JSON document.
    ///
    /// The document must be an object whose values are arrays of objects.
    /// An empty top-level object is reported as `DatasetError::Empty`.
    pub fn from_value(value: &Value) -> Result<Self, DatasetError> {
        let object = value.as_object().ok_or_else(|| {
            DatasetError::Malformed("top-level document must be an object".to_string())
        })?;

        if object.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut dataset = RawDataset::new();
        for (category, rows) in object {
            let rows = rows.as_array().ok_or_else(|| {
                DatasetError::Malformed(format!(
                    "category '{}' must be an array of records",
                    category
                ))
            })?;

            let mut records = Vec::with_capacity(rows.len());
            for (idx, row) in rows.iter().enumerate() {
                let fields = row.as_object().ok_or_else(|| {
                    DatasetError::Malformed(format!(
                        "category '{}' record #{} is not an object",
                        category,
                        idx + 1
                    ))
                })?;
                records.push(Record::from_json_object(fields));
            }

            dataset.push_category(category.clone(), records);
        }

        Ok(dataset)
    }

    /// Append a category, or replace the rows of an existing one in place
    pub fn push_category(&mut self, name: impl Into<String>, records: Vec<Record>) {
        let name = name.into();
        match self.categories.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = records,
            None => self.categories.push((name, records)),
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn records(&self, category: &str) -> Option<&[Record]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, records)| records.as_slice())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.records(category).is_some()
    }

    /// The category selected by default: the first one in source order
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.categories
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Serialize for RawDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, records) in &self.categories {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}

/// A logical record: one primary row plus the continuation rows folded into it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub fields: Record,
    pub continuation: Vec<Record>,
}

impl Entity {
    pub fn new(fields: Record) -> Self {
        Self {
            fields,
            continuation: Vec::new(),
        }
    }

    /// Own field values first, then every continuation record's values
    pub fn all_values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields
            .values()
            .chain(self.continuation.iter().flat_map(|record| record.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_from_json() {
        assert_eq!(CellValue::from_json(&json!("炎")), CellValue::Text("炎".to_string()));
        assert_eq!(CellValue::from_json(&json!(3)), CellValue::Number(3.0));
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Empty);
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Empty);
        assert_eq!(CellValue::from_json(&json!({"a": 1})), CellValue::Empty);
    }

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(5.0).display(), "5");
        assert_eq!(CellValue::Number(1.5).display(), "1.5");
        assert_eq!(CellValue::Number(-2.0).display(), "-2");
    }

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("  ").is_blank());
        assert!(!CellValue::from("a").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_record_keeps_column_order() {
        let object = json!({"z": "1", "a": "2", "m": "3"});
        let record = Record::from_json_object(object.as_object().unwrap());
        let labels: Vec<_> = record.labels().collect();
        assert_eq!(labels, vec!["z", "a", "m"]);
        assert_eq!(record.first().map(|(label, _)| label), Some("z"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record: Record = [("a", "1"), ("b", "2")].into_iter().collect();
        record.insert("a", CellValue::from("3"));
        let pairs: Vec<_> = record.iter().map(|(l, v)| (l, v.display())).collect();
        assert_eq!(pairs, vec![("a", "3".to_string()), ("b", "2".to_string())]);
    }

    #[test]
    fn test_record_serializes_in_order() {
        let record: Record = [("名前", CellValue::from("x")), ("数", CellValue::Number(2.0))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"名前":"x","数":2}"#);
    }

    #[test]
    fn test_dataset_from_value() {
        let value = json!({
            "ST": [{"名前": "a"}, {"名前": "b"}],
            "weapons": []
        });
        let dataset = RawDataset::from_value(&value).unwrap();
        assert_eq!(dataset.categories().collect::<Vec<_>>(), vec!["ST", "weapons"]);
        assert_eq!(dataset.first_category(), Some("ST"));
        assert_eq!(dataset.records("ST").unwrap().len(), 2);
        assert!(dataset.records("missing").is_none());
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let result = RawDataset::from_value(&json!({}));
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_malformed_dataset_is_rejected() {
        assert!(matches!(
            RawDataset::from_value(&json!([1, 2])),
            Err(DatasetError::Malformed(_))
        ));
        assert!(matches!(
            RawDataset::from_value(&json!({"ST": {"a": 1}})),
            Err(DatasetError::Malformed(_))
        ));
        assert!(matches!(
            RawDataset::from_value(&json!({"ST": ["row"]})),
            Err(DatasetError::Malformed(_))
        ));
    }

    #[test]
    fn test_entity_values_include_continuation() {
        let mut entity = Entity::new([("name", "a")].into_iter().collect());
        entity.continuation.push([("note", "b")].into_iter().collect());
        let values: Vec<_> = entity.all_values().map(CellValue::display).collect();
        assert_eq!(values, vec!["a", "b"]);
    }
}
