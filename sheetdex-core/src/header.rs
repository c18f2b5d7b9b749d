use crate::models::Record;
use regex::Regex;
use tracing::debug;

/// Label-to-key mapping built from a compound header's sub-header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderKeys {
    keys: Vec<(String, String)>,
}

impl HeaderKeys {
    /// Build the mapping from the sub-header row.
    ///
    /// Each label takes its key from the nearest preceding non-placeholder
    /// label (itself included). A non-blank sub-header value that differs from
    /// that primary label is appended with `separator`. The primary label
    /// starts empty, so placeholders before any real label produce degenerate
    /// keys instead of failing.
    pub fn from_sub_header(sub_header: &Record, separator: &str, placeholder: &Regex) -> Self {
        let mut primary = String::new();
        let mut keys = Vec::with_capacity(sub_header.len());

        for (label, cell) in sub_header.iter() {
            if !placeholder.is_match(label) {
                primary = label.to_string();
            }

            let sub = cell.display();
            let sub = sub.trim();
            let key = if !sub.is_empty() && sub != primary {
                format!("{}{}{}", primary, separator, sub)
            } else {
                primary.clone()
            };

            keys.push((label.to_string(), key));
        }

        Self { keys }
    }

    /// Reconciled key for a label; unmapped labels pass through
    pub fn key_for<'a>(&'a self, label: &'a str) -> &'a str {
        self.keys
            .iter()
            .find(|(source, _)| source == label)
            .map(|(_, key)| key.as_str())
            .unwrap_or(label)
    }

    /// Rewrite every label of a record. When two labels collapse onto the same
    /// key the later cell wins and the first position is kept.
    pub fn apply(&self, record: &Record) -> Record {
        record
            .iter()
            .map(|(label, value)| (self.key_for(label).to_string(), value.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(label, key)| (label.as_str(), key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Flatten a two-row compound header.
///
/// Without `compound` the records come back unchanged. With it the first
/// record is consumed as the sub-header row and the remaining records are
/// rewritten through the resulting [`HeaderKeys`].
pub fn reconcile_headers(
    records: &[Record],
    compound: bool,
    separator: &str,
    placeholder: &Regex,
) -> Vec<Record> {
    if !compound {
        return records.to_vec();
    }

    let Some((sub_header, rows)) = records.split_first() else {
        return Vec::new();
    };

    let header_keys = HeaderKeys::from_sub_header(sub_header, separator, placeholder);
    debug!(labels = header_keys.len(), rows = rows.len(), "reconciled compound header");

    rows.iter().map(|row| header_keys.apply(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn placeholder() -> Regex {
        Regex::new("^Unnamed").unwrap()
    }

    fn sub_header() -> Record {
        [("基本情報", ""), ("Unnamed:1", "名前"), ("Unnamed:2", "レアリティ")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_compound_header_keys() {
        let header_keys = HeaderKeys::from_sub_header(&sub_header(), "_", &placeholder());
        let keys: Vec<_> = header_keys.iter().map(|(_, key)| key).collect();
        assert_eq!(keys, vec!["基本情報", "基本情報_名前", "基本情報_レアリティ"]);
    }

    #[test]
    fn test_sub_header_equal_to_primary_collapses() {
        let row: Record = [("Name", "Name"), ("Unnamed: 1", "Name")].into_iter().collect();
        let header_keys = HeaderKeys::from_sub_header(&row, "_", &placeholder());
        assert_eq!(header_keys.key_for("Name"), "Name");
        assert_eq!(header_keys.key_for("Unnamed: 1"), "Name");
    }

    #[test]
    fn test_numeric_sub_header() {
        let row: Record = [("Lv", CellValue::Empty), ("Unnamed: 1", CellValue::Number(1.0))]
            .into_iter()
            .collect();
        let header_keys = HeaderKeys::from_sub_header(&row, "_", &placeholder());
        assert_eq!(header_keys.key_for("Unnamed: 1"), "Lv_1");
    }

    #[test]
    fn test_leading_placeholder_is_degenerate() {
        let row: Record = [("Unnamed: 0", ""), ("Unnamed: 1", "x")].into_iter().collect();
        let header_keys = HeaderKeys::from_sub_header(&row, "_", &placeholder());
        assert_eq!(header_keys.key_for("Unnamed: 0"), "");
        assert_eq!(header_keys.key_for("Unnamed: 1"), "_x");
    }

    #[test]
    fn test_reconcile_rewrites_data_rows() {
        let data: Record = [("基本情報", "1"), ("Unnamed:1", "アルファ"), ("Unnamed:2", "SSR"), ("extra", "e")]
            .into_iter()
            .collect();
        let rows = reconcile_headers(&[sub_header(), data], true, "_", &placeholder());

        assert_eq!(rows.len(), 1);
        let labels: Vec<_> = rows[0].labels().collect();
        assert_eq!(labels, vec!["基本情報", "基本情報_名前", "基本情報_レアリティ", "extra"]);
        assert_eq!(rows[0].text("基本情報_名前"), "アルファ");
    }

    #[test]
    fn test_flag_off_returns_input() {
        let rows = vec![sub_header()];
        assert_eq!(reconcile_headers(&rows, false, "_", &placeholder()), rows);
    }

    #[test]
    fn test_header_only_sequence_is_empty() {
        assert!(reconcile_headers(&[sub_header()], true, "_", &placeholder()).is_empty());
        assert!(reconcile_headers(&[], true, "_", &placeholder()).is_empty());
    }

    #[test]
    fn test_reapplying_keys_is_stable() {
        let header_keys = HeaderKeys::from_sub_header(&sub_header(), "_", &placeholder());
        let data: Record = [("基本情報", "1"), ("Unnamed:1", "アルファ"), ("Unnamed:2", "SSR")]
            .into_iter()
            .collect();
        let once = header_keys.apply(&data);
        assert_eq!(header_keys.apply(&once), once);
    }

    #[test]
    fn test_colliding_keys_keep_later_value() {
        let row: Record = [("A", ""), ("Unnamed: 1", "")].into_iter().collect();
        let header_keys = HeaderKeys::from_sub_header(&row, "_", &placeholder());
        let data: Record = [("A", "first"), ("Unnamed: 1", "second")].into_iter().collect();
        let merged = header_keys.apply(&data);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.text("A"), "second");
    }
}
