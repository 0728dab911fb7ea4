use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single cell value. Only numbers take part in aggregation; text and
/// dates take part in filtering via equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Scalar {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

/// One row: column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: BTreeMap<String, Scalar>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<S: Into<Scalar>>(mut self, column: &str, value: S) -> Self {
        self.values.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.values.get(column)
    }

    /// Numeric view of a column; missing or non-numeric cells read as None.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(Scalar::as_number)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Ordered collection of rows. The engine only ever borrows datasets and
/// never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Named dataset bundle handed to a single `calculate` call.
pub type SourceMap = BTreeMap<String, Dataset>;

/// Exact-match AND predicate over columns. Empty means "Overall": every
/// row passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectFilter {
    conditions: BTreeMap<String, Scalar>,
}

impl SubjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: Into<Scalar>>(mut self, column: &str, value: S) -> Self {
        self.conditions.insert(column.to_string(), value.into());
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| record.get(column) == Some(expected))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// Boundary to whatever loads raw records. Failures never surface here:
/// a source that cannot be located or parsed comes back as an explicitly
/// empty dataset, so the engine reports it as "no data" instead of
/// computing from fabricated rows.
pub trait DatasetProvider {
    fn load_dataset(&self, source: &str, period: &str) -> Dataset;
}

/// In-memory provider keyed by (source, period). Used by tests and by
/// callers that assemble period frames by hand.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    datasets: HashMap<(String, String), Dataset>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: &str, period: &str, dataset: Dataset) {
        self.datasets
            .insert((source.to_string(), period.to_string()), dataset);
    }
}

impl DatasetProvider for StaticProvider {
    fn load_dataset(&self, source: &str, period: &str) -> Dataset {
        self.datasets
            .get(&(source.to_string(), period.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendance_row(team: &str, actual: f64, total: f64) -> Record {
        Record::new()
            .set("team", team)
            .set("actual_days", actual)
            .set("total_days", total)
    }

    #[test]
    fn test_filter_matches_all_conditions() {
        let row = attendance_row("Assembly", 18.0, 20.0);
        let filter = SubjectFilter::new()
            .with("team", "Assembly")
            .with("total_days", 20.0);
        assert!(filter.matches(&row));

        let filter = SubjectFilter::new()
            .with("team", "Assembly")
            .with("total_days", 19.0);
        assert!(!filter.matches(&row));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = SubjectFilter::new();
        assert!(filter.matches(&attendance_row("Paint", 10.0, 20.0)));
        assert!(filter.matches(&Record::new()));
    }

    #[test]
    fn test_filter_on_missing_column_rejects() {
        let filter = SubjectFilter::new().with("grade", "G2");
        assert!(!filter.matches(&attendance_row("Assembly", 18.0, 20.0)));
    }

    #[test]
    fn test_number_ignores_text_cells() {
        let row = attendance_row("Assembly", 18.0, 20.0);
        assert_eq!(row.number("actual_days"), Some(18.0));
        assert_eq!(row.number("team"), None);
        assert_eq!(row.number("absent"), None);
    }

    #[test]
    fn test_scalar_deserializes_untagged() {
        let n: Scalar = serde_json::from_str("42.5").unwrap();
        assert_eq!(n, Scalar::Number(42.5));

        let d: Scalar = serde_json::from_str("\"2024-01-01\"").unwrap();
        assert_eq!(d, Scalar::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));

        let t: Scalar = serde_json::from_str("\"Assembly\"").unwrap();
        assert_eq!(t, Scalar::Text("Assembly".to_string()));
    }

    #[test]
    fn test_static_provider_returns_empty_for_unknown_source() {
        let mut provider = StaticProvider::new();
        provider.insert(
            "attendance",
            "2024-01",
            Dataset::from_rows(vec![attendance_row("Assembly", 18.0, 20.0)]),
        );

        assert_eq!(provider.load_dataset("attendance", "2024-01").len(), 1);
        assert!(provider.load_dataset("attendance", "2024-02").is_empty());
        assert!(provider.load_dataset("headcount", "2024-01").is_empty());
    }
}
