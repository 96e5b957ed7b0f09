use anyhow::{bail, Context, Result};
use csv::StringRecord;
use serde_yaml::Value;
use std::collections::HashMap;

use crate::process::utils::normalize_cell;

pub const COL_ID: &str = "id";
pub const COL_CONFERENCE: &str = "Conference";
pub const COL_TRACK: &str = "Track";
pub const COL_CALL: &str = "Call";
pub const COL_DEADLINE: &str = "DL";
pub const COL_ABSTRACT_DEADLINE: &str = "DL Abstract";
pub const COL_START: &str = "Conf start";
pub const COL_END: &str = "Conf end";
pub const COL_LOCATION: &str = "Location";
pub const COL_MAIN_TOPIC: &str = "Main topic";
pub const COL_OTHER_TOPICS: &str = "Other topics";
pub const COL_CORE: &str = "CORE23";
pub const COL_ESTIMATED: &str = "EST";
pub const COL_TIMEZONE: &str = "Timezone";

/// Columns every sheet export must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_ID,
    COL_CONFERENCE,
    COL_TRACK,
    COL_CALL,
    COL_DEADLINE,
    COL_ABSTRACT_DEADLINE,
    COL_START,
    COL_END,
    COL_LOCATION,
    COL_MAIN_TOPIC,
    COL_OTHER_TOPICS,
    COL_CORE,
];

/// Header name → column index for one CSV export.
#[derive(Debug, Clone)]
pub struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    /// Build from the CSV header row; fails when a required column is missing.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut index = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            // first occurrence wins on duplicated headers
            index.entry(name.trim().to_string()).or_insert(i);
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !index.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            bail!("sheet is missing required columns: {}", missing.join(", "));
        }

        Ok(Self { index })
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

/// How the `estimated` flag of a rebuilt record is decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimatedPolicy {
    /// No `Timezone` column: deadlines cannot be exact.
    MissingTimezone,
    /// Taken from the `EST` cell.
    FromColumn,
    /// Neither applies.
    Default,
}

impl EstimatedPolicy {
    pub fn for_columns(columns: &Columns) -> Self {
        if !columns.has(COL_TIMEZONE) {
            EstimatedPolicy::MissingTimezone
        } else if columns.has(COL_ESTIMATED) {
            EstimatedPolicy::FromColumn
        } else {
            EstimatedPolicy::Default
        }
    }
}

/// One normalized sheet row; absent cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    cells: HashMap<String, Option<String>>,
    line: u64,
}

impl SourceRow {
    pub fn from_record(columns: &Columns, record: &StringRecord) -> Self {
        let cells = columns
            .index
            .iter()
            .map(|(name, &i)| (name.clone(), record.get(i).and_then(normalize_cell)))
            .collect();
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        Self { cells, line }
    }

    /// CSV line the row came from (1-based, header is line 1).
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells.get(name).and_then(|c| c.as_deref())
    }

    /// A cell that must be present for the row to make sense.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .with_context(|| format!("CSV line {}: column {:?} is empty", self.line, name))
    }

    pub fn id(&self) -> Result<&str> {
        self.require(COL_ID)
    }

    /// Resolve the `estimated` value under `policy`.
    ///
    /// A blank `EST` cell gives `None`; text that is not a boolean is kept
    /// as written.
    pub fn estimated(&self, policy: EstimatedPolicy) -> Option<Value> {
        match policy {
            EstimatedPolicy::MissingTimezone => Some(Value::Bool(true)),
            EstimatedPolicy::Default => Some(Value::Bool(false)),
            EstimatedPolicy::FromColumn => self.get(COL_ESTIMATED).map(flag_value),
        }
    }
}

/// Spreadsheet checkbox exports (`TRUE`/`FALSE`) become booleans.
fn flag_value(raw: &str) -> Value {
    match raw {
        "TRUE" | "True" | "true" => Value::Bool(true),
        "FALSE" | "False" | "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(extra: &[&str]) -> StringRecord {
        let mut h: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        h.extend_from_slice(extra);
        StringRecord::from(h)
    }

    #[test]
    fn test_missing_required_column() {
        let h = StringRecord::from(vec!["id", "Conference"]);
        let err = Columns::from_headers(&h).unwrap_err().to_string();
        assert!(err.contains("Track"));
        assert!(err.contains("CORE23"));
        assert!(!err.contains("Conference,"));
    }

    #[test]
    fn test_policy_selection() {
        let none = Columns::from_headers(&headers(&[])).unwrap();
        assert_eq!(
            EstimatedPolicy::for_columns(&none),
            EstimatedPolicy::MissingTimezone
        );

        // no Timezone wins even when EST exists
        let est_only = Columns::from_headers(&headers(&["EST"])).unwrap();
        assert_eq!(
            EstimatedPolicy::for_columns(&est_only),
            EstimatedPolicy::MissingTimezone
        );

        let both = Columns::from_headers(&headers(&["EST", "Timezone"])).unwrap();
        assert_eq!(
            EstimatedPolicy::for_columns(&both),
            EstimatedPolicy::FromColumn
        );

        let tz_only = Columns::from_headers(&headers(&["Timezone"])).unwrap();
        assert_eq!(
            EstimatedPolicy::for_columns(&tz_only),
            EstimatedPolicy::Default
        );
    }

    #[test]
    fn test_estimated_from_column() {
        let cols = Columns::from_headers(&headers(&["EST", "Timezone"])).unwrap();
        let mut values: Vec<&str> = vec![""; REQUIRED_COLUMNS.len()];
        values[0] = "c1";
        let row_with = |est: &'static str| {
            let mut v = values.clone();
            v.extend_from_slice(&[est, "UTC"]);
            SourceRow::from_record(&cols, &StringRecord::from(v))
        };

        assert_eq!(
            row_with("TRUE").estimated(EstimatedPolicy::FromColumn),
            Some(Value::Bool(true))
        );
        assert_eq!(
            row_with("False").estimated(EstimatedPolicy::FromColumn),
            Some(Value::Bool(false))
        );
        // blank cell carries no value
        assert_eq!(row_with("").estimated(EstimatedPolicy::FromColumn), None);
        assert_eq!(row_with("N/A").estimated(EstimatedPolicy::FromColumn), None);
        // anything else is written as-is
        assert_eq!(
            row_with("x").estimated(EstimatedPolicy::FromColumn),
            Some(Value::String("x".to_string()))
        );
    }

    #[test]
    fn test_estimated_fixed_policies() {
        let cols = Columns::from_headers(&headers(&[])).unwrap();
        let record = StringRecord::from(vec!["c1"; REQUIRED_COLUMNS.len()]);
        let row = SourceRow::from_record(&cols, &record);
        assert_eq!(
            row.estimated(EstimatedPolicy::MissingTimezone),
            Some(Value::Bool(true))
        );
        assert_eq!(row.estimated(EstimatedPolicy::Default), Some(Value::Bool(false)));
    }

    #[test]
    fn test_cells_are_normalized() {
        let cols = Columns::from_headers(&headers(&[])).unwrap();
        let mut values: Vec<&str> = vec!["NaN"; REQUIRED_COLUMNS.len()];
        values[0] = " c9 ";
        let row = SourceRow::from_record(&cols, &StringRecord::from(values));
        assert_eq!(row.id().unwrap(), "c9");
        assert_eq!(row.get(COL_TRACK), None);
        assert!(row.require(COL_CONFERENCE).is_err());
    }
}
