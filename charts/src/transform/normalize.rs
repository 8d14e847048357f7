//! Sentinel replacement and column coercion.
//!
//! Normalization never drops or reorders rows and never reorders columns;
//! it only rewrites cell values.

use serde::{Deserialize, Serialize};

use super::operations::ColumnOp;
use crate::error::ShapeResult;
use crate::models::{Cell, RecordSet};

/// Marker a rollup query writes for a rolled-up dimension.
pub const NULL_SENTINEL: &str = "[NULL]";

/// A column operation bound to a column name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStep {
    pub column: String,
    pub op: ColumnOp,
}

/// Declared normalization for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalizer {
    /// Tokens that mean "absent" (compared after trimming)
    #[serde(default = "default_sentinels")]
    pub sentinels: Vec<String>,

    /// Operations applied in order after sentinel replacement
    #[serde(default)]
    pub steps: Vec<ColumnStep>,
}

fn default_sentinels() -> Vec<String> {
    vec![NULL_SENTINEL.to_string()]
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            sentinels: default_sentinels(),
            steps: Vec::new(),
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another absent-value token
    pub fn sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinels.push(token.into());
        self
    }

    /// Declare an operation on a column
    pub fn step(mut self, column: impl Into<String>, op: ColumnOp) -> Self {
        self.steps.push(ColumnStep {
            column: column.into(),
            op,
        });
        self
    }

    fn is_sentinel(&self, value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || self.sentinels.iter().any(|s| s == value)
    }

    /// Produce the canonical record set.
    ///
    /// Every declared column must exist; a failed coercion aborts the run.
    pub fn normalize(&self, set: RecordSet) -> ShapeResult<RecordSet> {
        let positions = self
            .steps
            .iter()
            .map(|step| set.position(&step.column))
            .collect::<ShapeResult<Vec<_>>>()?;

        let mut set = set;
        for record in set.records_mut() {
            for cell in record.cells.iter_mut() {
                if matches!(cell, Cell::Text(s) if self.is_sentinel(s)) {
                    *cell = Cell::Absent;
                }
            }

            for (step, &pos) in self.steps.iter().zip(&positions) {
                let Some(cell) = record.cells.get_mut(pos) else {
                    continue;
                };
                let value = std::mem::replace(cell, Cell::Absent);
                *cell = step.op.apply(value, record.line, &step.column)?;
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;
    use crate::models::{Record, Schema};

    fn raw(rows: &[[&str; 3]]) -> RecordSet {
        let schema = Schema::new(["SALES_MONTH", "calender week", "COUNT"]).unwrap();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Record::new(i + 2, row.iter().map(|s| Cell::text(*s)).collect()))
            .collect();
        RecordSet::new(schema, records)
    }

    #[test]
    fn test_no_sentinel_survives() {
        let set = raw(&[["march", "[NULL]", "100"], ["", " [NULL] ", "  "]]);
        let out = Normalizer::new().normalize(set).unwrap();

        for record in out.records() {
            for cell in &record.cells {
                if let Cell::Text(s) = cell {
                    assert_ne!(s.trim(), NULL_SENTINEL);
                    assert!(!s.trim().is_empty());
                }
            }
        }
        assert!(out.records()[1].cells.iter().all(Cell::is_absent));
    }

    #[test]
    fn test_coercion_after_sentinels() {
        let set = raw(&[["march", "[NULL]", "100"], ["march", "1", "40"]]);
        let out = Normalizer::new()
            .step("SALES_MONTH", ColumnOp::Capitalize)
            .step("calender week", ColumnOp::ToNumber)
            .step("COUNT", ColumnOp::ToNumber)
            .normalize(set)
            .unwrap();

        assert_eq!(out.records()[0].cells[0], Cell::text("March"));
        assert_eq!(out.records()[0].cells[1], Cell::Absent);
        assert_eq!(out.records()[1].cells[1], Cell::Number(1.0));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_coercion_failure_names_line() {
        let set = raw(&[["march", "1", "40"], ["march", "two", "60"]]);
        let err = Normalizer::new()
            .step("calender week", ColumnOp::ToNumber)
            .normalize(set)
            .unwrap_err();
        assert!(matches!(err, ShapeError::NotNumeric { line: 3, .. }));
    }

    #[test]
    fn test_missing_declared_column() {
        let err = Normalizer::new()
            .step("hour", ColumnOp::ToNumber)
            .normalize(raw(&[["a", "b", "c"]]))
            .unwrap_err();
        assert!(matches!(err, ShapeError::MissingColumn(ref c) if c == "hour"));
    }

    #[test]
    fn test_custom_sentinel() {
        let set = raw(&[["N/A", "1", "2"]]);
        let out = Normalizer::new().sentinel("N/A").normalize(set).unwrap();
        assert!(out.records()[0].cells[0].is_absent());
    }
}
