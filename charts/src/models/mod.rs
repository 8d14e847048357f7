//! Domain models for the report pipeline.
//!
//! - [`Cell`] - A single normalized value (absent, number, text or date)
//! - [`Schema`] - Trimmed column names with a name → position index
//! - [`Record`] - One row, remembering its source line
//! - [`RecordSet`] - Ordered rows sharing one schema

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ShapeError, ShapeResult};

// =============================================================================
// Cell
// =============================================================================

/// A normalized cell value.
///
/// Sentinel tokens and empty strings all become [`Cell::Absent`], so a
/// rolled-up dimension is never confused with a real string value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Absent,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Display form used for labels: integral numbers carry no decimals.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Absent => Ok(()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Column names of a record set, already trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, trimming every name. Duplicate names are rejected.
    pub fn new<I, S>(columns: I) -> ShapeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();

        for (i, raw) in columns.into_iter().enumerate() {
            let name = raw.as_ref().trim().to_string();
            if index.insert(name.clone(), i).is_some() {
                return Err(ShapeError::DuplicateColumn(name));
            }
            names.push(name);
        }

        Ok(Self {
            columns: names,
            index,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, or [`ShapeError::MissingColumn`].
    pub fn position(&self, name: &str) -> ShapeResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ShapeError::MissingColumn(name.to_string()))
    }
}

// =============================================================================
// Record
// =============================================================================

/// One row of a record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    pub cells: Vec<Cell>,
}

impl Record {
    pub fn new(line: usize, cells: Vec<Cell>) -> Self {
        Self { line, cells }
    }

    pub fn cell(&self, position: usize) -> &Cell {
        self.cells.get(position).unwrap_or(&Cell::Absent)
    }
}

// =============================================================================
// RecordSet
// =============================================================================

/// Ordered rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Self {
            schema: Arc::new(schema),
            records,
        }
    }

    /// A record set over the same schema with a different row selection.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            records,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, column: &str) -> ShapeResult<usize> {
        self.schema.position(column)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> ShapeResult<Vec<&Cell>> {
        let pos = self.position(name)?;
        Ok(self.records.iter().map(|r| r.cell(pos)).collect())
    }

    /// Numbers of one column; absent and non-numeric cells are skipped.
    pub fn numbers(&self, name: &str) -> ShapeResult<Vec<f64>> {
        Ok(self
            .column(name)?
            .into_iter()
            .filter_map(Cell::as_number)
            .collect())
    }

    /// Display strings of one column.
    pub fn labels(&self, name: &str) -> ShapeResult<Vec<String>> {
        Ok(self
            .column(name)?
            .into_iter()
            .map(|c| c.to_string())
            .collect())
    }

    /// Append a derived column computed from each record.
    pub fn with_column<F>(self, name: &str, derive: F) -> ShapeResult<RecordSet>
    where
        F: Fn(&Record) -> Cell,
    {
        let mut columns = self.schema.columns().to_vec();
        columns.push(name.to_string());
        let schema = Schema::new(columns)?;

        let records = self
            .records
            .into_iter()
            .map(|mut r| {
                let derived = derive(&r);
                r.cells.push(derived);
                r
            })
            .collect();

        Ok(RecordSet::new(schema, records))
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_json(&self) -> Vec<Value> {
        self.records
            .iter()
            .map(|record| {
                let mut obj = Map::new();
                for (i, name) in self.schema.columns().iter().enumerate() {
                    let value = serde_json::to_value(record.cell(i)).unwrap_or(Value::Null);
                    obj.insert(name.clone(), value);
                }
                Value::Object(obj)
            })
            .collect()
    }
}
