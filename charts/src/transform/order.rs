//! Categorical and multi-key ordering of views.
//!
//! A categorical key sorts by position in a declared sequence instead of
//! lexical order. Values are matched after trimming and case folding and
//! rewritten to the declared spelling. What happens to a value outside the
//! sequence is decided by [`UnmatchedPolicy`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{ShapeError, ShapeResult};
use crate::logs::log_warning_indent;
use crate::models::{Cell, Record, RecordSet};

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// What to do with a value missing from a declared sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Exclude the row and log a warning
    #[default]
    Skip,
    /// Fail the run
    Strict,
}

/// Finite, ordered list of labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderingSequence {
    labels: Vec<String>,
}

impl OrderingSequence {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn months() -> Self {
        Self::new(MONTHS)
    }

    pub fn weekdays() -> Self {
        Self::new(WEEKDAYS)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of `value`, ignoring case and surrounding whitespace
    pub fn position(&self, value: &str) -> Option<usize> {
        let folded = fold(value);
        self.labels.iter().position(|l| fold(l) == folded)
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// One level of a multi-key sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SortKey {
    /// Position in a declared sequence
    Sequence {
        column: String,
        sequence: OrderingSequence,
    },
    /// Natural ascending order of numbers, dates or text
    Ascending { column: String },
    /// Natural descending order; absent cells still sort last
    Descending { column: String },
}

impl SortKey {
    fn column(&self) -> &str {
        match self {
            SortKey::Sequence { column, .. }
            | SortKey::Ascending { column }
            | SortKey::Descending { column } => column,
        }
    }
}

/// Stable multi-key sorter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orderer {
    pub keys: Vec<SortKey>,
    #[serde(default)]
    pub policy: UnmatchedPolicy,
}

impl Orderer {
    pub fn new(policy: UnmatchedPolicy) -> Self {
        Self {
            keys: Vec::new(),
            policy,
        }
    }

    pub fn by_sequence(mut self, column: impl Into<String>, sequence: OrderingSequence) -> Self {
        self.keys.push(SortKey::Sequence {
            column: column.into(),
            sequence,
        });
        self
    }

    pub fn ascending(mut self, column: impl Into<String>) -> Self {
        self.keys.push(SortKey::Ascending {
            column: column.into(),
        });
        self
    }

    pub fn descending(mut self, column: impl Into<String>) -> Self {
        self.keys.push(SortKey::Descending {
            column: column.into(),
        });
        self
    }

    /// Filter to declared categories, then sort by every key in turn.
    pub fn order(&self, set: RecordSet) -> ShapeResult<RecordSet> {
        let positions = self
            .keys
            .iter()
            .map(|k| set.position(k.column()))
            .collect::<ShapeResult<Vec<_>>>()?;

        let mut ranked: Vec<(Vec<usize>, Record)> = Vec::with_capacity(set.len());
        'rows: for record in set.records() {
            let mut record = record.clone();
            let mut ranks = Vec::new();

            for (key, &pos) in self.keys.iter().zip(&positions) {
                let SortKey::Sequence { column, sequence } = key else {
                    continue;
                };
                let value = record.cell(pos).to_string();
                match sequence.position(&value) {
                    Some(rank) => {
                        record.cells[pos] = Cell::text(&sequence.labels()[rank]);
                        ranks.push(rank);
                    }
                    None => match self.policy {
                        UnmatchedPolicy::Skip => {
                            log_warning_indent(
                                format!(
                                    "Line {}: '{}' is not a known {} value, row skipped",
                                    record.line, value, column
                                ),
                                1,
                            );
                            continue 'rows;
                        }
                        UnmatchedPolicy::Strict => {
                            return Err(ShapeError::UnmatchedCategory {
                                line: record.line,
                                column: column.clone(),
                                value,
                                expected: sequence.labels().join(", "),
                            });
                        }
                    },
                }
            }

            ranked.push((ranks, record));
        }

        ranked.sort_by(|(ra, a), (rb, b)| {
            let mut seq = 0;
            for (key, &pos) in self.keys.iter().zip(&positions) {
                let ord = match key {
                    SortKey::Sequence { .. } => {
                        let ord = ra[seq].cmp(&rb[seq]);
                        seq += 1;
                        ord
                    }
                    SortKey::Ascending { .. } => compare_cells(a.cell(pos), b.cell(pos)),
                    SortKey::Descending { .. } => match (a.cell(pos), b.cell(pos)) {
                        (Cell::Absent, _) | (_, Cell::Absent) => {
                            compare_cells(a.cell(pos), b.cell(pos))
                        }
                        (x, y) => compare_cells(y, x),
                    },
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        Ok(set.with_records(ranked.into_iter().map(|(_, r)| r).collect()))
    }
}

/// Natural order of two cells; absent sorts after everything.
pub fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    fn rank(c: &Cell) -> u8 {
        match c {
            Cell::Number(_) => 0,
            Cell::Date(_) => 1,
            Cell::Text(_) => 2,
            Cell::Absent => 3,
        }
    }

    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(y),
        (Cell::Date(x), Cell::Date(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
