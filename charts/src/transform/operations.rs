//! Column operations applied during normalization.
//!
//! Text operations leave absent cells and numbers untouched. Coercions are
//! fail-fast: a value that cannot be converted is a [`ShapeError`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ShapeError, ShapeResult};
use crate::models::Cell;

/// Date layouts accepted by [`ColumnOp::ToDate`], tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Operations that can be declared on a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnOp {
    /// Remove leading and trailing whitespace
    Trim,

    /// Convert to lowercase
    Lowercase,

    /// First letter uppercase, the rest lowercase
    Capitalize,

    /// Parse as a number
    ToNumber,

    /// Parse as a calendar date (time part dropped)
    ToDate,
}

impl ColumnOp {
    /// Apply this operation to a cell of `column` on source `line`
    pub fn apply(&self, cell: Cell, line: usize, column: &str) -> ShapeResult<Cell> {
        match (self, cell) {
            (_, Cell::Absent) => Ok(Cell::Absent),
            (ColumnOp::Trim, Cell::Text(s)) => Ok(Cell::Text(s.trim().to_string())),
            (ColumnOp::Lowercase, Cell::Text(s)) => Ok(Cell::Text(s.to_lowercase())),
            (ColumnOp::Capitalize, Cell::Text(s)) => Ok(Cell::Text(capitalize(&s))),
            (ColumnOp::ToNumber, Cell::Text(s)) => parse_number(&s).map(Cell::Number).ok_or(
                ShapeError::NotNumeric {
                    line,
                    column: column.to_string(),
                    value: s,
                },
            ),
            (ColumnOp::ToDate, Cell::Text(s)) => {
                parse_date(&s).map(Cell::Date).ok_or(ShapeError::NotDate {
                    line,
                    column: column.to_string(),
                    value: s,
                })
            }
            (ColumnOp::ToDate, Cell::Number(n)) => Err(ShapeError::NotDate {
                line,
                column: column.to_string(),
                value: n.to_string(),
            }),
            (ColumnOp::ToNumber, Cell::Date(d)) => Err(ShapeError::NotNumeric {
                line,
                column: column.to_string(),
                value: d.to_string(),
            }),
            (_, other) => Ok(other),
        }
    }
}

/// `"mARCH"` → `"March"`
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let n: f64 = s.trim().parse().ok()?;
    n.is_finite().then_some(n)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: ColumnOp, s: &str) -> ShapeResult<Cell> {
        op.apply(Cell::text(s), 2, "col")
    }

    #[test]
    fn test_text_operations() {
        assert_eq!(apply(ColumnOp::Trim, "  News ").unwrap(), Cell::text("News"));
        assert_eq!(apply(ColumnOp::Lowercase, "TUESDAY").unwrap(), Cell::text("tuesday"));
        assert_eq!(apply(ColumnOp::Capitalize, "mARCH").unwrap(), Cell::text("March"));
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_absent_passes_through() {
        for op in [ColumnOp::Trim, ColumnOp::ToNumber, ColumnOp::ToDate] {
            assert_eq!(op.apply(Cell::Absent, 1, "c").unwrap(), Cell::Absent);
        }
    }

    #[test]
    fn test_to_number() {
        assert_eq!(apply(ColumnOp::ToNumber, " 12 ").unwrap(), Cell::Number(12.0));
        assert_eq!(apply(ColumnOp::ToNumber, "3.5").unwrap(), Cell::Number(3.5));
    }

    #[test]
    fn test_to_number_fails_fast() {
        let err = apply(ColumnOp::ToNumber, "twelve").unwrap_err();
        assert!(matches!(err, ShapeError::NotNumeric { line: 2, ref value, .. } if value == "twelve"));
        assert!(apply(ColumnOp::ToNumber, "NaN").is_err());
    }

    #[test]
    fn test_to_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2006, 3, 1).unwrap();
        for s in ["2006-03-01", "2006/03/01", "03/01/2006", "2006-03-01 00:00:00"] {
            assert_eq!(apply(ColumnOp::ToDate, s).unwrap(), Cell::Date(expected), "{s}");
        }
        assert!(matches!(
            apply(ColumnOp::ToDate, "soon").unwrap_err(),
            ShapeError::NotDate { .. }
        ));
    }
}
