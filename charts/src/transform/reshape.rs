//! Pivot, join and filter helpers used by individual reports.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::order::compare_cells;
use crate::error::ShapeResult;
use crate::models::{Cell, Record, RecordSet, Schema};

/// Value grid indexed by two columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot {
    /// Row labels, sorted
    pub rows: Vec<String>,
    /// Column labels, sorted (numbers numerically)
    pub columns: Vec<String>,
    /// `values[row][column]`, `None` where no record exists
    pub values: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Smallest and largest populated value
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Pivot `values` by `index` (rows) and `columns`.
///
/// Rows with an absent index or column cell are ignored. When two records
/// land on the same cell the later one wins.
pub fn pivot(set: &RecordSet, index: &str, columns: &str, values: &str) -> ShapeResult<Pivot> {
    let ip = set.position(index)?;
    let cp = set.position(columns)?;
    let vp = set.position(values)?;

    let mut row_keys: Vec<String> = Vec::new();
    let mut col_keys: Vec<Cell> = Vec::new();
    let mut cells: HashMap<(String, String), f64> = HashMap::new();

    for record in set.records() {
        let (row, col) = (record.cell(ip), record.cell(cp));
        if row.is_absent() || col.is_absent() {
            continue;
        }

        let row = row.to_string();
        if !row_keys.contains(&row) {
            row_keys.push(row.clone());
        }
        if !col_keys.contains(col) {
            col_keys.push(col.clone());
        }
        if let Some(v) = record.cell(vp).as_number() {
            cells.insert((row, col.to_string()), v);
        }
    }

    row_keys.sort();
    col_keys.sort_by(compare_cells);
    let col_labels: Vec<String> = col_keys.iter().map(Cell::to_string).collect();

    let grid = row_keys
        .iter()
        .map(|r| {
            col_labels
                .iter()
                .map(|c| cells.get(&(r.clone(), c.clone())).copied())
                .collect()
        })
        .collect();

    Ok(Pivot {
        rows: row_keys,
        columns: col_labels,
        values: grid,
    })
}

/// Left join `right` onto `left` where `left_on` equals `right_on`.
///
/// The requested `right` columns are appended to the left schema. Left rows
/// without a match get absent cells; a left row matching several right rows
/// is repeated once per match.
pub fn left_join(
    left: &RecordSet,
    left_on: &str,
    right: &RecordSet,
    right_on: &str,
    take: &[&str],
) -> ShapeResult<RecordSet> {
    let lp = left.position(left_on)?;
    let rp = right.position(right_on)?;
    let taken = take
        .iter()
        .map(|c| right.position(c))
        .collect::<ShapeResult<Vec<_>>>()?;

    let mut matches: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for record in right.records() {
        let key = record.cell(rp);
        if key.is_present() {
            matches.entry(key.to_string()).or_default().push(record);
        }
    }

    let mut columns = left.schema().columns().to_vec();
    columns.extend(take.iter().map(|c| c.to_string()));
    let schema = Schema::new(columns)?;

    let mut records = Vec::new();
    for record in left.records() {
        let key = record.cell(lp);
        let found = key
            .is_present()
            .then(|| matches.get(&key.to_string()))
            .flatten();

        match found {
            Some(hits) => {
                for hit in hits {
                    let mut cells = record.cells.clone();
                    cells.extend(taken.iter().map(|&p| hit.cell(p).clone()));
                    records.push(Record::new(record.line, cells));
                }
            }
            None => {
                let mut cells = record.cells.clone();
                cells.extend(taken.iter().map(|_| Cell::Absent));
                records.push(Record::new(record.line, cells));
            }
        }
    }

    Ok(RecordSet::new(schema, records))
}

/// Rows whose `column` equals `value` after trimming both sides.
pub fn filter_equals(set: &RecordSet, column: &str, value: &str) -> ShapeResult<RecordSet> {
    let pos = set.position(column)?;
    let value = value.trim();
    let kept = set
        .records()
        .iter()
        .filter(|r| r.cell(pos).to_string().trim() == value)
        .cloned()
        .collect();
    Ok(set.with_records(kept))
}

/// Rows where `column` is populated.
pub fn filter_present(set: &RecordSet, column: &str) -> ShapeResult<RecordSet> {
    let pos = set.position(column)?;
    let kept = set
        .records()
        .iter()
        .filter(|r| r.cell(pos).is_present())
        .cloned()
        .collect();
    Ok(set.with_records(kept))
}

/// Distinct display values of `column` in first-seen order.
pub fn unique_in_order(set: &RecordSet, column: &str) -> ShapeResult<Vec<String>> {
    let mut seen = Vec::new();
    for label in set.labels(column)? {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cells(row: &[Cell]) -> Vec<Cell> {
        row.to_vec()
    }

    fn heat() -> RecordSet {
        let schema = Schema::new(["CATEGORY", "hour", "CTR"]).unwrap();
        let rows = [
            [Cell::text("Shopping"), Cell::Number(10.0), Cell::Number(2.5)],
            [Cell::text("News"), Cell::Number(2.0), Cell::Number(1.0)],
            [Cell::text("News"), Cell::Number(10.0), Cell::Number(3.0)],
            [Cell::text("News"), Cell::Absent, Cell::Number(9.0)],
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, r)| Record::new(i + 2, cells(r)))
            .collect();
        RecordSet::new(schema, records)
    }

    #[test]
    fn test_pivot_sorted_numeric_columns() {
        let p = pivot(&heat(), "CATEGORY", "hour", "CTR").unwrap();
        assert_eq!(p.rows, vec!["News", "Shopping"]);
        assert_eq!(p.columns, vec!["2", "10"]);
        assert_eq!(p.values[0], vec![Some(1.0), Some(3.0)]);
        assert_eq!(p.values[1], vec![None, Some(2.5)]);
        assert_eq!(p.range(), Some((1.0, 3.0)));
    }

    fn date(d: u32) -> Cell {
        Cell::Date(NaiveDate::from_ymd_opt(2006, 3, d).unwrap())
    }

    #[test]
    fn test_left_join_on_date() {
        let trend = RecordSet::new(
            Schema::new(["EVENT_DATE_STRING", "TOTAL"]).unwrap(),
            vec![
                Record::new(2, vec![date(1), Cell::Number(10.0)]),
                Record::new(3, vec![date(2), Cell::Number(20.0)]),
            ],
        );
        let events = RecordSet::new(
            Schema::new(["EVENT_DATE", "EVENT_KEYWORD", "COUNT"]).unwrap(),
            vec![Record::new(2, vec![date(2), Cell::text("launch"), Cell::Number(7.0)])],
        );

        let joined = left_join(
            &trend,
            "EVENT_DATE_STRING",
            &events,
            "EVENT_DATE",
            &["EVENT_KEYWORD", "COUNT"],
        )
        .unwrap();

        assert_eq!(joined.len(), 2);
        assert!(joined.records()[0].cells[3].is_absent());
        assert_eq!(joined.records()[1].cells[2], Cell::text("launch"));
        assert_eq!(joined.records()[1].cells[3], Cell::Number(7.0));
    }

    #[test]
    fn test_filter_equals_trims() {
        let set = RecordSet::new(
            Schema::new(["TICKER"]).unwrap(),
            vec![
                Record::new(2, vec![Cell::text(" EBAY ")]),
                Record::new(3, vec![Cell::text("AAPL")]),
            ],
        );
        let out = filter_equals(&set, "TICKER", "EBAY").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.records()[0].line, 2);
    }

    #[test]
    fn test_unique_in_order() {
        assert_eq!(unique_in_order(&heat(), "CATEGORY").unwrap(), vec!["Shopping", "News"]);
    }

    #[test]
    fn test_filter_present() {
        assert_eq!(filter_present(&heat(), "hour").unwrap().len(), 3);
    }
}
