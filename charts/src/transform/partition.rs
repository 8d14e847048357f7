//! Split a rollup result set into disjoint views.
//!
//! A rollup query encodes several aggregation levels in one result: a
//! grouping column is absent on the rows where that dimension was rolled
//! up. Each row therefore belongs to exactly one view, identified by which
//! grouping columns are absent.
//!
//! ```text
//! CATEGORY  hour  weekday        view
//! News      -     -         →    absent {hour, weekday}
//! News      3     -         →    absent {weekday}
//! News      -     monday    →    absent {hour}
//! -         -     -         →    grand total (discarded)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ShapeError, ShapeResult};
use crate::models::{Record, RecordSet};

/// Absent/present pattern of the grouping columns.
///
/// Bit `i` is set when grouping column `i` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewKey(pub u32);

impl ViewKey {
    /// The most granular view: every grouping column populated.
    pub const DETAIL: ViewKey = ViewKey(0);

    pub fn is_absent(&self, grouping_index: usize) -> bool {
        self.0 & (1 << grouping_index) != 0
    }
}

/// Grouping declaration for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partitioner {
    /// Optional columns whose absence marks a rollup level
    pub grouping: Vec<String>,
    /// Primary label; rows where it is absent are grand totals
    #[serde(default)]
    pub label: Option<String>,
}

impl Partitioner {
    pub fn new<I, S>(grouping: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grouping: grouping.into_iter().map(Into::into).collect(),
            label: None,
        }
    }

    /// Declare the primary label column
    pub fn label(mut self, column: impl Into<String>) -> Self {
        self.label = Some(column.into());
        self
    }

    /// Assign every row to exactly one view.
    pub fn partition(&self, set: &RecordSet) -> ShapeResult<Partition> {
        if self.grouping.len() > 32 {
            return Err(ShapeError::TooManyGroupingColumns(self.grouping.len()));
        }

        let positions = self
            .grouping
            .iter()
            .map(|c| set.position(c))
            .collect::<ShapeResult<Vec<_>>>()?;
        let label = self.label.as_deref().map(|c| set.position(c)).transpose()?;

        let mut buckets: BTreeMap<ViewKey, Vec<Record>> = BTreeMap::new();
        let mut grand_totals = Vec::new();

        for record in set.records() {
            if label.is_some_and(|pos| record.cell(pos).is_absent()) {
                grand_totals.push(record.clone());
                continue;
            }

            let mask = positions
                .iter()
                .enumerate()
                .filter(|&(_, &pos)| record.cell(pos).is_absent())
                .fold(0u32, |mask, (i, _)| mask | (1 << i));

            buckets.entry(ViewKey(mask)).or_default().push(record.clone());
        }

        let views = buckets
            .into_iter()
            .map(|(key, records)| (key, set.with_records(records)))
            .collect();

        Ok(Partition {
            grouping: self.grouping.clone(),
            empty: set.with_records(Vec::new()),
            views,
            grand_totals: set.with_records(grand_totals),
        })
    }
}

/// Disjoint views of one record set
#[derive(Debug, Clone)]
pub struct Partition {
    grouping: Vec<String>,
    empty: RecordSet,
    views: BTreeMap<ViewKey, RecordSet>,
    grand_totals: RecordSet,
}

impl Partition {
    /// Key of the view where exactly `absent` grouping columns are absent.
    pub fn key(&self, absent: &[&str]) -> ShapeResult<ViewKey> {
        absent.iter().try_fold(ViewKey::DETAIL, |key, name| {
            self.grouping
                .iter()
                .position(|g| g == *name)
                .map(|i| ViewKey(key.0 | (1 << i)))
                .ok_or_else(|| ShapeError::MissingColumn(name.to_string()))
        })
    }

    /// The view where exactly `absent` grouping columns are absent.
    ///
    /// Combinations the query never produced yield an empty view.
    pub fn view(&self, absent: &[&str]) -> ShapeResult<RecordSet> {
        let key = self.key(absent)?;
        Ok(self.views.get(&key).unwrap_or(&self.empty).clone())
    }

    /// Populated views in key order
    pub fn views(&self) -> impl Iterator<Item = (ViewKey, &RecordSet)> {
        self.views.iter().map(|(k, v)| (*k, v))
    }

    /// Rows with an absent primary label
    pub fn grand_totals(&self) -> &RecordSet {
        &self.grand_totals
    }

    /// Total rows across all views
    pub fn view_rows(&self) -> usize {
        self.views.values().map(RecordSet::len).sum()
    }

    /// Human-readable description of a key
    pub fn describe(&self, key: ViewKey) -> String {
        ViewName { grouping: &self.grouping, key }.to_string()
    }
}

struct ViewName<'a> {
    grouping: &'a [String],
    key: ViewKey,
}

impl fmt::Display for ViewName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present: Vec<&str> = self
            .grouping
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.key.is_absent(*i))
            .map(|(_, g)| g.as_str())
            .collect();

        if present.is_empty() {
            write!(f, "rollup")
        } else {
            write!(f, "by {}", present.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Schema};
    use std::collections::HashSet;

    fn cell(s: &str) -> Cell {
        if s.is_empty() {
            Cell::Absent
        } else {
            Cell::text(s)
        }
    }

    fn ctr_rows() -> RecordSet {
        let schema = Schema::new(["CATEGORY", "hour", "weekday", "CTR"]).unwrap();
        let rows = [
            ["News", "", "", "4.0"],
            ["Shopping", "", "", "6.0"],
            ["News", "3", "", "1.0"],
            ["News", "", "monday", "2.0"],
            ["", "", "", "5.0"],
            ["News", "3", "monday", "9.0"],
            ["Shopping", "", "friday", "3.0"],
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, r)| Record::new(i + 2, r.iter().map(|s| cell(s)).collect()))
            .collect();
        RecordSet::new(schema, records)
    }

    fn partition() -> Partition {
        Partitioner::new(["hour", "weekday"])
            .label("CATEGORY")
            .partition(&ctr_rows())
            .unwrap()
    }

    #[test]
    fn test_views_by_absent_columns() {
        let p = partition();
        assert_eq!(p.view(&["hour", "weekday"]).unwrap().len(), 2);
        assert_eq!(p.view(&["weekday"]).unwrap().len(), 1);
        assert_eq!(p.view(&["hour"]).unwrap().len(), 2);
        assert_eq!(p.view(&[]).unwrap().len(), 1);
        assert_eq!(p.grand_totals().len(), 1);
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let set = ctr_rows();
        let p = partition();

        let mut seen = HashSet::new();
        for (_, view) in p.views() {
            for record in view.records() {
                assert!(seen.insert(record.line), "line {} in two views", record.line);
            }
        }
        for record in p.grand_totals().records() {
            assert!(seen.insert(record.line));
        }
        assert_eq!(seen.len(), set.len());
        assert_eq!(p.view_rows() + p.grand_totals().len(), set.len());
    }

    #[test]
    fn test_unproduced_view_is_empty() {
        let set = ctr_rows().with_records(vec![]);
        let p = Partitioner::new(["hour", "weekday"]).partition(&set).unwrap();
        assert!(p.view(&["hour"]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_grouping_column() {
        assert!(partition().view(&["minute"]).is_err());
        let err = Partitioner::new(["minute"]).partition(&ctr_rows()).unwrap_err();
        assert!(matches!(err, ShapeError::MissingColumn(_)));
    }

    #[test]
    fn test_without_label_keeps_all_rows() {
        let p = Partitioner::new(["hour", "weekday"]).partition(&ctr_rows()).unwrap();
        assert_eq!(p.view(&["hour", "weekday"]).unwrap().len(), 3);
        assert!(p.grand_totals().is_empty());
    }

    #[test]
    fn test_describe() {
        let p = partition();
        assert_eq!(p.describe(p.key(&["hour", "weekday"]).unwrap()), "rollup");
        assert_eq!(p.describe(p.key(&["weekday"]).unwrap()), "by hour");
    }
}
