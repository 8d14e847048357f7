//! Composite display labels built from normalized cells.

use serde::{Deserialize, Serialize};

use crate::error::ShapeResult;
use crate::models::{Cell, RecordSet};

/// One piece of a derived label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LabelPart {
    /// Value of a column; numbers are truncated to integers
    Column(String),
    /// Fixed text
    Literal(String),
}

/// Builds a new text column by concatenating parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBuilder {
    pub parts: Vec<LabelPart>,
}

impl LabelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.parts.push(LabelPart::Column(name.into()));
        self
    }

    pub fn literal(mut self, text: impl Into<String>) -> Self {
        self.parts.push(LabelPart::Literal(text.into()));
        self
    }

    /// Append the label as column `name`.
    pub fn build(&self, set: RecordSet, name: &str) -> ShapeResult<RecordSet> {
        let resolved = self
            .parts
            .iter()
            .map(|part| match part {
                LabelPart::Column(c) => set.position(c).map(Some),
                LabelPart::Literal(_) => Ok(None),
            })
            .collect::<ShapeResult<Vec<_>>>()?;

        let parts = self.parts.clone();
        set.with_column(name, move |record| {
            let mut label = String::new();
            for (part, pos) in parts.iter().zip(&resolved) {
                match (part, pos) {
                    (LabelPart::Literal(text), _) => label.push_str(text),
                    (LabelPart::Column(_), Some(pos)) => label.push_str(&part_text(record.cell(*pos))),
                    (LabelPart::Column(_), None) => {}
                }
            }
            Cell::Text(label)
        })
    }
}

fn part_text(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => format!("{}", n.trunc() as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, Schema};

    #[test]
    fn test_week_label() {
        let schema = Schema::new(["SALES_MONTH", "calender week"]).unwrap();
        let set = RecordSet::new(
            schema,
            vec![
                Record::new(2, vec![Cell::text("March"), Cell::Number(1.0)]),
                Record::new(3, vec![Cell::text("April"), Cell::Number(14.7)]),
            ],
        );

        let out = LabelBuilder::new()
            .column("SALES_MONTH")
            .literal(" Wk ")
            .column("calender week")
            .build(set, "Weekly_Label")
            .unwrap();

        assert_eq!(out.labels("Weekly_Label").unwrap(), vec!["March Wk 1", "April Wk 14"]);
    }

    #[test]
    fn test_unknown_column() {
        let set = RecordSet::new(Schema::new(["a"]).unwrap(), vec![]);
        assert!(LabelBuilder::new().column("b").build(set, "x").is_err());
    }
}
