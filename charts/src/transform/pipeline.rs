//! Load → normalize → partition, as one call.
//!
//! Reports declare a [`Shaping`] per input file; ordering and rendering
//! stay with the report since each view is ordered differently.
//!
//! # Example
//!
//! ```rust,ignore
//! use querychart::transform::{ColumnOp, Normalizer, Partitioner, Shaping};
//!
//! let shaping = Shaping::new(
//!     Normalizer::new().step("hour", ColumnOp::ToNumber),
//! )
//! .partitioned(Partitioner::new(["hour", "weekday"]).label("CATEGORY"));
//!
//! let partition = shaping.run("data/question2-data.csv")?;
//! let overall = partition.view(&["hour", "weekday"])?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::normalize::Normalizer;
use super::partition::{Partition, Partitioner};
use crate::error::ReportResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::RecordSet;
use crate::parser::load_csv;

/// How one input file is shaped before ordering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shaping {
    #[serde(default)]
    pub normalizer: Normalizer,
    /// Without a partitioner every row lands in a single view
    #[serde(default)]
    pub partitioner: Option<Partitioner>,
}

impl Shaping {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            partitioner: None,
        }
    }

    pub fn partitioned(mut self, partitioner: Partitioner) -> Self {
        self.partitioner = Some(partitioner);
        self
    }

    /// Load and normalize without partitioning.
    pub fn load(&self, path: impl AsRef<Path>) -> ReportResult<RecordSet> {
        let path = path.as_ref();
        log_info(format!("📖 Reading {}", path.display()));

        let parsed = load_csv(path)?;
        log_success(format!(
            "{} rows, {} columns (encoding {}, delimiter '{}')",
            parsed.records.len(),
            parsed.records.schema().len(),
            parsed.encoding,
            format_delimiter(parsed.delimiter)
        ));

        let normalized = self.normalizer.normalize(parsed.records)?;
        Ok(normalized)
    }

    /// Load, normalize and partition.
    pub fn run(&self, path: impl AsRef<Path>) -> ReportResult<Partition> {
        let set = self.load(path)?;
        let partition = self.partition(&set)?;
        Ok(partition)
    }

    /// Partition an already normalized record set.
    pub fn partition(&self, set: &RecordSet) -> ReportResult<Partition> {
        let partitioner = self
            .partitioner
            .clone()
            .unwrap_or_else(|| Partitioner::new(Vec::<String>::new()));
        let partition = partitioner.partition(set)?;

        for (key, view) in partition.views() {
            log_info_indent(format!("{}: {} rows", partition.describe(key), view.len()), 1);
        }
        if !partition.grand_totals().is_empty() {
            log_warning(format!(
                "{} grand-total row(s) discarded",
                partition.grand_totals().len()
            ));
        }

        Ok(partition)
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::transform::operations::ColumnOp;
    use std::io::Write;

    #[test]
    fn test_run_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SALES_MONTH , calender week ,DIGITAL_SEARCH_COUNT").unwrap();
        writeln!(file, "march,[NULL],100").unwrap();
        writeln!(file, "march,1,40").unwrap();
        writeln!(file, "[NULL],[NULL],140").unwrap();

        let shaping = Shaping::new(
            Normalizer::new()
                .step("SALES_MONTH", ColumnOp::Capitalize)
                .step("calender week", ColumnOp::ToNumber),
        )
        .partitioned(Partitioner::new(["calender week"]).label("SALES_MONTH"));

        let partition = shaping.run(file.path()).unwrap();
        assert_eq!(partition.view(&["calender week"]).unwrap().len(), 1);
        assert_eq!(partition.view(&[]).unwrap().len(), 1);
        assert_eq!(partition.grand_totals().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = Shaping::default().run("no/such/file.csv").unwrap_err();
        assert!(matches!(err, ReportError::Load(ref e) if e.is_data_unavailable()));
    }

    #[test]
    fn test_unpartitioned_single_view() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b\n1,\n2,3").unwrap();
        let partition = Shaping::default().run(file.path()).unwrap();
        assert_eq!(partition.view(&[]).unwrap().len(), 2);
    }
}
